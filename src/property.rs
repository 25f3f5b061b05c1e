//! Properties: readable, writable slots that are also streams.
//!
//! A [`ReactiveProperty`] either stores its value in memory or delegates to a
//! getter/setter pair supplied by the owner of some external state (a view
//! attribute, say). Either way, every `write` is dispatched to subscribers
//! and a new subscriber immediately receives the current value.

use std::{cell::Cell, rc::Rc};

use crate::{
  error::MotionError,
  observable::{MotionObservable, Subscribable},
  observer::{Callbacks, Observer, Subscriber},
  rc::MutRc,
  state::State,
  subject::{ReplaySubject, Subject},
  subscription::Subscription,
};

pub trait Readable<T> {
  fn read(&self) -> T;
}

pub trait Writable<T> {
  fn write(&self, value: T);
}

impl<T, F> Writable<T> for F
where
  F: Fn(T),
{
  #[inline]
  fn write(&self, value: T) { self(value) }
}

impl<T: Clone + 'static> Writable<T> for Subject<T> {
  #[inline]
  fn write(&self, value: T) { self.next(value) }
}

impl<T: Clone + 'static> Writable<T> for ReplaySubject<T> {
  #[inline]
  fn write(&self, value: T) { self.next(value) }
}

impl<T> Writable<T> for Callbacks<T> {
  #[inline]
  fn write(&self, value: T) { Observer::next(self, value) }
}

enum Backing<T> {
  Memory(MutRc<T>),
  External { read: Box<dyn Fn() -> T>, write: Box<dyn Fn(T)> },
}

struct PropertyInner<T> {
  backing: Backing<T>,
  // Externally backed properties only replay once they have been written.
  started: Cell<bool>,
  subject: Subject<T>,
}

/// A stream-backed value slot. Clones share the same slot.
pub struct ReactiveProperty<T> {
  inner: Rc<PropertyInner<T>>,
}

impl<T> Clone for ReactiveProperty<T> {
  #[inline]
  fn clone(&self) -> Self { ReactiveProperty { inner: self.inner.clone() } }
}

impl<T: Clone + Default + 'static> Default for ReactiveProperty<T> {
  fn default() -> Self { ReactiveProperty::new(T::default()) }
}

impl<T: Clone + 'static> ReactiveProperty<T> {
  /// An in-memory property holding `initial`.
  pub fn new(initial: T) -> Self {
    ReactiveProperty {
      inner: Rc::new(PropertyInner {
        backing: Backing::Memory(MutRc::own(initial)),
        started: Cell::new(true),
        subject: Subject::new(),
      }),
    }
  }

  /// A property whose value lives elsewhere.
  ///
  /// `read` answers every [`read`](Readable::read); `write` receives every
  /// write before it is dispatched to subscribers.
  pub fn with_accessors(read: impl Fn() -> T + 'static, write: impl Fn(T) + 'static) -> Self {
    ReactiveProperty {
      inner: Rc::new(PropertyInner {
        backing: Backing::External { read: Box::new(read), write: Box::new(write) },
        started: Cell::new(false),
        subject: Subject::new(),
      }),
    }
  }

  pub fn read(&self) -> T {
    match &self.inner.backing {
      Backing::Memory(value) => value.get(),
      Backing::External { read, .. } => read(),
    }
  }

  pub fn write(&self, value: T) {
    match &self.inner.backing {
      Backing::Memory(slot) => {
        slot.replace(value.clone());
      }
      Backing::External { write, .. } => write(value.clone()),
    }
    self.inner.started.set(true);
    self.inner.subject.next(value);
  }

  /// Read, transform, write back.
  pub fn update(&self, f: impl FnOnce(T) -> T) { self.write(f(self.read())) }

  pub fn observer_count(&self) -> usize { self.inner.subject.observer_count() }
}

impl<T: Clone + 'static> Readable<T> for ReactiveProperty<T> {
  #[inline]
  fn read(&self) -> T { ReactiveProperty::read(self) }
}

impl<T: Clone + 'static> Writable<T> for ReactiveProperty<T> {
  #[inline]
  fn write(&self, value: T) { ReactiveProperty::write(self, value) }
}

impl<T: Clone + 'static> Observer<T> for ReactiveProperty<T> {
  #[inline]
  fn next(&self, value: T) { self.write(value) }

  fn state(&self, _state: State) {}

  fn error(&self, err: MotionError) {
    tracing::warn!(%err, "error written into property; value unchanged");
  }
}

impl<T: Clone + 'static> Subscribable<T> for ReactiveProperty<T> {
  fn subscribe_observer<O>(&self, observer: O) -> Subscription
  where
    O: Observer<T> + 'static,
  {
    let subscription = Subscription::default();
    let subscriber = Subscriber::new(observer, &subscription);
    subscription.add(self.inner.subject.subscribe_observer(subscriber.clone()));
    if self.inner.started.get() {
      subscriber.next(self.read());
    }
    subscription
  }

  fn observable(&self) -> MotionObservable<T> {
    let this = self.clone();
    MotionObservable::new(move |subscriber| this.subscribe_observer(subscriber))
  }
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;

  use super::*;
  use crate::subscription::SubscriptionLike;

  #[test]
  fn write_then_read_is_synchronous() {
    let property = ReactiveProperty::new(0);
    property.write(42);
    assert_eq!(property.read(), 42);
  }

  #[test]
  fn subscribers_get_current_value_then_writes() {
    let property = ReactiveProperty::new("a");
    let seen = Rc::new(RefCell::new(vec![]));
    let s = seen.clone();
    let subscription = property.subscribe(move |v| s.borrow_mut().push(v));
    property.write("b");
    subscription.unsubscribe();
    property.write("c");
    assert_eq!(*seen.borrow(), vec!["a", "b"]);
  }

  #[test]
  fn external_accessors_back_reads_and_writes() {
    let store = Rc::new(Cell::new(1.0));
    let (r, w) = (store.clone(), store.clone());
    let property = ReactiveProperty::with_accessors(move || r.get(), move |v| w.set(v * 2.));

    let seen = Rc::new(RefCell::new(vec![]));
    let s = seen.clone();
    property.subscribe(move |v| s.borrow_mut().push(v));
    // Nothing written yet, so nothing replayed.
    assert!(seen.borrow().is_empty());

    property.write(3.0);
    assert_eq!(store.get(), 6.0);
    assert_eq!(property.read(), 6.0);
    assert_eq!(*seen.borrow(), vec![3.0]);

    // Late subscribers receive whatever the getter reports.
    let late = Rc::new(RefCell::new(vec![]));
    let l = late.clone();
    property.subscribe(move |v| l.borrow_mut().push(v));
    assert_eq!(*late.borrow(), vec![6.0]);
  }

  #[test]
  fn update_reads_and_writes() {
    let property = ReactiveProperty::new(2);
    property.update(|v| v * 5);
    assert_eq!(property.read(), 10);
  }

  #[test]
  fn clones_share_the_slot() {
    let property = ReactiveProperty::new(0);
    let twin = property.clone();
    twin.write(9);
    assert_eq!(property.read(), 9);
  }
}
