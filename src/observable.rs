//! The observable core.
//!
//! A [`MotionObservable`] is a blueprint: it stores a producer function and
//! runs it once per `subscribe`, handing it a [`Subscriber`] for the new
//! consumer. Every subscription is independent and owns the teardown the
//! producer returned for it.

use std::rc::Rc;

use crate::{
  observer::{Observer, Subscriber},
  subscription::Subscription,
};

type Producer<T> = dyn Fn(Subscriber<T>) -> Subscription;

/// Anything a consumer can attach an observer to.
///
/// Implemented by [`MotionObservable`], both subject variants and
/// [`ReactiveProperty`](crate::property::ReactiveProperty).
pub trait Subscribable<T> {
  /// Connect `observer` and return the handle that disconnects it.
  fn subscribe_observer<O>(&self, observer: O) -> Subscription
  where
    O: Observer<T> + 'static;

  /// Connect a `next` callback; the state channel is ignored.
  #[inline]
  fn subscribe<F>(&self, next: F) -> Subscription
  where
    F: Fn(T) + 'static,
  {
    self.subscribe_observer(next)
  }

  /// View this source as a plain observable, to reach the operators.
  fn observable(&self) -> MotionObservable<T>;
}

pub struct MotionObservable<T> {
  producer: Rc<Producer<T>>,
}

impl<T> Clone for MotionObservable<T> {
  #[inline]
  fn clone(&self) -> Self { MotionObservable { producer: self.producer.clone() } }
}

impl<T: 'static> MotionObservable<T> {
  /// Build an observable from a producer.
  ///
  /// The producer receives the downstream subscriber and returns the
  /// subscription that releases whatever it set up. Return
  /// `Subscription::empty()` when there is nothing to release.
  pub fn new<F>(producer: F) -> Self
  where
    F: Fn(Subscriber<T>) -> Subscription + 'static,
  {
    MotionObservable { producer: Rc::new(producer) }
  }
}

impl<T: 'static> Subscribable<T> for MotionObservable<T> {
  fn subscribe_observer<O>(&self, observer: O) -> Subscription
  where
    O: Observer<T> + 'static,
  {
    let subscription = Subscription::default();
    let subscriber = Subscriber::new(observer, &subscription);
    let teardown = (self.producer)(subscriber);
    // Closes immediately if the consumer unsubscribed while the producer ran.
    subscription.add(teardown);
    subscription
  }

  #[inline]
  fn observable(&self) -> MotionObservable<T> { self.clone() }
}

// ==================== Factories ====================

/// Emit `value` to every subscriber as soon as it subscribes.
pub fn of<T: Clone + 'static>(value: T) -> MotionObservable<T> {
  MotionObservable::new(move |subscriber| {
    subscriber.next(value.clone());
    Subscription::empty()
  })
}

/// Emit every item of `iter`, in order, to each subscriber.
pub fn from_iter<I>(iter: I) -> MotionObservable<I::Item>
where
  I: IntoIterator + Clone + 'static,
  I::Item: 'static,
{
  MotionObservable::new(move |subscriber| {
    for v in iter.clone() {
      if subscriber.is_closed() {
        break;
      }
      subscriber.next(v);
    }
    Subscription::empty()
  })
}

/// An observable that never emits.
pub fn never<T: 'static>() -> MotionObservable<T> { MotionObservable::new(|_| Subscription::empty()) }

#[cfg(test)]
mod tests {
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  use super::*;
  use crate::{observer::Callbacks, state::State, subscription::SubscriptionLike};

  #[test]
  fn each_subscription_runs_the_producer() {
    let runs = Rc::new(Cell::new(0));
    let r = runs.clone();
    let source = MotionObservable::new(move |subscriber: Subscriber<i32>| {
      r.set(r.get() + 1);
      subscriber.next(r.get());
      Subscription::empty()
    });

    let seen = Rc::new(RefCell::new(vec![]));
    let (s1, s2) = (seen.clone(), seen.clone());
    source.subscribe(move |v| s1.borrow_mut().push(v));
    source.subscribe(move |v| s2.borrow_mut().push(v));

    assert_eq!(runs.get(), 2);
    assert_eq!(*seen.borrow(), vec![1, 2]);
  }

  #[test]
  fn unsubscribe_is_idempotent() {
    let teardowns = Rc::new(Cell::new(0));
    let t = teardowns.clone();
    let source = MotionObservable::new(move |_: Subscriber<()>| {
      let t = t.clone();
      Subscription::new(move || t.set(t.get() + 1))
    });

    let subscription = source.subscribe(|_| {});
    subscription.unsubscribe();
    subscription.unsubscribe();
    assert_eq!(teardowns.get(), 1);
  }

  #[test]
  fn teardown_runs_when_closed_before_subscribe_returns() {
    let torn_down = Rc::new(Cell::new(false));
    let t = torn_down.clone();
    let source = MotionObservable::new(move |subscriber: Subscriber<i32>| {
      subscriber.next(1);
      subscriber.next(2);
      let t = t.clone();
      Subscription::new(move || t.set(true))
    });

    let seen = Rc::new(RefCell::new(vec![]));
    let outer = Subscription::empty();
    let (s, o) = (seen.clone(), outer.clone());
    let subscription = source.subscribe(move |v| {
      s.borrow_mut().push(v);
      o.unsubscribe();
    });
    outer.add(subscription.clone());

    assert_eq!(*seen.borrow(), vec![1, 2]);
    assert!(subscription.is_closed());
    assert!(torn_down.get());
  }

  #[test]
  fn state_channel_reaches_full_observers() {
    let source = MotionObservable::new(|subscriber: Subscriber<i32>| {
      subscriber.state(State::Active);
      subscriber.next(1);
      subscriber.state(State::AtRest);
      Subscription::empty()
    });

    let states = Rc::new(RefCell::new(vec![]));
    let s = states.clone();
    source.subscribe_observer(Callbacks::new(|_| {}).on_state(move |st| s.borrow_mut().push(st)));
    assert_eq!(*states.borrow(), vec![State::Active, State::AtRest]);
  }

  #[test]
  fn from_iter_emits_in_order() {
    let seen = Rc::new(RefCell::new(vec![]));
    let s = seen.clone();
    from_iter(vec![1, 2, 3]).subscribe(move |v| s.borrow_mut().push(v));
    assert_eq!(*seen.borrow(), vec![1, 2, 3]);
  }
}
