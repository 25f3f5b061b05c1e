//! Subjects: observers that re-broadcast to their own subscribers.
//!
//! Two variants share one core and differ only in memory:
//!
//! - [`Subject`] forwards what it receives to the observers subscribed at
//!   that moment.
//! - [`ReplaySubject`] also remembers the last value (and the last reported
//!   state) and hands it to every new subscriber before `subscribe` returns.
//!
//! Dispatch is synchronous and follows subscription order. Each dispatch
//! iterates a snapshot of the observers taken when it starts, so observers
//! may subscribe, unsubscribe, or dispatch again on the same subject from
//! inside a callback.

use crate::{
  error::MotionError,
  observable::{MotionObservable, Subscribable},
  observer::Observer,
  rc::MutRc,
  state::State,
  subscription::Subscription,
};

mod replay_subject;
mod subject_core;
mod subscribers;

pub use replay_subject::ReplaySubject;
pub use subscribers::Subscribers;

use subject_core::{Memory, SubjectCore};

/// A multicast subject without memory.
pub struct Subject<T> {
  core: MutRc<SubjectCore<T>>,
}

impl<T> Clone for Subject<T> {
  #[inline]
  fn clone(&self) -> Self { Subject { core: self.core.clone() } }
}

impl<T: Clone + 'static> Default for Subject<T> {
  fn default() -> Self { Subject { core: SubjectCore::new(Memory::Forget, None) } }
}

impl<T: Clone + 'static> Subject<T> {
  #[inline]
  pub fn new() -> Self { Self::default() }

  #[inline]
  pub fn next(&self, value: T) { SubjectCore::next(&self.core, value) }

  #[inline]
  pub fn state(&self, state: State) { SubjectCore::state(&self.core, state) }

  #[inline]
  pub fn error(&self, err: MotionError) { SubjectCore::error(&self.core, err) }

  /// Number of observers currently attached.
  #[inline]
  pub fn observer_count(&self) -> usize { SubjectCore::observer_count(&self.core) }
}

impl<T: Clone + 'static> Observer<T> for Subject<T> {
  #[inline]
  fn next(&self, value: T) { Subject::next(self, value) }
  #[inline]
  fn state(&self, state: State) { Subject::state(self, state) }
  #[inline]
  fn error(&self, err: MotionError) { Subject::error(self, err) }
}

impl<T: Clone + 'static> Subscribable<T> for Subject<T> {
  #[inline]
  fn subscribe_observer<O>(&self, observer: O) -> Subscription
  where
    O: Observer<T> + 'static,
  {
    SubjectCore::subscribe(&self.core, observer)
  }

  fn observable(&self) -> MotionObservable<T> {
    let this = self.clone();
    MotionObservable::new(move |subscriber| this.subscribe_observer(subscriber))
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;
  use crate::{observer::Callbacks, subscription::SubscriptionLike};

  fn collector<T: 'static>() -> (Rc<RefCell<Vec<T>>>, impl Fn(T) + 'static) {
    let seen = Rc::new(RefCell::new(vec![]));
    let s = seen.clone();
    (seen, move |v| s.borrow_mut().push(v))
  }

  #[test]
  fn forgets_past_values() {
    let subject = Subject::new();
    subject.next(1);

    let (seen, push) = collector();
    subject.subscribe(push);
    subject.next(2);
    assert_eq!(*seen.borrow(), vec![2]);
  }

  #[test]
  fn dispatches_in_subscription_order() {
    let order = Rc::new(RefCell::new(vec![]));
    let subject = Subject::new();
    for tag in 0..3 {
      let o = order.clone();
      subject.subscribe(move |v: i32| o.borrow_mut().push((tag, v)));
    }
    subject.next(7);
    assert_eq!(*order.borrow(), vec![(0, 7), (1, 7), (2, 7)]);
  }

  #[test]
  fn unsubscribe_mid_dispatch_does_not_skip_others() {
    let subject = Subject::new();
    let seen = Rc::new(RefCell::new(vec![]));

    let first_sub: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
    let (s, f) = (seen.clone(), first_sub.clone());
    let first = subject.subscribe(move |v: i32| {
      s.borrow_mut().push(("first", v));
      if let Some(sub) = f.borrow().as_ref() {
        sub.unsubscribe();
      }
    });
    *first_sub.borrow_mut() = Some(first);

    let s = seen.clone();
    subject.subscribe(move |v: i32| s.borrow_mut().push(("second", v)));
    let s = seen.clone();
    subject.subscribe(move |v: i32| s.borrow_mut().push(("third", v)));

    subject.next(1);
    subject.next(2);
    assert_eq!(
      *seen.borrow(),
      vec![("first", 1), ("second", 1), ("third", 1), ("second", 2), ("third", 2)]
    );
    assert_eq!(subject.observer_count(), 2);
  }

  #[test]
  fn reentrant_dispatch_is_allowed() {
    let subject = Subject::new();
    let (seen, push) = collector();
    let inner = subject.clone();
    subject.subscribe(move |v: i32| {
      if v < 3 {
        inner.next(v + 1);
      }
    });
    subject.subscribe(push);

    subject.next(1);
    // The nested dispatch completes before the outer one reaches the second
    // observer.
    assert_eq!(*seen.borrow(), vec![3, 2, 1]);
  }

  #[test]
  fn panicking_observer_does_not_starve_others() {
    let subject = Subject::new();
    subject.subscribe(|_: i32| panic!("observer failure"));
    let (seen, push) = collector();
    subject.subscribe(push);

    subject.next(5);
    assert_eq!(*seen.borrow(), vec![5]);
  }

  #[test]
  fn forwards_state_and_errors() {
    let subject: Subject<i32> = Subject::new();
    let (states, push_state) = collector();
    let (errors, push_error) = collector();
    subject.subscribe_observer(Callbacks::new(|_| {}).on_state(push_state).on_error(push_error));

    subject.state(State::Active);
    subject.error(MotionError::config("x"));
    assert_eq!(*states.borrow(), vec![State::Active]);
    assert_eq!(*errors.borrow(), vec![MotionError::config("x")]);
  }

  #[test]
  fn observable_view_shares_the_subject() {
    let subject = Subject::new();
    let (seen, push) = collector();
    let subscription = subject.observable().subscribe(push);
    subject.next(1);
    subscription.unsubscribe();
    subject.next(2);
    assert_eq!(*seen.borrow(), vec![1]);
    assert_eq!(subject.observer_count(), 0);
  }
}
