//! Observer trait and implementations
//!
//! An observer consumes a motion stream through three channels: `next` for
//! values, `state` for the producer's activity, and `error` for values that
//! could not be produced. Only `next` is required; a bare `Fn(T)` closure is
//! a complete observer whose state channel does nothing.

use std::{cell::Cell, rc::Rc};

use crate::{error::MotionError, state::State, subscription::Subscription};

// ============================================================================
// Observer Trait
// ============================================================================

pub trait Observer<T> {
  /// Receive the next value.
  fn next(&self, value: T);

  /// Receive the producer's activity. Ignored unless overridden.
  fn state(&self, _state: State) {}

  /// Receive an error raised while producing a value. The value itself is
  /// never delivered. Logged unless overridden.
  fn error(&self, err: MotionError) {
    tracing::error!(%err, "unhandled error in motion stream");
  }
}

impl<T, F> Observer<T> for F
where
  F: Fn(T),
{
  #[inline]
  fn next(&self, value: T) { self(value) }
}

// ============================================================================
// Callbacks
// ============================================================================

/// An observer assembled from closures, one per channel.
///
/// ```rust
/// use motion_streams::prelude::*;
///
/// let subject = Subject::new();
/// subject.subscribe_observer(
///   Callbacks::new(|v: i32| println!("value {v}")).on_state(|s| println!("state {s:?}")),
/// );
/// subject.next(1);
/// ```
pub struct Callbacks<T> {
  next: Box<dyn Fn(T)>,
  state: Option<Box<dyn Fn(State)>>,
  error: Option<Box<dyn Fn(MotionError)>>,
}

impl<T> Callbacks<T> {
  pub fn new(next: impl Fn(T) + 'static) -> Self {
    Callbacks { next: Box::new(next), state: None, error: None }
  }

  pub fn on_state(mut self, state: impl Fn(State) + 'static) -> Self {
    self.state = Some(Box::new(state));
    self
  }

  pub fn on_error(mut self, error: impl Fn(MotionError) + 'static) -> Self {
    self.error = Some(Box::new(error));
    self
  }
}

impl<T> Observer<T> for Callbacks<T> {
  #[inline]
  fn next(&self, value: T) { (self.next)(value) }

  fn state(&self, state: State) {
    if let Some(f) = &self.state {
      f(state)
    }
  }

  fn error(&self, err: MotionError) {
    match &self.error {
      Some(f) => f(err),
      None => tracing::error!(%err, "unhandled error in motion stream"),
    }
  }
}

// ============================================================================
// Subscriber
// ============================================================================

/// The downstream end handed to a producer.
///
/// Wraps the consumer's observer together with its subscription's closed
/// flag: once the consumer unsubscribes, nothing more is delivered, even if
/// the producer has not finished tearing down yet.
pub struct Subscriber<T> {
  observer: Rc<dyn Observer<T>>,
  closed: Rc<Cell<bool>>,
}

impl<T> Clone for Subscriber<T> {
  fn clone(&self) -> Self { Subscriber { observer: self.observer.clone(), closed: self.closed.clone() } }
}

impl<T> Subscriber<T> {
  pub(crate) fn new(observer: impl Observer<T> + 'static, subscription: &Subscription) -> Self {
    Subscriber { observer: Rc::new(observer), closed: subscription.closed_flag() }
  }

  #[inline]
  pub fn is_closed(&self) -> bool { self.closed.get() }
}

impl<T> Observer<T> for Subscriber<T> {
  #[inline]
  fn next(&self, value: T) {
    if !self.is_closed() {
      self.observer.next(value)
    }
  }

  #[inline]
  fn state(&self, state: State) {
    if !self.is_closed() {
      self.observer.state(state)
    }
  }

  #[inline]
  fn error(&self, err: MotionError) {
    if !self.is_closed() {
      self.observer.error(err)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::cell::RefCell;

  #[test]
  fn closure_gets_noop_state() {
    let seen = Rc::new(RefCell::new(vec![]));
    let s = seen.clone();
    let observer = move |v: i32| s.borrow_mut().push(v);
    observer.state(State::Active);
    Observer::next(&observer, 3);
    assert_eq!(*seen.borrow(), vec![3]);
  }

  #[test]
  fn subscriber_stops_after_close() {
    let seen = Rc::new(RefCell::new(vec![]));
    let states = Rc::new(RefCell::new(vec![]));
    let (s1, s2) = (seen.clone(), states.clone());
    let subscription = Subscription::empty();
    let subscriber = Subscriber::new(
      Callbacks::new(move |v: i32| s1.borrow_mut().push(v)).on_state(move |s| s2.borrow_mut().push(s)),
      &subscription,
    );

    subscriber.next(1);
    subscriber.state(State::Active);
    crate::subscription::SubscriptionLike::unsubscribe(&subscription);
    subscriber.next(2);
    subscriber.state(State::AtRest);

    assert_eq!(*seen.borrow(), vec![1]);
    assert_eq!(*states.borrow(), vec![State::Active]);
  }
}
