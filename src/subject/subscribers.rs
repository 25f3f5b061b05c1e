use smallvec::SmallVec;

use crate::{
  error::MotionError,
  observer::{Observer, Subscriber},
  state::State,
  subscription::DynamicSubscriptions,
  util::isolate,
};

/// The observers attached to a subject, in subscription order.
///
/// Dispatch never iterates the live list. Callers take a [`snapshot`] while
/// holding the subject's borrow, release the borrow, then hand the snapshot
/// to one of the `broadcast_*` functions. Observers that subscribe or
/// unsubscribe mid-dispatch therefore cannot shift the iteration.
///
/// [`snapshot`]: Subscribers::snapshot
pub struct Subscribers<T> {
  inner: DynamicSubscriptions<Subscriber<T>>,
}

pub(crate) type Snapshot<T> = SmallVec<[Subscriber<T>; 2]>;

impl<T> Default for Subscribers<T> {
  fn default() -> Self { Self { inner: DynamicSubscriptions::default() } }
}

impl<T> Subscribers<T> {
  #[inline]
  pub fn add(&mut self, observer: Subscriber<T>) -> usize { self.inner.add(observer) }

  #[inline]
  pub fn remove(&mut self, id: usize) -> Option<Subscriber<T>> { self.inner.remove(id) }

  #[inline]
  pub fn len(&self) -> usize { self.inner.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.inner.is_empty() }

  #[inline]
  pub fn snapshot(&self) -> Snapshot<T> { self.inner.snapshot() }
}

/// Deliver `value` to every observer of the snapshot. The last observer
/// receives the moved value, the rest receive clones.
///
/// A panicking observer is logged and skipped; the rest still receive the
/// value.
pub(crate) fn broadcast_value<T: Clone>(observers: Snapshot<T>, value: T) {
  let mut iter = observers.into_iter().peekable();
  while let Some(observer) = iter.next() {
    if iter.peek().is_some() {
      let v = value.clone();
      isolate("subject next", || observer.next(v));
    } else {
      isolate("subject next", || observer.next(value));
      break;
    }
  }
}

pub(crate) fn broadcast_state<T>(observers: Snapshot<T>, state: State) {
  for observer in observers {
    isolate("subject state", || observer.state(state));
  }
}

pub(crate) fn broadcast_error<T>(observers: Snapshot<T>, err: MotionError) {
  for observer in observers {
    let err = err.clone();
    isolate("subject error", || observer.error(err));
  }
}
