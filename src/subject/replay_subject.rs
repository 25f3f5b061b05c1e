use super::subject_core::{Memory, SubjectCore};
use crate::{
  error::MotionError,
  observable::{MotionObservable, Subscribable},
  observer::Observer,
  rc::MutRc,
  state::State,
  subscription::Subscription,
};

/// A multicast subject that replays its most recent value (and state) to
/// each new subscriber.
///
/// Replay happens synchronously inside `subscribe`, before it returns.
/// A subject that has never received a value replays nothing.
pub struct ReplaySubject<T> {
  core: MutRc<SubjectCore<T>>,
}

impl<T> Clone for ReplaySubject<T> {
  #[inline]
  fn clone(&self) -> Self { ReplaySubject { core: self.core.clone() } }
}

impl<T: Clone + 'static> Default for ReplaySubject<T> {
  fn default() -> Self { ReplaySubject { core: SubjectCore::new(Memory::Replay, None) } }
}

impl<T: Clone + 'static> ReplaySubject<T> {
  #[inline]
  pub fn new() -> Self { Self::default() }

  /// A subject that already holds `value`, as if it had been dispatched.
  pub fn with_value(value: T) -> Self { ReplaySubject { core: SubjectCore::new(Memory::Replay, Some(value)) } }

  #[inline]
  pub fn next(&self, value: T) { SubjectCore::next(&self.core, value) }

  #[inline]
  pub fn state(&self, state: State) { SubjectCore::state(&self.core, state) }

  #[inline]
  pub fn error(&self, err: MotionError) { SubjectCore::error(&self.core, err) }

  /// The value that the next subscriber would receive.
  #[inline]
  pub fn last_value(&self) -> Option<T> { SubjectCore::last_value(&self.core) }

  #[inline]
  pub fn observer_count(&self) -> usize { SubjectCore::observer_count(&self.core) }
}

impl<T: Clone + 'static> Observer<T> for ReplaySubject<T> {
  #[inline]
  fn next(&self, value: T) { ReplaySubject::next(self, value) }
  #[inline]
  fn state(&self, state: State) { ReplaySubject::state(self, state) }
  #[inline]
  fn error(&self, err: MotionError) { ReplaySubject::error(self, err) }
}

impl<T: Clone + 'static> Subscribable<T> for ReplaySubject<T> {
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
