use super::subscribers::{broadcast_error, broadcast_state, broadcast_value, Subscribers};
use crate::{
  error::MotionError,
  observer::{Observer, Subscriber},
  rc::{MutRc, RcDeref, RcDerefMut},
  state::State,
  subscription::Subscription,
};

/// Whether a subject remembers what it dispatched.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Memory {
  /// Remember the last value and state, replay them to new subscribers.
  Replay,
  /// Only forward; new subscribers see future dispatches only.
  Forget,
}

/// State shared by both subject variants.
pub(crate) struct SubjectCore<T> {
  memory: Memory,
  subscribers: Subscribers<T>,
  last_value: Option<T>,
  last_state: Option<State>,
}

impl<T: Clone + 'static> SubjectCore<T> {
  pub(crate) fn new(memory: Memory, initial: Option<T>) -> MutRc<Self> {
    MutRc::own(SubjectCore { memory, subscribers: Subscribers::default(), last_value: initial, last_state: None })
  }

  pub(crate) fn last_value(core: &MutRc<Self>) -> Option<T> { core.rc_deref().last_value.clone() }

  pub(crate) fn observer_count(core: &MutRc<Self>) -> usize { core.rc_deref().subscribers.len() }

  pub(crate) fn subscribe(core: &MutRc<Self>, observer: impl Observer<T> + 'static) -> Subscription {
    let subscription = Subscription::default();
    let subscriber = Subscriber::new(observer, &subscription);
    let (id, replay) = {
      let mut inner = core.rc_deref_mut();
      let id = inner.subscribers.add(subscriber.clone());
      let replay = match inner.memory {
        Memory::Replay => (inner.last_value.clone(), inner.last_state),
        Memory::Forget => (None, None),
      };
      (id, replay)
    };

    let c_core = core.clone();
    subscription.add_teardown(move || {
      c_core.rc_deref_mut().subscribers.remove(id);
    });

    if let Some(value) = replay.0 {
      subscriber.next(value);
    }
    if let Some(state) = replay.1 {
      subscriber.state(state);
    }
    subscription
  }

  pub(crate) fn next(core: &MutRc<Self>, value: T) {
    let observers = {
      let mut inner = core.rc_deref_mut();
      if inner.memory == Memory::Replay {
        inner.last_value = Some(value.clone());
      }
      inner.subscribers.snapshot()
    };
    broadcast_value(observers, value);
  }

  pub(crate) fn state(core: &MutRc<Self>, state: State) {
    let observers = {
      let mut inner = core.rc_deref_mut();
      if inner.memory == Memory::Replay {
        inner.last_state = Some(state);
      }
      inner.subscribers.snapshot()
    };
    broadcast_state(observers, state);
  }

  pub(crate) fn error(core: &MutRc<Self>, err: MotionError) {
    let observers = core.rc_deref().subscribers.snapshot();
    broadcast_error(observers, err);
  }
}
