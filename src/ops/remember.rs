//! Sharing one upstream connection among many subscribers.

use crate::{
  error::MotionError,
  observable::{MotionObservable, Subscribable},
  observer::{Observer, Subscriber},
  rc::{MutRc, RcDerefMut},
  state::State,
  subject::{ReplaySubject, Subject},
  subscription::{Subscription, SubscriptionLike},
};

#[derive(Clone)]
enum Hub<T> {
  Forget(Subject<T>),
  Replay(ReplaySubject<T>),
}

impl<T: Clone + 'static> Hub<T> {
  fn new(replay: bool) -> Self {
    if replay {
      Hub::Replay(ReplaySubject::new())
    } else {
      Hub::Forget(Subject::new())
    }
  }

  fn subscribe(&self, observer: Subscriber<T>) -> Subscription {
    match self {
      Hub::Forget(s) => s.subscribe_observer(observer),
      Hub::Replay(s) => s.subscribe_observer(observer),
    }
  }
}

impl<T: Clone + 'static> Observer<T> for Hub<T> {
  fn next(&self, value: T) {
    match self {
      Hub::Forget(s) => s.next(value),
      Hub::Replay(s) => s.next(value),
    }
  }

  fn state(&self, state: State) {
    match self {
      Hub::Forget(s) => s.state(state),
      Hub::Replay(s) => s.state(state),
    }
  }

  fn error(&self, err: MotionError) {
    match self {
      Hub::Forget(s) => s.error(err),
      Hub::Replay(s) => s.error(err),
    }
  }
}

struct Connection<T> {
  hub: Option<Hub<T>>,
  upstream: Option<Subscription>,
  refs: usize,
}

impl<T: Clone + 'static> MotionObservable<T> {
  /// Share one upstream subscription and replay the latest value (and
  /// state) to late subscribers.
  ///
  /// Upstream is connected when the first subscriber arrives and released
  /// when the last one leaves. A later subscriber starts a fresh connection
  /// with an empty memory.
  pub fn remember(&self) -> MotionObservable<T> { self.share(true) }

  /// Like [`remember`](Self::remember) without the replay.
  pub fn multicast(&self) -> MotionObservable<T> { self.share(false) }

  fn share(&self, replay: bool) -> MotionObservable<T> {
    let source = self.clone();
    let connection = MutRc::own(Connection { hub: None, upstream: None, refs: 0 });
    MotionObservable::new(move |observer| {
      let (hub, connect) = {
        let mut c = connection.rc_deref_mut();
        c.refs += 1;
        match &c.hub {
          Some(hub) => (hub.clone(), false),
          None => {
            let hub = Hub::new(replay);
            c.hub = Some(hub.clone());
            (hub, true)
          }
        }
      };

      let subscription = hub.subscribe(observer);
      if connect {
        let upstream = source.subscribe_observer(hub);
        connection.rc_deref_mut().upstream = Some(upstream);
      }

      let connection = connection.clone();
      subscription.add_teardown(move || {
        let released = {
          let mut c = connection.rc_deref_mut();
          c.refs -= 1;
          if c.refs == 0 {
            c.hub = None;
            c.upstream.take()
          } else {
            None
          }
        };
        if let Some(upstream) = released {
          tracing::trace!("last subscriber left; releasing shared upstream");
          upstream.unsubscribe();
        }
      });
      subscription
    })
  }
}
