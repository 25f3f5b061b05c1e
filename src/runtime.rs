//! The runtime: binds streams to sinks and aggregates their activity.
//!
//! ```rust
//! use motion_streams::prelude::*;
//!
//! let runtime = MotionRuntime::new();
//! let source = Subject::new();
//! let target = ReactiveProperty::new(0.);
//!
//! runtime.write(&source.observable(), target.clone());
//! source.state(State::Active);
//! source.next(12.);
//! assert_eq!(target.read(), 12.);
//! assert_eq!(runtime.state(), State::Active);
//! ```

use std::{
  cell::Cell,
  collections::BTreeMap,
  rc::{Rc, Weak},
};

use crate::{
  error::MotionError,
  observable::{MotionObservable, Subscribable},
  observer::Observer,
  property::{ReactiveProperty, Writable},
  rc::{MutRc, RcDeref, RcDerefMut},
  state::State,
  subscription::{Subscription, SubscriptionLike},
};

struct Binding {
  state: State,
  subscription: Option<Subscription>,
}

struct RuntimeInner {
  next_id: Cell<usize>,
  bindings: MutRc<BTreeMap<usize, Binding>>,
  aggregate: ReactiveProperty<State>,
}

impl RuntimeInner {
  fn report(&self, id: usize, state: State) {
    if let Some(binding) = self.bindings.rc_deref_mut().get_mut(&id) {
      binding.state = state;
    }
    self.recompute();
  }

  fn remove(&self, id: usize) {
    self.bindings.rc_deref_mut().remove(&id);
    self.recompute();
  }

  fn recompute(&self) {
    let aggregate = self
      .bindings
      .rc_deref()
      .values()
      .fold(State::AtRest, |acc, binding| acc | binding.state);
    if aggregate != self.aggregate.read() {
      tracing::trace!(?aggregate, "runtime activity changed");
      self.aggregate.write(aggregate);
    }
  }
}

/// Owner of a set of stream-to-sink bindings.
///
/// Clones share the same bindings.
#[derive(Clone)]
pub struct MotionRuntime {
  inner: Rc<RuntimeInner>,
}

impl Default for MotionRuntime {
  fn default() -> Self {
    MotionRuntime {
      inner: Rc::new(RuntimeInner {
        next_id: Cell::new(0),
        bindings: MutRc::own(BTreeMap::new()),
        aggregate: ReactiveProperty::new(State::AtRest),
      }),
    }
  }
}

impl MotionRuntime {
  pub fn new() -> Self { Self::default() }

  /// Write every value of `stream` into `to`.
  ///
  /// The binding's last reported state counts towards the aggregate until
  /// the returned subscription is unsubscribed.
  pub fn write<T, W>(&self, stream: &MotionObservable<T>, to: W) -> Subscription
  where
    T: 'static,
    W: Writable<T> + 'static,
  {
    let id = self.inner.next_id.get();
    self.inner.next_id.set(id + 1);
    self
      .inner
      .bindings
      .rc_deref_mut()
      .insert(id, Binding { state: State::AtRest, subscription: None });

    let subscription = stream.subscribe_observer(BindingObserver {
      sink: to,
      runtime: Rc::downgrade(&self.inner),
      id,
    });

    let runtime = Rc::downgrade(&self.inner);
    subscription.add_teardown(move || {
      if let Some(runtime) = runtime.upgrade() {
        runtime.remove(id);
      }
    });
    if let Some(binding) = self.inner.bindings.rc_deref_mut().get_mut(&id) {
      binding.subscription = Some(subscription.clone());
    }
    subscription
  }

  /// `Active` while any binding is active. Replays the current value.
  pub fn aggregate_state(&self) -> MotionObservable<State> { self.inner.aggregate.observable().dedupe() }

  pub fn state(&self) -> State { self.inner.aggregate.read() }

  pub fn binding_count(&self) -> usize { self.inner.bindings.rc_deref().len() }

  /// Release every binding.
  pub fn dispose(&self) {
    let subscriptions: Vec<_> = self
      .inner
      .bindings
      .rc_deref_mut()
      .values_mut()
      .filter_map(|binding| binding.subscription.take())
      .collect();
    tracing::debug!(bindings = subscriptions.len(), "disposing motion runtime");
    for subscription in subscriptions {
      subscription.unsubscribe();
    }
  }
}

pub struct BindingObserver<W> {
  sink: W,
  runtime: Weak<RuntimeInner>,
  id: usize,
}

impl<T, W: Writable<T>> Observer<T> for BindingObserver<W> {
  #[inline]
  fn next(&self, value: T) { self.sink.write(value) }

  fn state(&self, state: State) {
    if let Some(runtime) = self.runtime.upgrade() {
      runtime.report(self.id, state);
    }
  }

  fn error(&self, err: MotionError) {
    tracing::error!(%err, binding = self.id, "error reached a runtime binding");
  }
}
