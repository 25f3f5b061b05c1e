//! Subscription handles.
//!
//! A [`Subscription`] is returned by every `subscribe` call. It owns the
//! teardown logic of the connection it represents and runs it at most once,
//! no matter how many clones of the handle call `unsubscribe`.

use std::{
  cell::{Cell, RefCell},
  fmt::{Debug, Formatter},
  rc::Rc,
};

use smallvec::SmallVec;

use crate::util::isolate;

mod dynamic;
pub use dynamic::DynamicSubscriptions;

pub trait SubscriptionLike {
  /// Stop receiving values and release whatever the connection holds.
  /// Calling it again is a no-op.
  fn unsubscribe(&self);

  fn is_closed(&self) -> bool;
}

enum Teardown {
  Closure(Box<dyn FnOnce()>),
  Inner(Box<dyn SubscriptionLike>),
}

impl Teardown {
  fn run(self) {
    match self {
      Teardown::Closure(f) => f(),
      Teardown::Inner(s) => s.unsubscribe(),
    }
  }
}

struct Inner {
  closed: Rc<Cell<bool>>,
  teardown: RefCell<SmallVec<[Teardown; 1]>>,
}

/// Cloneable handle to one connection between a producer and a consumer.
///
/// Dropping the handle does not unsubscribe; use
/// [`Subscription::unsubscribe_when_dropped`] for scope-bound connections.
#[derive(Clone)]
pub struct Subscription(Rc<Inner>);

impl Default for Subscription {
  fn default() -> Self {
    Subscription(Rc::new(Inner {
      closed: Rc::new(Cell::new(false)),
      teardown: RefCell::new(SmallVec::new()),
    }))
  }
}

impl Subscription {
  /// A subscription whose teardown is `f`.
  pub fn new(f: impl FnOnce() + 'static) -> Self {
    let subscription = Subscription::default();
    subscription.add_teardown(f);
    subscription
  }

  /// A subscription with nothing to release.
  #[inline]
  pub fn empty() -> Self { Subscription::default() }

  /// Run `f` on unsubscribe, or right away if already closed.
  pub fn add_teardown(&self, f: impl FnOnce() + 'static) {
    self.push(Teardown::Closure(Box::new(f)));
  }

  /// Unsubscribe `other` together with this subscription.
  pub fn add(&self, other: impl SubscriptionLike + 'static) {
    self.push(Teardown::Inner(Box::new(other)));
  }

  fn push(&self, teardown: Teardown) {
    if self.is_closed() {
      teardown.run();
    } else {
      self.0.teardown.borrow_mut().push(teardown);
    }
  }

  /// The flag observers check before delivering.
  pub(crate) fn closed_flag(&self) -> Rc<Cell<bool>> { self.0.closed.clone() }

  pub fn unsubscribe_when_dropped(self) -> SubscriptionGuard { SubscriptionGuard(self) }
}

impl SubscriptionLike for Subscription {
  fn unsubscribe(&self) {
    if self.0.closed.replace(true) {
      return;
    }
    let teardown = std::mem::take(&mut *self.0.teardown.borrow_mut());
    for t in teardown {
      isolate("teardown", || t.run());
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.closed.get() }
}

impl Debug for Subscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Subscription")
      .field("is_closed", &self.is_closed())
      .field("teardown_count", &self.0.teardown.borrow().len())
      .finish()
  }
}

/// Unsubscribes the wrapped subscription when dropped.
#[must_use]
pub struct SubscriptionGuard(Subscription);

impl SubscriptionGuard {
  pub fn subscription(&self) -> &Subscription { &self.0 }
}

impl Drop for SubscriptionGuard {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}
