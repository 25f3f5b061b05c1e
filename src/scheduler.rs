//! Scheduling: the only place where time passes.
//!
//! Everything in a motion pipeline runs synchronously except work handed to
//! a [`Scheduler`]: delayed deliveries and spring frames. Schedulers are
//! passed explicitly to whatever needs them, so tests can substitute a
//! [`TestScheduler`] and drive virtual time by hand.

use std::{cell::Cell, rc::Rc};

pub use std::time::Duration;

use crate::subscription::SubscriptionLike;

mod test_scheduler;
pub use test_scheduler::TestScheduler;

#[cfg(all(feature = "timer", not(target_arch = "wasm32")))]
mod local_scheduler;
#[cfg(all(feature = "timer", not(target_arch = "wasm32")))]
pub use local_scheduler::LocalScheduler;

/// What a scheduled task wants after it has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
  /// Done; drop the task.
  Finished,
  /// Run again as soon as possible.
  Yield,
  /// Run again after the given duration.
  Sleeping(Duration),
}

pub type Task = Box<dyn FnMut() -> TaskState>;

pub trait Scheduler {
  /// Time elapsed on this scheduler's clock.
  fn now(&self) -> Duration;

  /// Run `task` after `delay`, then keep running it for as long as it asks
  /// to be rescheduled.
  fn schedule(&self, delay: Duration, task: Task) -> TaskHandle;
}

/// Shared handle to a scheduler, as stored by operators and springs.
pub type SchedulerRef = Rc<dyn Scheduler>;

impl dyn Scheduler {
  /// Run `f` once after `delay`.
  pub fn schedule_once(&self, delay: Duration, f: impl FnOnce() + 'static) -> TaskHandle {
    let mut f = Some(f);
    self.schedule(
      delay,
      Box::new(move || {
        if let Some(f) = f.take() {
          f();
        }
        TaskState::Finished
      }),
    )
  }

  /// Run `f` every `interval` until it returns `false` or the handle is
  /// cancelled. The first run happens after one interval.
  pub fn schedule_repeating(&self, interval: Duration, mut f: impl FnMut() -> bool + 'static) -> TaskHandle {
    self.schedule(
      interval,
      Box::new(move || if f() { TaskState::Sleeping(interval) } else { TaskState::Finished }),
    )
  }
}

/// Cancellation handle for a scheduled task.
#[derive(Clone, Default, Debug)]
pub struct TaskHandle {
  cancelled: Rc<Cell<bool>>,
  finished: Rc<Cell<bool>>,
}

impl TaskHandle {
  pub fn new() -> Self { Self::default() }

  #[inline]
  pub fn is_finished(&self) -> bool { self.finished.get() }

  #[inline]
  pub(crate) fn is_cancelled(&self) -> bool { self.cancelled.get() }

  #[inline]
  pub(crate) fn mark_finished(&self) { self.finished.set(true) }
}

impl SubscriptionLike for TaskHandle {
  #[inline]
  fn unsubscribe(&self) { self.cancelled.set(true) }

  #[inline]
  fn is_closed(&self) -> bool { self.cancelled.get() || self.finished.get() }
}
