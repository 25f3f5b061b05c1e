use std::{
  future::Future,
  pin::Pin,
  rc::Rc,
  task::{Context, Poll},
  time::Instant,
};

use futures::{executor::LocalSpawner, task::LocalSpawnExt};

use super::{Duration, Scheduler, SchedulerRef, Task, TaskHandle, TaskState};

/// Runs tasks on a `futures` local executor, sleeping on real timers.
///
/// ```rust,no_run
/// use futures::executor::LocalPool;
/// use motion_streams::prelude::*;
///
/// let mut pool = LocalPool::new();
/// let scheduler = LocalScheduler::new(pool.spawner());
/// let spring = NumericSpring::new(scheduler);
/// spring.value().subscribe(|v| println!("{v}"));
/// spring.destination().write(100.);
/// pool.run();
/// ```
#[derive(Clone)]
pub struct LocalScheduler {
  spawner: LocalSpawner,
  origin: Instant,
}

impl LocalScheduler {
  pub fn new(spawner: LocalSpawner) -> Self { LocalScheduler { spawner, origin: Instant::now() } }
}

impl Scheduler for LocalScheduler {
  fn now(&self) -> Duration { self.origin.elapsed() }

  fn schedule(&self, delay: Duration, mut task: Task) -> TaskHandle {
    let handle = TaskHandle::new();
    let c_handle = handle.clone();
    let fut = async move {
      let mut wait = Some(delay);
      loop {
        match wait {
          Some(d) if !d.is_zero() => {
            futures_time::task::sleep(d.into()).await;
          }
          _ => YieldNow(false).await,
        }
        if c_handle.is_cancelled() {
          return;
        }
        wait = match task() {
          TaskState::Finished => {
            c_handle.mark_finished();
            return;
          }
          TaskState::Yield => None,
          TaskState::Sleeping(d) => Some(d),
        };
      }
    };
    if let Err(err) = self.spawner.spawn_local(fut) {
      tracing::error!(%err, "local scheduler could not spawn task");
    }
    handle
  }
}

impl From<LocalScheduler> for SchedulerRef {
  fn from(scheduler: LocalScheduler) -> Self { Rc::new(scheduler) }
}

/// Completes on its second poll, handing control back to the executor once.
struct YieldNow(bool);

impl Future for YieldNow {
  type Output = ();

  fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
    if self.0 {
      Poll::Ready(())
    } else {
      self.0 = true;
      cx.waker().wake_by_ref();
      Poll::Pending
    }
  }
}
