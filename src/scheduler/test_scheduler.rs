//! Test Scheduler for deterministic testing of time-based operators.
//!
//! Virtual time only advances when the test says so. Tasks run synchronously
//! inside `advance_by`/`flush`, in order of their scheduled time and FIFO
//! among tasks due at the same instant.
//!
//! ```rust
//! use std::time::Duration;
//! use motion_streams::prelude::*;
//!
//! let scheduler = TestScheduler::new();
//! let subject = Subject::new();
//! subject
//!   .observable()
//!   .delay_by(Duration::from_millis(100), scheduler.clone())
//!   .subscribe(|v: i32| println!("{v}"));
//! subject.next(1);
//!
//! scheduler.advance_by(Duration::from_millis(100));
//! ```
//!
//! Each `TestScheduler::new()` owns an independent clock; clones share it.

use std::{cmp::Ordering, collections::BinaryHeap, rc::Rc};

use super::{Duration, Scheduler, SchedulerRef, Task, TaskHandle, TaskState};
use crate::rc::{MutRc, RcDeref, RcDerefMut};

/// Upper bound on task runs per `flush`/`advance_by`, so a task that keeps
/// yielding cannot hang a test.
const MAX_STEPS: usize = 1_000_000;

// ==================== Internal State ====================

#[derive(Default)]
struct TestSchedulerState {
  virtual_time: Duration,
  task_queue: BinaryHeap<ScheduledTask>,
  next_task_id: usize,
}

struct ScheduledTask {
  scheduled_time: Duration,
  task_id: usize,
  task: Task,
  handle: TaskHandle,
}

impl PartialEq for ScheduledTask {
  fn eq(&self, other: &Self) -> bool {
    self.scheduled_time == other.scheduled_time && self.task_id == other.task_id
  }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for ScheduledTask {
  fn cmp(&self, other: &Self) -> Ordering {
    // Min-heap: earlier times first, then FIFO by task_id
    other
      .scheduled_time
      .cmp(&self.scheduled_time)
      .then_with(|| other.task_id.cmp(&self.task_id))
  }
}

impl TestSchedulerState {
  fn push(&mut self, delay: Duration, task: Task, handle: TaskHandle) {
    let task_id = self.next_task_id;
    self.next_task_id += 1;
    self.task_queue.push(ScheduledTask {
      scheduled_time: self.virtual_time + delay,
      task_id,
      task,
      handle,
    });
  }
}

// ==================== TestScheduler ====================

/// A virtual time scheduler for deterministic testing.
#[derive(Clone, Default)]
pub struct TestScheduler {
  state: MutRc<TestSchedulerState>,
}

impl TestScheduler {
  pub fn new() -> Self { Self::default() }

  /// Pending tasks, cancelled ones included until they are reached.
  pub fn pending_count(&self) -> usize { self.state.rc_deref().task_queue.len() }

  pub fn is_empty(&self) -> bool { self.state.rc_deref().task_queue.is_empty() }

  /// Advance virtual time by `duration`, running every task due on the way.
  pub fn advance_by(&self, duration: Duration) {
    let target = self.state.rc_deref().virtual_time + duration;
    self.execute_tasks_until(Some(target));
    self.state.rc_deref_mut().virtual_time = target;
  }

  /// Run tasks, jumping the clock to each one, until the queue is empty.
  pub fn flush(&self) { self.execute_tasks_until(None); }

  fn execute_tasks_until(&self, target_time: Option<Duration>) {
    for _ in 0..MAX_STEPS {
      let task = {
        let mut state = self.state.rc_deref_mut();
        let due = state
          .task_queue
          .peek()
          .is_some_and(|peek| target_time.map_or(true, |limit| peek.scheduled_time <= limit));
        if !due {
          return;
        }
        let task = state.task_queue.pop();
        if let Some(t) = &task {
          state.virtual_time = t.scheduled_time;
        }
        task
      };

      let Some(mut scheduled_task) = task else {
        return;
      };
      if scheduled_task.handle.is_cancelled() {
        continue;
      }

      // No borrow is held here: tasks may schedule more tasks.
      match (scheduled_task.task)() {
        TaskState::Finished => scheduled_task.handle.mark_finished(),
        TaskState::Yield => self.reschedule(scheduled_task, Duration::ZERO),
        TaskState::Sleeping(delay) => self.reschedule(scheduled_task, delay),
      }
    }
    tracing::warn!(steps = MAX_STEPS, "test scheduler stopped after step limit");
  }

  fn reschedule(&self, scheduled_task: ScheduledTask, delay: Duration) {
    self.state.rc_deref_mut().push(delay, scheduled_task.task, scheduled_task.handle);
  }
}

impl Scheduler for TestScheduler {
  fn now(&self) -> Duration { self.state.rc_deref().virtual_time }

  fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
    let handle = TaskHandle::new();
    self.state.rc_deref_mut().push(delay, task, handle.clone());
    handle
  }
}

impl From<TestScheduler> for SchedulerRef {
  fn from(scheduler: TestScheduler) -> Self { Rc::new(scheduler) }
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;

  use super::*;
  use crate::subscription::SubscriptionLike;

  fn ms(v: u64) -> Duration { Duration::from_millis(v) }

  #[test]
  fn runs_tasks_in_time_then_fifo_order() {
    let scheduler = TestScheduler::new();
    let log = Rc::new(RefCell::new(vec![]));
    let shared: SchedulerRef = scheduler.clone().into();
    for (tag, delay) in [("b", 20), ("a", 10), ("c", 20)] {
      let l = log.clone();
      shared.schedule_once(ms(delay), move || l.borrow_mut().push(tag));
    }

    scheduler.advance_by(ms(10));
    assert_eq!(*log.borrow(), vec!["a"]);
    assert_eq!(scheduler.now(), ms(10));

    scheduler.advance_by(ms(10));
    assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
  }

  #[test]
  fn cancelled_tasks_never_run() {
    let scheduler = TestScheduler::new();
    let shared: SchedulerRef = scheduler.clone().into();
    let hit = Rc::new(RefCell::new(false));
    let h = hit.clone();
    let handle = shared.schedule_once(ms(5), move || *h.borrow_mut() = true);
    handle.unsubscribe();

    scheduler.flush();
    assert!(!*hit.borrow());
    assert!(scheduler.is_empty());
  }

  #[test]
  fn repeating_task_sleeps_between_runs() {
    let scheduler = TestScheduler::new();
    let shared: SchedulerRef = scheduler.clone().into();
    let stamps = Rc::new(RefCell::new(vec![]));
    let (s, clock) = (stamps.clone(), scheduler.clone());
    let handle = shared.schedule_repeating(ms(16), move || {
      s.borrow_mut().push(clock.now());
      s.borrow().len() < 3
    });

    scheduler.flush();
    assert_eq!(*stamps.borrow(), vec![ms(16), ms(32), ms(48)]);
    assert!(handle.is_finished());
  }

  #[test]
  fn tasks_can_schedule_tasks() {
    let scheduler = TestScheduler::new();
    let shared: SchedulerRef = scheduler.clone().into();
    let log = Rc::new(RefCell::new(vec![]));
    let (l, inner) = (log.clone(), shared.clone());
    shared.schedule_once(ms(1), move || {
      l.borrow_mut().push(1);
      let l = l.clone();
      inner.schedule_once(ms(1), move || l.borrow_mut().push(2));
    });

    scheduler.advance_by(ms(2));
    assert_eq!(*log.borrow(), vec![1, 2]);
  }
}
