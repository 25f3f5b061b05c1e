use std::{cell::Cell, rc::Rc};

use crate::{
  error::MotionError,
  observable::{MotionObservable, Subscribable},
  observer::{Observer, Subscriber},
  rc::{MutRc, RcDerefMut},
  scheduler::{Duration, SchedulerRef, TaskHandle},
  state::State,
  subscription::DynamicSubscriptions,
};

impl<T: 'static> MotionObservable<T> {
  /// Re-emit every value, state and error `delay` later on `scheduler`.
  ///
  /// Deliveries still pending when the subscription closes are cancelled.
  pub fn delay_by(&self, delay: Duration, scheduler: impl Into<SchedulerRef>) -> MotionObservable<T> {
    let source = self.clone();
    let scheduler = scheduler.into();
    MotionObservable::new(move |observer| {
      let pending = MutRc::own(DynamicSubscriptions::new());
      let subscription = source.subscribe_observer(DelayObserver {
        observer,
        delay,
        scheduler: scheduler.clone(),
        pending: pending.clone(),
      });
      subscription.add_teardown(move || pending.rc_deref_mut().unsubscribe_all());
      subscription
    })
  }
}

pub struct DelayObserver<O> {
  observer: O,
  delay: Duration,
  scheduler: SchedulerRef,
  pending: MutRc<DynamicSubscriptions<TaskHandle>>,
}

impl<T: 'static> DelayObserver<Subscriber<T>> {
  fn defer(&self, deliver: impl FnOnce(&Subscriber<T>) + 'static) {
    let observer = self.observer.clone();
    let pending = self.pending.clone();
    let id = Rc::new(Cell::new(None));
    let task_id = id.clone();
    let handle = self.scheduler.schedule_once(self.delay, move || {
      if let Some(id) = task_id.get() {
        pending.rc_deref_mut().remove(id);
      }
      deliver(&observer);
    });
    if !handle.is_finished() {
      id.set(Some(self.pending.rc_deref_mut().add(handle)));
    }
  }
}

impl<T: 'static> Observer<T> for DelayObserver<Subscriber<T>> {
  fn next(&self, value: T) { self.defer(move |o| o.next(value)) }

  fn state(&self, state: State) { self.defer(move |o| o.state(state)) }

  fn error(&self, err: MotionError) { self.defer(move |o| o.error(err)) }
}
