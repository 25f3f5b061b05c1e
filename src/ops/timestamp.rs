use crate::{
  observable::MotionObservable,
  scheduler::SchedulerRef,
  values::Sample,
};

impl<T: 'static> MotionObservable<T> {
  /// Pair every value with the scheduler's clock reading at arrival.
  pub fn timestamp(&self, scheduler: impl Into<SchedulerRef>) -> MotionObservable<Sample<T>> {
    let scheduler = scheduler.into();
    self.map(move |value| Sample::new(value, scheduler.now()))
  }
}
