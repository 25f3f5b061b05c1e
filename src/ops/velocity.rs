//! Velocity of a timestamped stream, dispatched on demand.

use crate::{
  error::MotionError,
  gesture::{VelocityConfig, VelocityTracker},
  observable::{MotionObservable, Subscribable},
  observer::{Observer, Subscriber},
  rc::{MutRc, RcDeref, RcDerefMut},
  state::State,
  subscription::Subscription,
  values::{Point2D, Sample},
};

impl MotionObservable<Sample<Point2D>> {
  /// Emit the velocity of this stream, in units per millisecond, each time
  /// `pulse` emits.
  ///
  /// The estimate covers the trailing samples that are still recent at the
  /// pulse's timestamp, so a pulse long after the last sample reports zero.
  /// Values of this stream alone never emit; its state and errors are
  /// forwarded.
  pub fn velocity<U: 'static>(&self, pulse: &MotionObservable<Sample<U>>) -> MotionObservable<Point2D> {
    self.velocity_with(pulse, VelocityConfig::default())
  }

  pub fn velocity_with<U: 'static>(
    &self,
    pulse: &MotionObservable<Sample<U>>,
    config: VelocityConfig,
  ) -> MotionObservable<Point2D> {
    let source = self.clone();
    let pulse = pulse.clone();
    MotionObservable::new(move |observer| {
      let tracker = MutRc::own(VelocityTracker::new(config));
      let subscription = Subscription::default();
      subscription.add(source.subscribe_observer(VelocitySampleObserver {
        observer: observer.clone(),
        tracker: tracker.clone(),
      }));
      subscription.add(pulse.subscribe_observer(VelocityPulseObserver { observer, tracker }));
      subscription
    })
  }

  /// [`velocity`](Self::velocity) pulsed by this stream itself.
  pub fn trailing_velocity(&self) -> MotionObservable<Point2D> { self.velocity(self) }
}

impl MotionObservable<Sample<f64>> {
  /// Scalar counterpart of the point velocity.
  pub fn scalar_velocity<U: 'static>(&self, pulse: &MotionObservable<Sample<U>>) -> MotionObservable<f64> {
    self
      .map(|s| Sample::new(Point2D::new(s.value, 0.), s.timestamp))
      .velocity(pulse)
      .map(|v| v.x)
  }
}

pub struct VelocitySampleObserver<O> {
  observer: O,
  tracker: MutRc<VelocityTracker>,
}

impl Observer<Sample<Point2D>> for VelocitySampleObserver<Subscriber<Point2D>> {
  fn next(&self, sample: Sample<Point2D>) { self.tracker.rc_deref_mut().add(sample) }

  fn state(&self, state: State) { self.observer.state(state) }

  fn error(&self, err: MotionError) { self.observer.error(err) }
}

pub struct VelocityPulseObserver<O> {
  observer: O,
  tracker: MutRc<VelocityTracker>,
}

impl<U> Observer<Sample<U>> for VelocityPulseObserver<Subscriber<Point2D>> {
  fn next(&self, pulse: Sample<U>) {
    let velocity = self.tracker.rc_deref().velocity_at(pulse.timestamp);
    self.observer.next(velocity);
  }

  fn error(&self, err: MotionError) { self.observer.error(err) }
}
