use std::rc::Rc;

use super::{Spring, SpringConfig};
use crate::{
  observable::{MotionObservable, Subscribable},
  observer::{Observer, Subscriber},
  property::ReactiveProperty,
  rc::{MutRc, RcDeref, RcDerefMut},
  scheduler::{Duration, SchedulerRef, TaskHandle},
  state::State,
  subscription::{Subscription, SubscriptionLike},
};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const MAX_FRAME_DELTA: Duration = Duration::from_millis(64);
/// Integrator substep, in seconds.
const SOLVER_TIMESTEP: f64 = 0.001;

#[derive(Clone)]
struct Properties {
  destination: ReactiveProperty<f64>,
  initial_value: ReactiveProperty<f64>,
  initial_velocity: ReactiveProperty<f64>,
  tension: ReactiveProperty<f64>,
  friction: ReactiveProperty<f64>,
  threshold: ReactiveProperty<f64>,
  enabled: ReactiveProperty<bool>,
  state: ReactiveProperty<State>,
}

/// A damped spring over a single `f64`, integrated with RK4.
///
/// ```rust
/// use std::time::Duration;
/// use motion_streams::prelude::*;
///
/// let scheduler = TestScheduler::new();
/// let spring = NumericSpring::new(scheduler.clone());
/// let latest = ReactiveProperty::new(0.);
/// spring.value().subscribe_observer(latest.clone());
///
/// spring.destination().write(100.);
/// scheduler.advance_by(Duration::from_secs(3));
/// assert_eq!(latest.read(), 100.);
/// assert_eq!(spring.current_state(), State::AtRest);
/// ```
#[derive(Clone)]
pub struct NumericSpring {
  props: Properties,
  value: MotionObservable<f64>,
}

impl NumericSpring {
  pub fn new(scheduler: impl Into<SchedulerRef>) -> Self { Self::with_config(scheduler, SpringConfig::default()) }

  pub fn with_config(scheduler: impl Into<SchedulerRef>, config: SpringConfig) -> Self {
    let props = Properties {
      destination: ReactiveProperty::new(0.),
      initial_value: ReactiveProperty::new(0.),
      initial_velocity: ReactiveProperty::new(0.),
      tension: ReactiveProperty::new(config.tension),
      friction: ReactiveProperty::new(config.friction),
      threshold: ReactiveProperty::new(config.threshold),
      enabled: ReactiveProperty::new(true),
      state: ReactiveProperty::new(State::AtRest),
    };
    let scheduler = scheduler.into();
    let connect_props = props.clone();
    let value =
      MotionObservable::new(move |observer| connect(&connect_props, &scheduler, observer)).remember();
    NumericSpring { props, value }
  }
}

impl Spring<f64> for NumericSpring {
  fn destination(&self) -> &ReactiveProperty<f64> { &self.props.destination }

  fn initial_value(&self) -> &ReactiveProperty<f64> { &self.props.initial_value }

  fn initial_velocity(&self) -> &ReactiveProperty<f64> { &self.props.initial_velocity }

  fn tension(&self) -> &ReactiveProperty<f64> { &self.props.tension }

  fn friction(&self) -> &ReactiveProperty<f64> { &self.props.friction }

  fn threshold(&self) -> &ReactiveProperty<f64> { &self.props.threshold }

  fn enabled(&self) -> &ReactiveProperty<bool> { &self.props.enabled }

  fn value(&self) -> MotionObservable<f64> { self.value.clone() }

  fn state(&self) -> MotionObservable<State> { self.props.state.observable() }

  fn current_state(&self) -> State { self.props.state.read() }
}

// ==================== Integrator ====================

struct Motion {
  position: f64,
  /// Units per second.
  velocity: f64,
  destination: f64,
  tension: f64,
  friction: f64,
  threshold: f64,
  initialized: bool,
  // Writes received while disabled, applied on the next enable.
  value_dirty: bool,
  velocity_dirty: bool,
  frames: Option<TaskHandle>,
  last_frame: Duration,
}

impl Motion {
  #[inline]
  fn acceleration(&self, position: f64, velocity: f64) -> f64 {
    -self.tension * (position - self.destination) - self.friction * velocity
  }

  fn step(&mut self, dt: f64) {
    let (x, v) = (self.position, self.velocity);

    let a_v = v;
    let a_a = self.acceleration(x, v);

    let b_v = v + a_a * dt * 0.5;
    let b_a = self.acceleration(x + a_v * dt * 0.5, b_v);

    let c_v = v + b_a * dt * 0.5;
    let c_a = self.acceleration(x + b_v * dt * 0.5, c_v);

    let d_v = v + c_a * dt;
    let d_a = self.acceleration(x + c_v * dt, d_v);

    self.position += (a_v + 2. * (b_v + c_v) + d_v) / 6. * dt;
    self.velocity += (a_a + 2. * (b_a + c_a) + d_a) / 6. * dt;
  }

  fn advance(&mut self, elapsed: Duration) {
    let seconds = elapsed.min(MAX_FRAME_DELTA).as_secs_f64();
    let steps = (seconds / SOLVER_TIMESTEP).ceil() as usize;
    if steps == 0 {
      return;
    }
    let dt = seconds / steps as f64;
    for _ in 0..steps {
      self.step(dt);
    }
  }

  fn is_at_rest(&self) -> bool {
    self.velocity.abs() <= self.threshold * 1000. && (self.destination - self.position).abs() <= self.threshold
  }

  fn snap(&mut self) {
    self.position = self.destination;
    self.velocity = 0.;
  }
}

struct Driver {
  motion: MutRc<Motion>,
  props: Properties,
  observer: Subscriber<f64>,
  scheduler: SchedulerRef,
}

impl Driver {
  fn emit(&self) {
    let position = self.motion.rc_deref().position;
    self.observer.next(position);
  }

  fn report(&self, state: State) {
    if self.props.state.read() != state {
      self.props.state.write(state);
    }
    self.observer.state(state);
  }

  /// Start the frame loop unless the spring is already running or settled.
  /// Returns whether frames are running afterwards.
  fn start(self: &Rc<Self>) -> bool {
    {
      let mut motion = self.motion.rc_deref_mut();
      if motion.frames.is_some() {
        return true;
      }
      if motion.is_at_rest() {
        motion.snap();
        return false;
      }
      motion.last_frame = self.scheduler.now();
    }

    tracing::debug!(destination = self.motion.rc_deref().destination, "spring activated");
    self.report(State::Active);
    let driver = self.clone();
    let handle = self.scheduler.schedule_repeating(FRAME_INTERVAL, move || driver.frame());
    self.motion.rc_deref_mut().frames = Some(handle);
    true
  }

  fn frame(&self) -> bool {
    let now = self.scheduler.now();
    let (position, settled) = {
      let mut motion = self.motion.rc_deref_mut();
      let elapsed = now.saturating_sub(motion.last_frame);
      motion.last_frame = now;
      motion.advance(elapsed);
      let settled = motion.is_at_rest();
      if settled {
        motion.snap();
        motion.frames = None;
      }
      (motion.position, settled)
    };

    self.observer.next(position);
    if settled {
      tracing::debug!(position, "spring at rest");
      self.report(State::AtRest);
    }
    !settled
  }

  /// Halt where the spring currently is.
  fn stop(&self) {
    let frames = {
      let mut motion = self.motion.rc_deref_mut();
      let frames = motion.frames.take();
      if frames.is_some() {
        motion.velocity = 0.;
        motion.destination = motion.position;
      }
      frames
    };
    if let Some(frames) = frames {
      frames.unsubscribe();
      self.report(State::AtRest);
    }
  }
}

fn connect(props: &Properties, scheduler: &SchedulerRef, observer: Subscriber<f64>) -> Subscription {
  let driver = Rc::new(Driver {
    motion: MutRc::own(Motion {
      position: props.initial_value.read(),
      velocity: 1000. * props.initial_velocity.read(),
      destination: props.destination.read(),
      tension: props.tension.read(),
      friction: props.friction.read(),
      threshold: props.threshold.read(),
      initialized: false,
      value_dirty: false,
      velocity_dirty: false,
      frames: None,
      last_frame: scheduler.now(),
    }),
    props: props.clone(),
    observer,
    scheduler: scheduler.clone(),
  });
  let subscription = Subscription::default();

  let d = driver.clone();
  subscription.add(props.tension.subscribe(move |v| d.motion.rc_deref_mut().tension = v));
  let d = driver.clone();
  subscription.add(props.friction.subscribe(move |v| d.motion.rc_deref_mut().friction = v));
  let d = driver.clone();
  subscription.add(props.threshold.subscribe(move |v| d.motion.rc_deref_mut().threshold = v));

  let d = driver.clone();
  subscription.add(props.initial_velocity.subscribe(move |v: f64| {
    let restart = {
      let mut motion = d.motion.rc_deref_mut();
      if d.props.enabled.read() {
        motion.velocity = 1000. * v;
        motion.initialized
      } else {
        motion.velocity_dirty = true;
        false
      }
    };
    if restart {
      d.start();
    }
  }));

  let d = driver.clone();
  subscription.add(props.initial_value.subscribe(move |v: f64| {
    let reposition = {
      let mut motion = d.motion.rc_deref_mut();
      if d.props.enabled.read() {
        motion.position = v;
        motion.initialized
      } else {
        motion.value_dirty = true;
        false
      }
    };
    if reposition {
      d.emit();
      d.start();
    }
  }));

  let d = driver.clone();
  subscription.add(props.enabled.subscribe(move |enabled: bool| {
    if !d.motion.rc_deref().initialized {
      return;
    }
    if enabled {
      let resumed_at = {
        let mut motion = d.motion.rc_deref_mut();
        if std::mem::take(&mut motion.value_dirty) {
          motion.position = d.props.initial_value.read();
        }
        if std::mem::take(&mut motion.velocity_dirty) {
          motion.velocity = 1000. * d.props.initial_velocity.read();
        }
        motion.destination = d.props.destination.read();
        motion.position
      };
      // Emitted before any frame, so combined axes never pair a fresh value
      // with a stale one.
      d.emit();
      if !d.start() && d.motion.rc_deref().position != resumed_at {
        d.emit();
      }
    } else {
      d.stop();
    }
  }));

  let d = driver.clone();
  subscription.add(props.destination.subscribe(move |destination: f64| {
    if !d.props.enabled.read() {
      return;
    }
    d.motion.rc_deref_mut().destination = destination;
    if !d.start() {
      d.emit();
    }
  }));

  driver.motion.rc_deref_mut().initialized = true;
  subscription.add_teardown(move || driver.stop());
  subscription
}
