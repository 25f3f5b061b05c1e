//! Springs: values that animate towards a destination on a scheduler.
//!
//! A spring is configured entirely through [`ReactiveProperty`] handles, so
//! interactions can drive it with ordinary streams. Nothing moves until
//! [`Spring::value`] is subscribed; the first subscriber connects the
//! integrator and the last one to leave cancels its frame task. Later
//! subscribers join the running integrator and receive the current value.

use crate::{observable::MotionObservable, property::ReactiveProperty, state::State};

mod numeric_spring;
mod point_spring;

pub use numeric_spring::NumericSpring;
pub use point_spring::Point2DSpring;

pub const DEFAULT_TENSION: f64 = 342.;
pub const DEFAULT_FRICTION: f64 = 30.;
pub const DEFAULT_THRESHOLD: f64 = 0.001;

/// Initial physics of a spring.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpringConfig {
  pub tension: f64,
  pub friction: f64,
  /// Distance from the destination, and speed in units per millisecond,
  /// under which the spring counts as settled.
  pub threshold: f64,
}

impl Default for SpringConfig {
  fn default() -> Self {
    SpringConfig { tension: DEFAULT_TENSION, friction: DEFAULT_FRICTION, threshold: DEFAULT_THRESHOLD }
  }
}

pub trait Spring<T> {
  fn destination(&self) -> &ReactiveProperty<T>;

  /// Where the next motion starts. Written while disabled, it is applied
  /// when the spring is enabled again.
  fn initial_value(&self) -> &ReactiveProperty<T>;

  /// Velocity in units per millisecond.
  fn initial_velocity(&self) -> &ReactiveProperty<T>;

  fn tension(&self) -> &ReactiveProperty<f64>;

  fn friction(&self) -> &ReactiveProperty<f64>;

  fn threshold(&self) -> &ReactiveProperty<f64>;

  fn enabled(&self) -> &ReactiveProperty<bool>;

  /// The animated value. Its state channel reports the spring's activity.
  fn value(&self) -> MotionObservable<T>;

  fn state(&self) -> MotionObservable<State>;

  fn current_state(&self) -> State;
}
