//! Pointer gestures.
//!
//! A gesture system consumes a stream of [`PointerEvent`]s and turns it into
//! recognized motion. [`DragSystem`] is the only recognizer so far; toss and
//! swipe in [`interactions`](crate::interactions) build on it.

use std::{fmt, str::FromStr};

use crate::{
  error::MotionError,
  values::{Point2D, Sample},
};

mod drag;
mod velocity;

pub use drag::{DragConfig, DragSystem, DEFAULT_RECOGNITION_THRESHOLD};
pub use velocity::{VelocityConfig, VelocityTracker};

/// Where a gesture is in its life cycle.
///
/// A continuous gesture moves `Possible → Began → Changed* → Ended →
/// Possible`. `Cancelled` replaces `Ended` when the owner aborts, and
/// `Recognized` marks the instant a gesture settles into a discrete outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GestureRecognitionState {
  #[default]
  Possible,
  Began,
  Changed,
  Ended,
  Recognized,
  Cancelled,
}

impl GestureRecognitionState {
  /// `Began` or `Changed`.
  #[inline]
  pub fn is_in_progress(self) -> bool {
    matches!(self, GestureRecognitionState::Began | GestureRecognitionState::Changed)
  }
}

/// Axis a gesture is locked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
  X,
  Y,
  #[default]
  Both,
}

impl Axis {
  /// Zero the component this axis ignores.
  #[inline]
  pub fn constrain(self, p: Point2D) -> Point2D {
    match self {
      Axis::X => Point2D::new(p.x, 0.),
      Axis::Y => Point2D::new(0., p.y),
      Axis::Both => p,
    }
  }
}

impl FromStr for Axis {
  type Err = MotionError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "x" => Ok(Axis::X),
      "y" => Ok(Axis::Y),
      "both" | "all" => Ok(Axis::Both),
      other => Err(MotionError::config(format!("unsupported gesture axis {other:?}"))),
    }
  }
}

impl fmt::Display for Axis {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Axis::X => "x",
      Axis::Y => "y",
      Axis::Both => "both",
    })
  }
}

/// One reading from a pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
  Down(Sample<Point2D>),
  Move(Sample<Point2D>),
  Up(Sample<Point2D>),
}

impl PointerEvent {
  pub fn down(position: Point2D, timestamp: std::time::Duration) -> Self {
    PointerEvent::Down(Sample::new(position, timestamp))
  }

  pub fn moved(position: Point2D, timestamp: std::time::Duration) -> Self {
    PointerEvent::Move(Sample::new(position, timestamp))
  }

  pub fn up(position: Point2D, timestamp: std::time::Duration) -> Self {
    PointerEvent::Up(Sample::new(position, timestamp))
  }

  #[inline]
  pub fn sample(&self) -> Sample<Point2D> {
    match self {
      PointerEvent::Down(s) | PointerEvent::Move(s) | PointerEvent::Up(s) => *s,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn axis_parsing() {
    assert_eq!("x".parse::<Axis>().unwrap(), Axis::X);
    assert_eq!("y".parse::<Axis>().unwrap(), Axis::Y);
    assert_eq!("all".parse::<Axis>().unwrap(), Axis::Both);
    assert_eq!("both".parse::<Axis>().unwrap(), Axis::Both);
    assert!(matches!("z".parse::<Axis>(), Err(MotionError::Configuration(_))));
  }

  #[test]
  fn axis_constrains_displacement() {
    let p = Point2D::new(3., -4.);
    assert_eq!(Axis::X.constrain(p), Point2D::new(3., 0.));
    assert_eq!(Axis::Y.constrain(p), Point2D::new(0., -4.));
    assert_eq!(Axis::Both.constrain(p).length(), 5.);
  }
}
