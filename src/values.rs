//! Value shapes that flow through motion streams.

use std::ops::{Add, Mul, Neg, Sub};
use std::time::Duration;

use crate::error::MotionError;

/// A point (or vector) in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2D {
  pub x: f64,
  pub y: f64,
}

impl Point2D {
  pub const ZERO: Point2D = Point2D { x: 0., y: 0. };

  #[inline]
  pub const fn new(x: f64, y: f64) -> Self { Point2D { x, y } }

  /// Euclidean length of the vector from the origin to this point.
  #[inline]
  pub fn length(&self) -> f64 { self.x.hypot(self.y) }

  #[inline]
  pub fn distance_to(&self, other: Point2D) -> f64 { (*self - other).length() }
}

impl Add for Point2D {
  type Output = Point2D;
  fn add(self, rhs: Point2D) -> Point2D { Point2D::new(self.x + rhs.x, self.y + rhs.y) }
}

impl Sub for Point2D {
  type Output = Point2D;
  fn sub(self, rhs: Point2D) -> Point2D { Point2D::new(self.x - rhs.x, self.y - rhs.y) }
}

impl Mul<f64> for Point2D {
  type Output = Point2D;
  fn mul(self, rhs: f64) -> Point2D { Point2D::new(self.x * rhs, self.y * rhs) }
}

impl Neg for Point2D {
  type Output = Point2D;
  fn neg(self) -> Point2D { Point2D::new(-self.x, -self.y) }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimensions {
  pub width: f64,
  pub height: f64,
}

impl Dimensions {
  #[inline]
  pub const fn new(width: f64, height: f64) -> Self { Dimensions { width, height } }
}

/// A reading taken at a point on the scheduler's clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample<T> {
  pub value: T,
  pub timestamp: Duration,
}

impl<T> Sample<T> {
  #[inline]
  pub fn new(value: T, timestamp: Duration) -> Self { Sample { value, timestamp } }
}

// ==================== Numeric ====================

/// Values that arithmetic operators can combine component by component.
///
/// `f64`, [`Point2D`] and [`Dimensions`] always combine with their own kind,
/// so the type system rules out mismatches. [`NumericValue`] defers the shape
/// decision to runtime and reports mismatches as
/// [`MotionError::ShapeMismatch`].
pub trait Numeric: Clone + 'static {
  /// Combine `self` with `other` component-wise.
  fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Result<Self, MotionError>;

  /// Apply `f` to every component.
  fn map_components(&self, f: impl Fn(f64) -> f64) -> Self;
}

impl Numeric for f64 {
  #[inline]
  fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Result<Self, MotionError> {
    Ok(f(*self, *other))
  }

  #[inline]
  fn map_components(&self, f: impl Fn(f64) -> f64) -> Self { f(*self) }
}

impl Numeric for Point2D {
  fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Result<Self, MotionError> {
    Ok(Point2D::new(f(self.x, other.x), f(self.y, other.y)))
  }

  fn map_components(&self, f: impl Fn(f64) -> f64) -> Self { Point2D::new(f(self.x), f(self.y)) }
}

impl Numeric for Dimensions {
  fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Result<Self, MotionError> {
    Ok(Dimensions::new(f(self.width, other.width), f(self.height, other.height)))
  }

  fn map_components(&self, f: impl Fn(f64) -> f64) -> Self {
    Dimensions::new(f(self.width), f(self.height))
  }
}

/// A numeric value whose shape is only known at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumericValue {
  Scalar(f64),
  Point(Point2D),
  Dimensions(Dimensions),
}

impl NumericValue {
  pub fn shape_name(&self) -> &'static str {
    match self {
      NumericValue::Scalar(_) => "scalar",
      NumericValue::Point(_) => "point",
      NumericValue::Dimensions(_) => "dimensions",
    }
  }
}

impl Numeric for NumericValue {
  /// A scalar on the right broadcasts across every component on the left.
  /// Every other pairing of different shapes is a mismatch.
  fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Result<Self, MotionError> {
    use NumericValue::*;
    match (self, other) {
      (Scalar(a), Scalar(b)) => Ok(Scalar(f(*a, *b))),
      (Point(a), Point(b)) => a.zip_with(b, f).map(Point),
      (Dimensions(a), Dimensions(b)) => a.zip_with(b, f).map(Dimensions),
      (Point(a), Scalar(b)) => Ok(Point(a.map_components(|c| f(c, *b)))),
      (Dimensions(a), Scalar(b)) => Ok(Dimensions(a.map_components(|c| f(c, *b)))),
      (a, b) => Err(MotionError::ShapeMismatch {
        expected: a.shape_name(),
        found: b.shape_name(),
      }),
    }
  }

  fn map_components(&self, f: impl Fn(f64) -> f64) -> Self {
    match self {
      NumericValue::Scalar(v) => NumericValue::Scalar(f(*v)),
      NumericValue::Point(p) => NumericValue::Point(p.map_components(f)),
      NumericValue::Dimensions(d) => NumericValue::Dimensions(d.map_components(f)),
    }
  }
}

impl From<f64> for NumericValue {
  fn from(v: f64) -> Self { NumericValue::Scalar(v) }
}

impl From<Point2D> for NumericValue {
  fn from(v: Point2D) -> Self { NumericValue::Point(v) }
}

impl From<Dimensions> for NumericValue {
  fn from(v: Dimensions) -> Self { NumericValue::Dimensions(v) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn point_arithmetic() {
    let p = Point2D::new(3., 4.);
    assert_eq!(p.length(), 5.);
    assert_eq!(p + Point2D::new(1., 1.), Point2D::new(4., 5.));
    assert_eq!(-p * 2., Point2D::new(-6., -8.));
    assert_eq!(p.distance_to(Point2D::ZERO), 5.);
  }

  #[test]
  fn numeric_value_broadcasts_scalar_operand() {
    let v = NumericValue::Point(Point2D::new(1., 2.));
    assert_eq!(
      v.zip_with(&NumericValue::Scalar(10.), |a, b| a * b),
      Ok(NumericValue::Point(Point2D::new(10., 20.)))
    );
  }

  #[test]
  fn numeric_value_rejects_mismatched_shapes() {
    let v = NumericValue::Scalar(1.);
    let err = v
      .zip_with(&NumericValue::Dimensions(Dimensions::new(1., 1.)), |a, b| a + b)
      .unwrap_err();
    assert_eq!(err, MotionError::ShapeMismatch { expected: "scalar", found: "dimensions" });
  }
}
