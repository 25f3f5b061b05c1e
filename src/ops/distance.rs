use crate::{observable::MotionObservable, values::Point2D};

impl MotionObservable<Point2D> {
  /// Euclidean distance of every point from `origin`.
  pub fn distance_from(&self, origin: Point2D) -> MotionObservable<f64> { self.map(move |p| p.distance_to(origin)) }
}

impl MotionObservable<f64> {
  /// Absolute distance of every value from `origin`.
  pub fn distance_from(&self, origin: f64) -> MotionObservable<f64> { self.map(move |v| (v - origin).abs()) }
}
