use crate::{observable::MotionObservable, values::Numeric};

impl<T: Numeric> MotionObservable<T> {
  /// Cap every component at `limit`.
  pub fn upper_bound(&self, limit: f64) -> MotionObservable<T> { self.map(move |v| v.map_components(|c| c.min(limit))) }

  /// Raise every component to at least `limit`.
  pub fn lower_bound(&self, limit: f64) -> MotionObservable<T> { self.map(move |v| v.map_components(|c| c.max(limit))) }

  /// Keep every component within `[lower, upper]`. The bounds may be given
  /// in either order.
  pub fn clamp_to(&self, lower: f64, upper: f64) -> MotionObservable<T> {
    let (lower, upper) = if lower <= upper { (lower, upper) } else { (upper, lower) };
    self.map(move |v| v.map_components(|c| c.clamp(lower, upper)))
  }
}

#[cfg(test)]
mod tests {
  use crate::{observable::from_iter, ops::test_util::collector, prelude::*};

  #[test]
  fn scalar_bounds() {
    let (upper, push_upper) = collector();
    let (lower, push_lower) = collector();
    let source = from_iter(vec![-5., 0., 5.]);
    source.upper_bound(1.).subscribe(push_upper);
    source.lower_bound(1.).subscribe(push_lower);
    assert_eq!(*upper.borrow(), vec![-5., 0., 1.]);
    assert_eq!(*lower.borrow(), vec![1., 1., 5.]);
  }

  #[test]
  fn clamp_applies_per_component_with_swapped_bounds() {
    let (seen, push) = collector();
    from_iter(vec![Point2D::new(-20., 4.), Point2D::new(3., 50.)]).clamp_to(10., 0.).subscribe(push);
    assert_eq!(*seen.borrow(), vec![Point2D::new(0., 4.), Point2D::new(3., 10.)]);
  }
}
