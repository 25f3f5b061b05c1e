use std::fmt::Debug;

use crate::observable::MotionObservable;

impl<T: Debug + 'static> MotionObservable<T> {
  /// Emit every value through `tracing` at debug level, tagged with `label`.
  pub fn log(&self, label: &'static str) -> MotionObservable<T> {
    self.tap(move |v| tracing::debug!(target: "motion_streams::log", label, value = ?v))
  }
}

#[cfg(test)]
mod tests {
  use crate::{observable::from_iter, ops::test_util::collector, prelude::*};

  #[test]
  fn values_pass_through() {
    let (seen, push) = collector();
    from_iter(vec![1.5, 2.5]).log("progress").subscribe(push);
    assert_eq!(*seen.borrow(), vec![1.5, 2.5]);
  }
}
