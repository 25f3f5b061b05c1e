use std::rc::Rc;

use crate::{
  observable::{MotionObservable, Subscribable},
  observer::{Observer, Subscriber},
  rc::{MutRc, RcDeref},
};

impl<T: Clone + 'static> MotionObservable<T> {
  /// Drop a value when it equals the value dispatched immediately before it.
  ///
  /// Only consecutive repeats are dropped: `1, 1, 2, 1` becomes `1, 2, 1`.
  pub fn dedupe(&self) -> MotionObservable<T>
  where
    T: PartialEq,
  {
    self.dedupe_by(|a, b| a == b)
  }

  /// Like [`dedupe`](Self::dedupe) with a custom equality check.
  pub fn dedupe_by<F>(&self, are_equal: F) -> MotionObservable<T>
  where
    F: Fn(&T, &T) -> bool + 'static,
  {
    let source = self.clone();
    let are_equal = Rc::new(are_equal);
    MotionObservable::new(move |observer| {
      source.subscribe_observer(DedupeObserver {
        observer,
        are_equal: are_equal.clone(),
        last: MutRc::own(None),
      })
    })
  }
}

pub struct DedupeObserver<O, T, F> {
  observer: O,
  are_equal: Rc<F>,
  last: MutRc<Option<T>>,
}

impl<T, F> Observer<T> for DedupeObserver<Subscriber<T>, T, F>
where
  T: Clone,
  F: Fn(&T, &T) -> bool,
{
  fn next(&self, value: T) {
    let repeat = self.last.rc_deref().as_ref().is_some_and(|last| (self.are_equal)(last, &value));
    if !repeat {
      self.last.replace(Some(value.clone()));
      self.observer.next(value);
    }
  }

  forward_state_and_error!(observer);
}

#[cfg(test)]
mod tests {
  use crate::{observable::from_iter, ops::test_util::collector, prelude::*};

  #[test]
  fn collapses_consecutive_runs() {
    let (seen, push) = collector();
    from_iter(vec![1, 1, 2, 2, 2, 1, 3, 3]).dedupe().subscribe(push);
    assert_eq!(*seen.borrow(), vec![1, 2, 1, 3]);
  }

  #[test]
  fn structural_equality_on_points() {
    let (seen, push) = collector();
    from_iter(vec![Point2D::new(1., 2.), Point2D::new(1., 2.), Point2D::new(2., 2.)])
      .dedupe()
      .subscribe(push);
    assert_eq!(*seen.borrow(), vec![Point2D::new(1., 2.), Point2D::new(2., 2.)]);
  }

  #[test]
  fn custom_comparator_compares_against_last_dispatched() {
    // Close values are treated as equal. The comparison is always against
    // the last value that got through, so a slow drift is still reported.
    let (seen, push) = collector();
    from_iter(vec![0.0, 0.4, 0.8, 1.2, 1.3])
      .dedupe_by(|a: &f64, b: &f64| (a - b).abs() < 0.5)
      .subscribe(push);
    assert_eq!(*seen.borrow(), vec![0.0, 0.8, 1.3]);
  }

  #[test]
  fn each_subscription_has_its_own_memory() {
    let subject = Subject::new();
    let deduped = subject.observable().dedupe();
    let (first, push_first) = collector();
    deduped.subscribe(push_first);
    subject.next(1);

    let (second, push_second) = collector();
    deduped.subscribe(push_second);
    subject.next(1);

    assert_eq!(*first.borrow(), vec![1]);
    assert_eq!(*second.borrow(), vec![1]);
  }
}
