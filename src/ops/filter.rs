use std::rc::Rc;

use crate::{
  observable::{MotionObservable, Subscribable},
  observer::{Observer, Subscriber},
};

impl<T: 'static> MotionObservable<T> {
  /// Forward only the values for which `predicate` returns true.
  pub fn filter<F>(&self, predicate: F) -> MotionObservable<T>
  where
    F: Fn(&T) -> bool + 'static,
  {
    let source = self.clone();
    let predicate = Rc::new(predicate);
    MotionObservable::new(move |observer| {
      source.subscribe_observer(FilterObserver { observer, predicate: predicate.clone() })
    })
  }
}

pub struct FilterObserver<O, F> {
  observer: O,
  predicate: Rc<F>,
}

impl<T, F> Observer<T> for FilterObserver<Subscriber<T>, F>
where
  F: Fn(&T) -> bool,
{
  fn next(&self, value: T) {
    if (self.predicate)(&value) {
      self.observer.next(value)
    }
  }

  forward_state_and_error!(observer);
}

#[cfg(test)]
mod tests {
  use crate::{observable::from_iter, ops::test_util::collector, prelude::*};

  #[test]
  fn keeps_matching_values() {
    let (seen, push) = collector();
    from_iter(0..10).filter(|v| v % 3 == 0).subscribe(push);
    assert_eq!(*seen.borrow(), vec![0, 3, 6, 9]);
  }
}
