use crate::{
  observable::{MotionObservable, Subscribable},
  observer::Observer,
};

impl<T: Clone + 'static> MotionObservable<T> {
  /// Emit `value` to each new subscriber before anything from upstream.
  pub fn start_with(&self, value: T) -> MotionObservable<T> {
    let source = self.clone();
    MotionObservable::new(move |observer| {
      observer.next(value.clone());
      source.subscribe_observer(observer)
    })
  }
}

#[cfg(test)]
mod tests {
  use crate::{ops::test_util::collector, prelude::*};

  #[test]
  fn initial_value_comes_first() {
    let subject = Subject::new();
    let (seen, push) = collector();
    subject.observable().start_with(0).subscribe(push);
    subject.next(1);
    assert_eq!(*seen.borrow(), vec![0, 1]);
  }
}
