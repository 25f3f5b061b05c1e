use std::{cell::Cell, rc::Rc};

use crate::observable::{MotionObservable, Subscribable};

impl<T: PartialEq + 'static> MotionObservable<T> {
  /// Drop everything until a value equal to `expected` arrives, then
  /// forward that value and everything after it.
  pub fn ignore_until(&self, expected: T) -> MotionObservable<T> {
    let source = self.clone();
    let expected = Rc::new(expected);
    MotionObservable::new(move |observer| {
      let ignoring = Cell::new(true);
      let expected = expected.clone();
      source
        .filter(move |v| {
          if ignoring.get() && *v == *expected {
            ignoring.set(false);
          }
          !ignoring.get()
        })
        .subscribe_observer(observer)
    })
  }
}
