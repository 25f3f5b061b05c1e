use std::rc::Rc;

use crate::{
  observable::{MotionObservable, Subscribable},
  observer::{Observer, Subscriber},
};

impl<T: 'static> MotionObservable<T> {
  /// Run `f` on each value before forwarding it unchanged.
  pub fn tap<F>(&self, f: F) -> MotionObservable<T>
  where
    F: Fn(&T) + 'static,
  {
    let source = self.clone();
    let func = Rc::new(f);
    MotionObservable::new(move |observer| source.subscribe_observer(TapObserver { observer, func: func.clone() }))
  }
}

pub struct TapObserver<O, F> {
  observer: O,
  func: Rc<F>,
}

impl<T, F> Observer<T> for TapObserver<Subscriber<T>, F>
where
  F: Fn(&T),
{
  fn next(&self, value: T) {
    (self.func)(&value);
    self.observer.next(value)
  }

  forward_state_and_error!(observer);
}
