use std::rc::Rc;

use crate::{
  error::MotionError,
  observable::{MotionObservable, Subscribable},
  observer::{Observer, Subscriber},
};

impl<T: 'static> MotionObservable<T> {
  /// Transform every value with `f`.
  pub fn map<U, F>(&self, f: F) -> MotionObservable<U>
  where
    U: 'static,
    F: Fn(T) -> U + 'static,
  {
    let source = self.clone();
    let func = Rc::new(f);
    MotionObservable::new(move |observer| source.subscribe_observer(MapObserver { observer, func: func.clone() }))
  }

  /// Transform every value with a fallible `f`. Failures go to the error
  /// channel and nothing is emitted for that value.
  pub fn try_map<U, F>(&self, f: F) -> MotionObservable<U>
  where
    U: 'static,
    F: Fn(T) -> Result<U, MotionError> + 'static,
  {
    let source = self.clone();
    let func = Rc::new(f);
    MotionObservable::new(move |observer| {
      source.subscribe_observer(TryMapObserver { observer, func: func.clone() })
    })
  }

  /// Replace every value with `value`.
  pub fn map_to<U: Clone + 'static>(&self, value: U) -> MotionObservable<U> { self.map(move |_| value.clone()) }
}

pub struct MapObserver<O, F> {
  observer: O,
  func: Rc<F>,
}

impl<T, U, F> Observer<T> for MapObserver<Subscriber<U>, F>
where
  F: Fn(T) -> U,
{
  #[inline]
  fn next(&self, value: T) { self.observer.next((self.func)(value)) }

  forward_state_and_error!(observer);
}

pub struct TryMapObserver<O, F> {
  observer: O,
  func: Rc<F>,
}

impl<T, U, F> Observer<T> for TryMapObserver<Subscriber<U>, F>
where
  F: Fn(T) -> Result<U, MotionError>,
{
  fn next(&self, value: T) {
    match (self.func)(value) {
      Ok(v) => self.observer.next(v),
      Err(err) => self.observer.error(err),
    }
  }

  forward_state_and_error!(observer);
}

#[cfg(test)]
mod tests {
  use crate::{
    observable::{from_iter, Subscribable},
    ops::test_util::{collector, recorder, Event},
    prelude::*,
  };

  #[test]
  fn primitive_type() {
    let (seen, push) = collector();
    from_iter(100..103).map(|v| v * 2).subscribe(push);
    assert_eq!(*seen.borrow(), vec![200, 202, 204]);
  }

  #[test]
  fn map_to_replaces_values() {
    let (seen, push) = collector();
    from_iter(vec![1, 2]).map_to("x").subscribe(push);
    assert_eq!(*seen.borrow(), vec!["x", "x"]);
  }

  #[test]
  fn try_map_reports_failures_without_emitting() {
    let (log, observer) = recorder();
    from_iter(vec![1, -1, 2])
      .try_map(|v: i32| if v < 0 { Err(MotionError::config("negative")) } else { Ok(v) })
      .subscribe_observer(observer);
    assert_eq!(
      *log.borrow(),
      vec![Event::Next(1), Event::Error(MotionError::config("negative")), Event::Next(2)]
    );
  }

  #[test]
  fn state_passes_through() {
    let subject = Subject::new();
    let (log, observer) = recorder();
    subject.observable().map(|v: i32| v + 1).subscribe_observer(observer);
    subject.state(State::Active);
    subject.next(1);
    assert_eq!(*log.borrow(), vec![Event::State(State::Active), Event::Next(2)]);
  }
}
