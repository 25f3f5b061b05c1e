use crate::{
  error::MotionError,
  observable::{MotionObservable, Subscribable},
  observer::{Observer, Subscriber},
  rc::{MutRc, RcDerefMut},
  state::State,
  subscription::Subscription,
};

impl<T: 'static> MotionObservable<T> {
  /// Interleave this stream with `others` in arrival order.
  pub fn merge(&self, others: Vec<MotionObservable<T>>) -> MotionObservable<T> {
    let mut streams = Vec::with_capacity(others.len() + 1);
    streams.push(self.clone());
    streams.extend(others);
    merge_all(streams)
  }
}

/// Interleave every stream in arrival order. Unsubscribing releases all of
/// them.
///
/// The merged stream is active while any source is.
pub fn merge_all<T: 'static>(streams: Vec<MotionObservable<T>>) -> MotionObservable<T> {
  MotionObservable::new(move |observer| {
    let states = MutRc::own(SourceStates { states: vec![State::AtRest; streams.len()], reported: State::AtRest });
    let subscription = Subscription::default();
    for (index, stream) in streams.iter().enumerate() {
      subscription.add(stream.subscribe_observer(MergeObserver {
        observer: observer.clone(),
        states: states.clone(),
        index,
      }));
    }
    subscription
  })
}

struct SourceStates {
  states: Vec<State>,
  reported: State,
}

pub struct MergeObserver<O> {
  observer: O,
  states: MutRc<SourceStates>,
  index: usize,
}

impl<T> Observer<T> for MergeObserver<Subscriber<T>> {
  fn next(&self, value: T) { self.observer.next(value) }

  fn state(&self, state: State) {
    let changed = {
      let mut sources = self.states.rc_deref_mut();
      sources.states[self.index] = state;
      let aggregate = sources.states.iter().fold(State::AtRest, |acc, s| acc | *s);
      (aggregate != sources.reported).then(|| {
        sources.reported = aggregate;
        aggregate
      })
    };
    if let Some(aggregate) = changed {
      self.observer.state(aggregate);
    }
  }

  fn error(&self, err: MotionError) { self.observer.error(err) }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    ops::test_util::{collector, recorder, Event},
    prelude::*,
  };

  #[test]
  fn interleaves_without_dedupe() {
    let a = Subject::new();
    let b = Subject::new();
    let (seen, push) = collector();
    a.observable().merge(vec![b.observable()]).subscribe(push);

    a.next(1);
    b.next(1);
    b.next(2);
    a.next(3);
    assert_eq!(*seen.borrow(), vec![1, 1, 2, 3]);
  }

  #[test]
  fn unsubscribe_releases_every_source() {
    let a = Subject::<i32>::new();
    let b = Subject::<i32>::new();
    let subscription = merge_all(vec![a.observable(), b.observable()]).subscribe(|_| {});
    assert_eq!(a.observer_count() + b.observer_count(), 2);
    subscription.unsubscribe();
    assert_eq!(a.observer_count() + b.observer_count(), 0);
  }

  #[test]
  fn stays_active_while_any_source_is() {
    let a = Subject::<i32>::new();
    let b = Subject::<i32>::new();
    let (log, observer) = recorder();
    merge_all(vec![a.observable(), b.observable()]).subscribe_observer(observer);

    a.state(State::Active);
    b.state(State::AtRest);
    b.state(State::Active);
    a.state(State::AtRest);
    assert_eq!(*log.borrow(), vec![Event::State(State::Active)]);
    b.state(State::AtRest);
    assert_eq!(*log.borrow(), vec![Event::State(State::Active), Event::State(State::AtRest)]);
  }

  #[test]
  fn runtime_stays_active_through_a_merged_stream() {
    let runtime = MotionRuntime::new();
    let a = Subject::<f64>::new();
    let b = Subject::<f64>::new();
    runtime.write(&a.observable().merge(vec![b.observable()]), ReactiveProperty::new(0.));

    a.state(State::Active);
    b.state(State::AtRest);
    assert_eq!(runtime.state(), State::Active);
    a.state(State::AtRest);
    assert_eq!(runtime.state(), State::AtRest);
  }
}
