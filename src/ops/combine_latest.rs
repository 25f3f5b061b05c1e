use std::rc::Rc;

use crate::{
  error::MotionError,
  observable::{MotionObservable, Subscribable},
  observer::{Observer, Subscriber},
  rc::{MutRc, RcDerefMut},
  state::State,
  subscription::Subscription,
};

type Project<T, R> = Rc<dyn Fn(&[Option<T>]) -> Option<R>>;

/// Emit the latest value of every stream once all of them have emitted,
/// then again whenever any of them emits.
///
/// An empty list never emits.
pub fn combine_latest<T: Clone + 'static>(streams: Vec<MotionObservable<T>>) -> MotionObservable<Vec<T>> {
  combine(streams, Rc::new(|values: &[Option<T>]| values.iter().cloned().collect::<Option<Vec<_>>>()))
}

/// Like [`combine_latest`], but emits from the first value on, with `None`
/// for streams that have not emitted yet.
pub fn combine_latest_partial<T: Clone + 'static>(
  streams: Vec<MotionObservable<T>>,
) -> MotionObservable<Vec<Option<T>>> {
  combine(streams, Rc::new(|values: &[Option<T>]| Some(values.to_vec())))
}

#[derive(Clone)]
enum Side<A, B> {
  Left(A),
  Right(B),
}

/// Pair the latest values of two streams of different types.
pub fn combine_latest2<A, B>(a: &MotionObservable<A>, b: &MotionObservable<B>) -> MotionObservable<(A, B)>
where
  A: Clone + 'static,
  B: Clone + 'static,
{
  combine(
    vec![a.map(Side::Left), b.map(Side::Right)],
    Rc::new(|values: &[Option<Side<A, B>>]| match values {
      [Some(Side::Left(a)), Some(Side::Right(b))] => Some((a.clone(), b.clone())),
      _ => None,
    }),
  )
}

struct Slots<T> {
  values: Vec<Option<T>>,
  states: Vec<State>,
  reported: State,
}

fn combine<T, R>(streams: Vec<MotionObservable<T>>, project: Project<T, R>) -> MotionObservable<R>
where
  T: Clone + 'static,
  R: 'static,
{
  MotionObservable::new(move |observer| {
    let slots = MutRc::own(Slots {
      values: vec![None; streams.len()],
      states: vec![State::AtRest; streams.len()],
      reported: State::AtRest,
    });
    let subscription = Subscription::default();
    for (index, stream) in streams.iter().enumerate() {
      subscription.add(stream.subscribe_observer(CombineLatestObserver {
        observer: observer.clone(),
        slots: slots.clone(),
        project: project.clone(),
        index,
      }));
    }
    subscription
  })
}

pub struct CombineLatestObserver<O, T, R> {
  observer: O,
  slots: MutRc<Slots<T>>,
  project: Project<T, R>,
  index: usize,
}

impl<T, R> Observer<T> for CombineLatestObserver<Subscriber<R>, T, R> {
  fn next(&self, value: T) {
    let combined = {
      let mut slots = self.slots.rc_deref_mut();
      slots.values[self.index] = Some(value);
      (self.project)(&slots.values)
    };
    if let Some(combined) = combined {
      self.observer.next(combined);
    }
  }

  fn state(&self, state: State) {
    let changed = {
      let mut slots = self.slots.rc_deref_mut();
      slots.states[self.index] = state;
      let aggregate = slots.states.iter().fold(State::AtRest, |acc, s| acc | *s);
      (aggregate != slots.reported).then(|| {
        slots.reported = aggregate;
        aggregate
      })
    };
    if let Some(aggregate) = changed {
      self.observer.state(aggregate);
    }
  }

  fn error(&self, err: MotionError) { self.observer.error(err) }
}
