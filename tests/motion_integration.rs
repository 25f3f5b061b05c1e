//! Integration tests for motion-streams
//!
//! End-to-end scenarios across operators, the runtime, gestures and springs.

use std::{cell::RefCell, rc::Rc, time::Duration};

use float_cmp::approx_eq;
use motion_streams::prelude::*;

fn collect<T: 'static>() -> (Rc<RefCell<Vec<T>>>, impl Fn(T) + 'static) {
  let seen = Rc::new(RefCell::new(Vec::new()));
  let c_seen = seen.clone();
  (seen, move |v| c_seen.borrow_mut().push(v))
}

fn ms(v: u64) -> Duration { Duration::from_millis(v) }

#[test]
fn added_by_constant() {
  let (scalars, push) = collect();
  of(3_f64).added_by(10.).subscribe(push);
  assert_eq!(*scalars.borrow(), vec![13.]);

  let (points, push) = collect();
  of(Point2D::new(100., -40.)).added_by(Point2D::new(10., 20.)).subscribe(push);
  assert_eq!(*points.borrow(), vec![Point2D::new(110., -20.)]);
}

#[test]
fn sliding_window_of_three() {
  let (windows, push) = collect();
  from_iter(1..=4).sliding_window(3).unwrap().subscribe(push);
  assert_eq!(*windows.borrow(), vec![vec![1], vec![1, 2], vec![1, 2, 3], vec![2, 3, 4]]);
}

#[test]
fn map_range_interpolates() {
  let (seen, push) = collect();
  of(20_f64)
    .map_range(MapRange::new(15., 35., 200., 100.))
    .subscribe(push);
  assert!(approx_eq!(f64, seen.borrow()[0], 175., epsilon = 0.001));
}

#[test]
fn drag_down_move_up() {
  let pointer = Subject::new();
  let drag = DragSystem::new(&pointer.observable(), DragConfig::default()).unwrap();
  let (seen, push) = collect();
  drag.value().subscribe(push);

  pointer.next(PointerEvent::down(Point2D::new(0., 0.), ms(0)));
  pointer.next(PointerEvent::moved(Point2D::new(10., 20.), ms(16)));
  pointer.next(PointerEvent::up(Point2D::new(10., 20.), ms(32)));
  assert_eq!(*seen.borrow(), vec![Point2D::new(10., 20.)]);
}

#[test]
fn replay_and_dedupe() {
  let subject = ReplaySubject::with_value(1);
  let (late, push) = collect();
  subject.observable().dedupe().subscribe(push);
  for v in [1, 2, 2, 3, 3, 3, 1] {
    subject.next(v);
  }
  assert_eq!(*late.borrow(), vec![1, 2, 3, 1]);
}

#[test]
fn threshold_boundaries_are_within() {
  let (sides, push) = collect();
  from_iter(vec![4_f64, 5., 6.]).threshold(5.).subscribe(push);
  assert_eq!(*sides.borrow(), vec![ThresholdSide::Below, ThresholdSide::Within, ThresholdSide::Above]);

  let (regions, push) = collect();
  from_iter(vec![10_f64, 20., 0.]).threshold_range(20., 10.).subscribe(push);
  assert_eq!(
    *regions.borrow(),
    vec![ThresholdRegion::Within, ThresholdRegion::Within, ThresholdRegion::Below]
  );
}

#[test]
fn unsubscribe_is_idempotent() {
  let subject = Subject::<i32>::new();
  let subscription = subject.subscribe(|_| {});
  subscription.unsubscribe();
  subscription.unsubscribe();
  assert!(subscription.is_closed());
  assert_eq!(subject.observer_count(), 0);
}

#[test]
fn runtime_aggregates_independent_streams() {
  let runtime = MotionRuntime::new();
  let (states, push) = collect();
  runtime.aggregate_state().subscribe(push);

  let a = Subject::<f64>::new();
  let b = Subject::<f64>::new();
  let sink = ReactiveProperty::new(0.);
  runtime.write(&a.observable(), sink.clone());
  runtime.write(&b.observable().multiplied_by(2.), sink.clone());

  a.state(State::Active);
  a.state(State::Active);
  b.state(State::Active);
  a.state(State::AtRest);
  b.next(4.);
  assert_eq!(sink.read(), 8.);
  b.state(State::AtRest);

  assert_eq!(*states.borrow(), vec![State::AtRest, State::Active, State::AtRest]);
}

#[test]
fn toss_hands_off_to_the_spring() {
  let scheduler = TestScheduler::new();
  let pointer = Subject::new();
  let drag = DragSystem::new(&pointer.observable(), DragConfig::default()).unwrap();
  let spring = Point2DSpring::new(scheduler.clone());
  spring.destination().write(Point2D::new(0., 0.));
  let tossable = Tossable::new(drag, spring);

  let runtime = MotionRuntime::new();
  let translate = ReactiveProperty::new(Point2D::ZERO);
  runtime.write(&tossable.value(), translate.clone());

  pointer.next(PointerEvent::down(Point2D::new(0., 0.), ms(0)));
  for (i, x) in [20., 40., 60., 80.].into_iter().enumerate() {
    pointer.next(PointerEvent::moved(Point2D::new(x, x / 2.), ms(10 * (i as u64 + 1))));
  }
  assert_eq!(translate.read(), Point2D::new(80., 40.));
  assert_eq!(runtime.state(), State::Active);

  pointer.next(PointerEvent::up(Point2D::new(80., 40.), ms(50)));
  // Still moving: the spring has taken over.
  assert_eq!(runtime.state(), State::Active);
  let velocity = tossable.spring().initial_velocity().read();
  assert!(velocity.x > 0. && velocity.y > 0.);

  scheduler.advance_by(ms(16));
  let first_frame = translate.read();
  // The toss carries the point further before it turns back.
  assert!(first_frame.x > 80.);

  scheduler.flush();
  assert_eq!(translate.read(), Point2D::ZERO);
  assert_eq!(runtime.state(), State::AtRest);
}

#[test]
fn swipe_classification() {
  let scheduler = TestScheduler::new();
  let pointer = Subject::new();
  let swipeable = Swipeable::new(&pointer.observable(), 320., SwipeConfig::default(), scheduler.clone()).unwrap();
  let (outcomes, push) = collect();
  swipeable.swipe_state().subscribe(push);

  pointer.next(PointerEvent::down(Point2D::ZERO, ms(0)));
  pointer.next(PointerEvent::moved(Point2D::new(30., 0.), ms(16)));
  pointer.next(PointerEvent::up(Point2D::new(30., 0.), ms(32)));
  scheduler.flush();

  pointer.next(PointerEvent::down(Point2D::ZERO, ms(100)));
  pointer.next(PointerEvent::moved(Point2D::new(-30., 0.), ms(116)));
  pointer.next(PointerEvent::moved(Point2D::new(-500., 0.), ms(132)));
  pointer.next(PointerEvent::moved(Point2D::new(-520., 0.), ms(148)));
  pointer.next(PointerEvent::up(Point2D::new(-520., 0.), ms(164)));
  scheduler.flush();

  assert_eq!(*outcomes.borrow(), vec![SwipeState::None, SwipeState::None, SwipeState::Left]);
  assert_eq!(swipeable.tossable().location().read(), Point2D::new(-320., 0.));
}

#[test]
fn delayed_values_are_cancelled_on_unsubscribe() {
  let scheduler = TestScheduler::new();
  let subject = Subject::new();
  let (seen, push) = collect();
  let subscription = subject.observable().delay_by(ms(100), scheduler.clone()).subscribe(push);

  subject.next(1);
  scheduler.advance_by(ms(100));
  subject.next(2);
  subscription.unsubscribe();
  scheduler.flush();
  assert_eq!(*seen.borrow(), vec![1]);
}

#[test]
fn rewrite_follows_the_gesture_phase() {
  let pointer = Subject::new();
  let drag = DragSystem::new(&pointer.observable(), DragConfig::default()).unwrap();
  let (labels, push) = collect();
  drag
    .recognition_state()
    .rewrite_values(vec![
      (GestureRecognitionState::Possible, "idle"),
      (GestureRecognitionState::Began, "grab"),
      (GestureRecognitionState::Changed, "grab"),
      (GestureRecognitionState::Ended, "drop"),
    ])
    .unwrap()
    .dedupe()
    .subscribe(push);

  pointer.next(PointerEvent::down(Point2D::ZERO, ms(0)));
  pointer.next(PointerEvent::moved(Point2D::new(0., 30.), ms(16)));
  pointer.next(PointerEvent::moved(Point2D::new(0., 40.), ms(32)));
  pointer.next(PointerEvent::up(Point2D::new(0., 40.), ms(48)));
  assert_eq!(*labels.borrow(), vec!["idle", "grab", "drop", "idle"]);
}
