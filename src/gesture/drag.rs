use std::rc::{Rc, Weak};

use super::{Axis, GestureRecognitionState, PointerEvent, VelocityConfig, VelocityTracker};
use crate::{
  error::MotionError,
  observable::{MotionObservable, Subscribable},
  observer::Observer,
  property::ReactiveProperty,
  rc::{MutRc, RcDerefMut},
  state::State,
  subject::Subject,
  subscription::{Subscription, SubscriptionLike},
  values::{Point2D, Sample},
};

pub const DEFAULT_RECOGNITION_THRESHOLD: f64 = 16.;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DragConfig {
  /// Distance the pointer must travel from the down position before the
  /// drag is recognized.
  pub recognition_threshold: f64,
  pub axis: Axis,
  pub velocity: VelocityConfig,
}

impl Default for DragConfig {
  fn default() -> Self {
    DragConfig {
      recognition_threshold: DEFAULT_RECOGNITION_THRESHOLD,
      axis: Axis::Both,
      velocity: VelocityConfig::default(),
    }
  }
}

impl DragConfig {
  pub fn validate(&self) -> Result<(), MotionError> {
    let threshold = self.recognition_threshold;
    if threshold.is_nan() || threshold < 0. {
      return Err(MotionError::config(format!("invalid recognition threshold {threshold}")));
    }
    self.velocity.validate()
  }
}

struct Tracking {
  /// Down position of the pointer being tracked.
  origin: Option<Point2D>,
  recognition_point: Point2D,
  last_emitted: Point2D,
  tracker: VelocityTracker,
}

struct DragInner {
  config: DragConfig,
  tracking: MutRc<Tracking>,
  value: Subject<Point2D>,
  recognition: ReactiveProperty<GestureRecognitionState>,
  state: ReactiveProperty<State>,
  total_translation: ReactiveProperty<Point2D>,
  velocity: ReactiveProperty<Point2D>,
  input: Subscription,
}

/// Recognizes drags in a stream of pointer events.
///
/// A drag is recognized once the pointer has moved
/// [`recognition_threshold`](DragConfig::recognition_threshold) away from
/// where it went down. From then on [`value`](DragSystem::value) emits the
/// displacement: first from the down position, then from the point where
/// the drag was recognized.
///
/// ```rust
/// use std::time::Duration;
/// use motion_streams::prelude::*;
///
/// let pointer = Subject::new();
/// let drag = DragSystem::new(&pointer.observable(), DragConfig::default()).unwrap();
/// let last = ReactiveProperty::new(Point2D::ZERO);
/// drag.value().subscribe_observer(last.clone());
///
/// let ms = Duration::from_millis;
/// pointer.next(PointerEvent::down(Point2D::new(0., 0.), ms(0)));
/// pointer.next(PointerEvent::moved(Point2D::new(10., 20.), ms(16)));
/// pointer.next(PointerEvent::up(Point2D::new(10., 20.), ms(32)));
/// assert_eq!(last.read(), Point2D::new(10., 20.));
/// ```
#[derive(Clone)]
pub struct DragSystem {
  inner: Rc<DragInner>,
}

enum Step {
  Begin { total: Point2D, velocity: Point2D },
  Change { total: Point2D, delta: Point2D },
}

struct Release {
  total: Point2D,
  delta: Point2D,
  moved: bool,
  velocity: Point2D,
}

impl DragSystem {
  /// Validate `config` and start listening to `events`.
  pub fn new(events: &MotionObservable<PointerEvent>, config: DragConfig) -> Result<Self, MotionError> {
    config.validate()?;
    let inner = Rc::new(DragInner {
      config,
      tracking: MutRc::own(Tracking {
        origin: None,
        recognition_point: Point2D::ZERO,
        last_emitted: Point2D::ZERO,
        tracker: VelocityTracker::new(config.velocity),
      }),
      value: Subject::new(),
      recognition: ReactiveProperty::new(GestureRecognitionState::Possible),
      state: ReactiveProperty::new(State::AtRest),
      total_translation: ReactiveProperty::new(Point2D::ZERO),
      velocity: ReactiveProperty::new(Point2D::ZERO),
      input: Subscription::default(),
    });
    inner
      .input
      .add(events.subscribe_observer(DragObserver { inner: Rc::downgrade(&inner) }));
    Ok(DragSystem { inner })
  }

  /// Displacement of the recognized drag. The state channel reports `Active`
  /// from recognition until release.
  pub fn value(&self) -> MotionObservable<Point2D> { self.inner.value.observable() }

  pub fn recognition_state(&self) -> MotionObservable<GestureRecognitionState> {
    self.inner.recognition.observable()
  }

  pub fn current_recognition_state(&self) -> GestureRecognitionState { self.inner.recognition.read() }

  pub fn state(&self) -> MotionObservable<State> { self.inner.state.observable() }

  pub fn current_state(&self) -> State { self.inner.state.read() }

  /// Displacement from the down position, updated while the drag is
  /// recognized.
  pub fn total_translation(&self) -> MotionObservable<Point2D> { self.inner.total_translation.observable() }

  /// Pointer velocity in units per millisecond, measured at recognition and
  /// at release.
  pub fn velocity(&self) -> MotionObservable<Point2D> { self.inner.velocity.observable() }

  pub fn current_velocity(&self) -> Point2D { self.inner.velocity.read() }

  pub fn config(&self) -> &DragConfig { &self.inner.config }

  /// Abort the current drag. Further moves are ignored until the next down.
  pub fn cancel(&self) { self.inner.cancel() }

  /// Stop listening to pointer events.
  pub fn dispose(&self) { self.inner.input.unsubscribe() }
}

impl DragInner {
  fn handle(&self, event: PointerEvent) {
    match event {
      PointerEvent::Down(sample) => self.on_down(sample),
      PointerEvent::Move(sample) => self.on_move(sample),
      PointerEvent::Up(sample) => self.on_up(sample),
    }
  }

  fn on_down(&self, sample: Sample<Point2D>) {
    // A down without a matching up ends whatever was tracked before it.
    if self.recognition.read().is_in_progress() {
      tracing::debug!("pointer down during a drag; restarting");
      self.recognition.write(GestureRecognitionState::Cancelled);
      self.settle();
    }
    let mut tracking = self.tracking.rc_deref_mut();
    tracking.origin = Some(sample.value);
    tracking.recognition_point = sample.value;
    tracking.last_emitted = sample.value;
    tracking.tracker.reset();
    tracking.tracker.add(sample);
  }

  fn on_move(&self, sample: Sample<Point2D>) {
    let phase = self.recognition.read();
    let step = {
      let mut tracking = self.tracking.rc_deref_mut();
      let Some(origin) = tracking.origin else { return };
      tracking.tracker.add(sample);
      let total = self.config.axis.constrain(sample.value - origin);
      match phase {
        GestureRecognitionState::Possible if total.length() >= self.config.recognition_threshold => {
          tracking.recognition_point = sample.value;
          tracking.last_emitted = sample.value;
          Step::Begin { total, velocity: tracking.tracker.velocity_at(sample.timestamp) }
        }
        p if p.is_in_progress() => {
          tracking.last_emitted = sample.value;
          let delta = self.config.axis.constrain(sample.value - tracking.recognition_point);
          Step::Change { total, delta }
        }
        _ => return,
      }
    };

    match step {
      Step::Begin { total, velocity } => {
        tracing::debug!(?total, "drag recognized");
        self.recognition.write(GestureRecognitionState::Began);
        self.velocity.write(velocity);
        self.state.write(State::Active);
        self.value.state(State::Active);
        self.total_translation.write(total);
        self.value.next(total);
      }
      Step::Change { total, delta } => {
        if phase != GestureRecognitionState::Changed {
          self.recognition.write(GestureRecognitionState::Changed);
        }
        self.total_translation.write(total);
        self.value.next(delta);
      }
    }
  }

  fn on_up(&self, sample: Sample<Point2D>) {
    let release = {
      let mut tracking = self.tracking.rc_deref_mut();
      let Some(origin) = tracking.origin.take() else { return };
      if !self.recognition.read().is_in_progress() {
        return;
      }
      tracking.tracker.add(sample);
      Release {
        total: self.config.axis.constrain(sample.value - origin),
        delta: self.config.axis.constrain(sample.value - tracking.recognition_point),
        moved: sample.value != tracking.last_emitted,
        velocity: tracking.tracker.velocity_at(sample.timestamp),
      }
    };

    tracing::debug!(velocity = ?release.velocity, "drag released");
    self.velocity.write(release.velocity);
    self.recognition.write(GestureRecognitionState::Ended);
    if release.moved {
      self.total_translation.write(release.total);
      self.value.next(release.delta);
    }
    self.settle();
  }

  fn cancel(&self) {
    self.tracking.rc_deref_mut().origin = None;
    if self.recognition.read().is_in_progress() {
      tracing::debug!("drag cancelled");
      self.recognition.write(GestureRecognitionState::Cancelled);
      self.settle();
    }
  }

  fn settle(&self) {
    self.state.write(State::AtRest);
    self.value.state(State::AtRest);
    self.recognition.write(GestureRecognitionState::Possible);
  }
}

impl Drop for DragInner {
  fn drop(&mut self) { self.input.unsubscribe() }
}

struct DragObserver {
  inner: Weak<DragInner>,
}

impl Observer<PointerEvent> for DragObserver {
  fn next(&self, event: PointerEvent) {
    if let Some(inner) = self.inner.upgrade() {
      inner.handle(event);
    }
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::*;
  use crate::{
    ops::test_util::{collector, recorder, Event},
    prelude::*,
  };

  fn down(x: f64, y: f64, ms: u64) -> PointerEvent { PointerEvent::down(Point2D::new(x, y), Duration::from_millis(ms)) }

  fn moved(x: f64, y: f64, ms: u64) -> PointerEvent { PointerEvent::moved(Point2D::new(x, y), Duration::from_millis(ms)) }

  fn up(x: f64, y: f64, ms: u64) -> PointerEvent { PointerEvent::up(Point2D::new(x, y), Duration::from_millis(ms)) }

  fn drag_with(config: DragConfig) -> (Subject<PointerEvent>, DragSystem) {
    let pointer = Subject::new();
    let drag = DragSystem::new(&pointer.observable(), config).unwrap();
    (pointer, drag)
  }

  #[test]
  fn down_move_up_emits_once() {
    let (pointer, drag) = drag_with(DragConfig::default());
    let (seen, push) = collector();
    drag.value().subscribe(push);

    pointer.next(down(0., 0., 0));
    pointer.next(moved(10., 20., 16));
    pointer.next(up(10., 20., 32));
    assert_eq!(*seen.borrow(), vec![Point2D::new(10., 20.)]);
  }

  #[test]
  fn nothing_below_the_threshold() {
    let (pointer, drag) = drag_with(DragConfig::default());
    let (seen, push) = collector();
    let (states, push_state) = collector();
    drag.value().subscribe(push);
    drag.recognition_state().subscribe(push_state);

    pointer.next(down(0., 0., 0));
    pointer.next(moved(5., 5., 16));
    pointer.next(up(5., 5., 32));
    assert!(seen.borrow().is_empty());
    assert_eq!(*states.borrow(), vec![GestureRecognitionState::Possible]);
  }

  #[test]
  fn later_moves_are_relative_to_the_recognition_point() {
    let (pointer, drag) = drag_with(DragConfig::default());
    let (seen, push) = collector();
    let (totals, push_total) = collector();
    drag.value().subscribe(push);
    drag.total_translation().subscribe(push_total);

    pointer.next(down(100., 100., 0));
    pointer.next(moved(120., 100., 16));
    pointer.next(moved(125., 103., 32));
    pointer.next(up(130., 103., 48));

    assert_eq!(
      *seen.borrow(),
      vec![Point2D::new(20., 0.), Point2D::new(5., 3.), Point2D::new(10., 3.)]
    );
    assert_eq!(totals.borrow().last(), Some(&Point2D::new(30., 3.)));
  }

  #[test]
  fn recognition_cycle() {
    use GestureRecognitionState::*;
    let (pointer, drag) = drag_with(DragConfig::default());
    let (states, push) = collector();
    drag.recognition_state().subscribe(push);

    pointer.next(down(0., 0., 0));
    pointer.next(moved(0., 20., 16));
    pointer.next(moved(0., 30., 32));
    pointer.next(moved(0., 40., 48));
    pointer.next(up(0., 40., 64));
    assert_eq!(*states.borrow(), vec![Possible, Began, Changed, Ended, Possible]);
  }

  #[test]
  fn value_state_channel_brackets_the_drag() {
    let (pointer, drag) = drag_with(DragConfig::default());
    let (log, observer) = recorder();
    drag.value().subscribe_observer(observer);

    pointer.next(down(0., 0., 0));
    pointer.next(moved(20., 0., 16));
    pointer.next(up(30., 0., 32));
    assert_eq!(
      *log.borrow(),
      vec![
        Event::State(State::Active),
        Event::Next(Point2D::new(20., 0.)),
        Event::Next(Point2D::new(10., 0.)),
        Event::State(State::AtRest),
      ]
    );
  }

  #[test]
  fn axis_lock_ignores_the_other_component() {
    let (pointer, drag) = drag_with(DragConfig { axis: Axis::X, ..DragConfig::default() });
    let (seen, push) = collector();
    drag.value().subscribe(push);

    pointer.next(down(0., 0., 0));
    pointer.next(moved(4., 30., 16));
    assert!(seen.borrow().is_empty());
    pointer.next(moved(17., 30., 32));
    assert_eq!(*seen.borrow(), vec![Point2D::new(17., 0.)]);
  }

  #[test]
  fn moves_without_down_are_ignored() {
    let (pointer, drag) = drag_with(DragConfig::default());
    let (seen, push) = collector();
    drag.value().subscribe(push);

    pointer.next(moved(50., 50., 0));
    pointer.next(up(50., 50., 10));
    assert!(seen.borrow().is_empty());
    assert_eq!(drag.current_recognition_state(), GestureRecognitionState::Possible);
  }

  #[test]
  fn every_down_resets_the_origin() {
    let (pointer, drag) = drag_with(DragConfig::default());
    let (seen, push) = collector();
    drag.value().subscribe(push);

    pointer.next(down(0., 0., 0));
    pointer.next(moved(5., 5., 16));
    pointer.next(down(100., 100., 32));
    pointer.next(moved(105., 100., 48));
    assert!(seen.borrow().is_empty());

    pointer.next(moved(120., 100., 64));
    assert_eq!(*seen.borrow(), vec![Point2D::new(20., 0.)]);
  }

  #[test]
  fn down_during_a_drag_cancels_it() {
    use GestureRecognitionState::*;
    let (pointer, drag) = drag_with(DragConfig::default());
    let (states, push) = collector();
    drag.recognition_state().subscribe(push);

    pointer.next(down(0., 0., 0));
    pointer.next(moved(30., 0., 16));
    pointer.next(down(200., 0., 32));
    assert_eq!(drag.current_state(), State::AtRest);
    pointer.next(moved(230., 0., 48));

    assert_eq!(*states.borrow(), vec![Possible, Began, Cancelled, Possible, Began]);
    assert_eq!(drag.current_state(), State::Active);
  }

  #[test]
  fn velocity_is_published_at_release() {
    let (pointer, drag) = drag_with(DragConfig::default());
    pointer.next(down(0., 0., 0));
    pointer.next(moved(20., 0., 10));
    pointer.next(moved(40., 0., 20));
    pointer.next(up(60., 0., 30));
    assert_eq!(drag.current_velocity(), Point2D::new(2., 0.));
  }

  #[test]
  fn cancel_aborts_until_next_down() {
    use GestureRecognitionState::*;
    let (pointer, drag) = drag_with(DragConfig::default());
    let (states, push) = collector();
    let (seen, push_value) = collector();
    drag.recognition_state().subscribe(push);
    drag.value().subscribe(push_value);

    pointer.next(down(0., 0., 0));
    pointer.next(moved(20., 0., 16));
    drag.cancel();
    assert_eq!(drag.current_state(), State::AtRest);
    pointer.next(moved(40., 0., 32));
    pointer.next(up(40., 0., 48));

    assert_eq!(*states.borrow(), vec![Possible, Began, Cancelled, Possible]);
    assert_eq!(seen.borrow().len(), 1);
  }

  #[test]
  fn invalid_threshold_is_rejected() {
    let pointer = Subject::<PointerEvent>::new();
    for threshold in [-1., f64::NAN] {
      let config = DragConfig { recognition_threshold: threshold, ..DragConfig::default() };
      assert!(matches!(
        DragSystem::new(&pointer.observable(), config),
        Err(MotionError::Configuration(_))
      ));
    }
  }

  #[test]
  fn dropping_the_system_releases_the_input() {
    let pointer = Subject::<PointerEvent>::new();
    let drag = DragSystem::new(&pointer.observable(), DragConfig::default()).unwrap();
    assert_eq!(pointer.observer_count(), 1);
    drop(drag);
    assert_eq!(pointer.observer_count(), 0);
  }
}
