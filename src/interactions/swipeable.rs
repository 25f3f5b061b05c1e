use std::{
  cell::Cell,
  rc::{Rc, Weak},
};

use super::{ResistanceConfig, Tossable};
use crate::{
  error::MotionError,
  gesture::{Axis, DragConfig, DragSystem, GestureRecognitionState, PointerEvent},
  observable::{MotionObservable, Subscribable},
  property::ReactiveProperty,
  scheduler::SchedulerRef,
  spring::{NumericSpring, Point2DSpring, Spring},
  state::State,
  subscription::{Subscription, SubscriptionLike},
  values::Point2D,
};

/// How far a row must travel before a release swipes it away. Also how far
/// it can be dragged against resistance.
pub const VISUAL_THRESHOLD: f64 = 72.;
const RESISTANCE_BASIS_RATIO: f64 = 2.5;
const ICON_REST_SCALE: f64 = 0.67;
/// A row catching up with the pointer is handed back to it once this close.
const SPRING_THRESHOLD: f64 = 1.;
/// Full resistance parks the row on the threshold, give or take rounding.
const THRESHOLD_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwipeThreshold {
  Fixed(f64),
  FractionOfWidth(f64),
}

impl Default for SwipeThreshold {
  fn default() -> Self { SwipeThreshold::Fixed(VISUAL_THRESHOLD) }
}

impl SwipeThreshold {
  pub fn resolve(&self, width: f64) -> f64 {
    match *self {
      SwipeThreshold::Fixed(distance) => distance,
      SwipeThreshold::FractionOfWidth(fraction) => fraction * width,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwipeState {
  #[default]
  None,
  Left,
  Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwipeConfig {
  pub threshold: SwipeThreshold,
  /// Extra distance past the row's width for the off-screen animation, so
  /// overflowing decoration is hidden too.
  pub destination_margin: f64,
  /// The axis is always locked to `x`.
  pub drag: DragConfig,
}

impl SwipeConfig {
  pub fn validate(&self) -> Result<(), MotionError> {
    match self.threshold {
      SwipeThreshold::Fixed(d) if !(d.is_finite() && d > 0.) => {
        return Err(MotionError::config(format!("invalid swipe threshold {d}")));
      }
      SwipeThreshold::FractionOfWidth(f) if !(f > 0. && f <= 1.) => {
        return Err(MotionError::config(format!("invalid swipe threshold fraction {f}")));
      }
      _ => {}
    }
    if !self.destination_margin.is_finite() {
      return Err(MotionError::config("destination margin must be finite"));
    }
    self.drag.validate()
  }
}

struct SwipeableInner {
  tossable: Tossable,
  threshold: SwipeThreshold,
  width: ReactiveProperty<f64>,
  destination_margin: ReactiveProperty<f64>,
  swipe_state: ReactiveProperty<SwipeState>,
  direction: ReactiveProperty<SwipeState>,
  threshold_met: ReactiveProperty<bool>,
  recognition: ReactiveProperty<GestureRecognitionState>,
  icon_spring: NumericSpring,
  background_spring: NumericSpring,
  dragging: Cell<bool>,
  catching_up: Cell<bool>,
  subscription: Subscription,
}

/// A horizontally swipeable row.
///
/// Dragged within the threshold, the row resists and springs back on
/// release. Dragged past it, the row follows the pointer and is animated
/// off-screen in the direction of the swipe on release.
#[derive(Clone)]
pub struct Swipeable {
  inner: Rc<SwipeableInner>,
}

impl Swipeable {
  pub fn new(
    events: &MotionObservable<PointerEvent>,
    width: f64,
    config: SwipeConfig,
    scheduler: impl Into<SchedulerRef>,
  ) -> Result<Self, MotionError> {
    config.validate()?;
    let scheduler = scheduler.into();
    let drag = DragSystem::new(events, DragConfig { axis: Axis::X, ..config.drag })?;
    let spring = Point2DSpring::new(scheduler.clone());
    spring.threshold().write(SPRING_THRESHOLD);

    let icon_spring = NumericSpring::new(scheduler.clone());
    icon_spring.initial_value().write(ICON_REST_SCALE);
    icon_spring.destination().write(ICON_REST_SCALE);

    let inner = Rc::new(SwipeableInner {
      tossable: Tossable::new(drag, spring),
      threshold: config.threshold,
      width: ReactiveProperty::new(width),
      destination_margin: ReactiveProperty::new(config.destination_margin),
      swipe_state: ReactiveProperty::new(SwipeState::None),
      direction: ReactiveProperty::new(SwipeState::None),
      threshold_met: ReactiveProperty::new(false),
      recognition: ReactiveProperty::new(GestureRecognitionState::Possible),
      icon_spring,
      background_spring: NumericSpring::new(scheduler),
      dragging: Cell::new(false),
      catching_up: Cell::new(false),
      subscription: Subscription::default(),
    });

    let weak = Rc::downgrade(&inner);
    let tossable = &inner.tossable;
    inner
      .subscription
      .add(tossable.state().subscribe(upgraded(&weak, SwipeableInner::on_toss_state)));
    inner
      .subscription
      .add(tossable.dragged_location().subscribe(upgraded(&weak, SwipeableInner::on_dragged)));
    inner
      .subscription
      .add(tossable.drag().state().subscribe(upgraded(&weak, SwipeableInner::on_drag_state)));
    inner
      .subscription
      .add(tossable.spring().state().subscribe(upgraded(&weak, SwipeableInner::on_spring_state)));
    Ok(Swipeable { inner })
  }

  /// The outcome of the last release.
  pub fn swipe_state(&self) -> MotionObservable<SwipeState> { self.inner.swipe_state.observable() }

  pub fn current_swipe_state(&self) -> SwipeState { self.inner.swipe_state.read() }

  /// `Left` or `Right`, following the drag.
  pub fn direction(&self) -> MotionObservable<SwipeState> { self.inner.direction.observable().dedupe() }

  /// Whether a release right now would swipe the row away.
  pub fn is_threshold_met(&self) -> MotionObservable<bool> { self.inner.threshold_met.observable() }

  /// Reports `Recognized` at the instant a release is classified as a swipe.
  pub fn recognition_state(&self) -> MotionObservable<GestureRecognitionState> {
    self.inner.recognition.observable()
  }

  pub fn width(&self) -> &ReactiveProperty<f64> { &self.inner.width }

  pub fn destination_margin(&self) -> &ReactiveProperty<f64> { &self.inner.destination_margin }

  /// Scale of the action icon: grows to 1 once the threshold is met.
  pub fn icon_spring(&self) -> &NumericSpring { &self.inner.icon_spring }

  /// Opacity of the background: 1 once the threshold is met.
  pub fn background_spring(&self) -> &NumericSpring { &self.inner.background_spring }

  pub fn tossable(&self) -> &Tossable { &self.inner.tossable }

  pub fn value(&self) -> MotionObservable<Point2D> { self.inner.tossable.value() }

  pub fn state(&self) -> MotionObservable<State> { self.inner.tossable.state() }

  pub fn current_state(&self) -> State { self.inner.tossable.current_state() }
}

fn upgraded<T>(weak: &Weak<SwipeableInner>, f: fn(&SwipeableInner, T)) -> impl Fn(T) + 'static
where
  T: 'static,
{
  let weak = weak.clone();
  move |value| {
    if let Some(inner) = weak.upgrade() {
      f(&inner, value)
    }
  }
}

impl SwipeableInner {
  fn visual_threshold(&self) -> f64 { self.threshold.resolve(self.width.read()) }

  fn on_toss_state(&self, state: State) {
    if state == State::AtRest {
      let basis = RESISTANCE_BASIS_RATIO * self.visual_threshold();
      self.tossable.resistance().write(ResistanceConfig {
        origin: Point2D::ZERO,
        radius_until_resistance: 0.,
        basis,
        factor: basis / self.visual_threshold(),
      });
    }
  }

  fn on_dragged(&self, location: Point2D) {
    let direction = if location.x > 0. { SwipeState::Right } else { SwipeState::Left };
    self.direction.write(direction);

    let met = location.x.abs() >= self.visual_threshold() - THRESHOLD_TOLERANCE;
    if met != self.threshold_met.read() {
      self.threshold_met.write(met);
      self.background_spring.destination().write(if met { 1. } else { 0. });
      self.icon_spring.destination().write(if met { 1. } else { ICON_REST_SCALE });
    }

    let spring = self.tossable.spring();
    spring.destination().write(Point2D::new(location.x, 0.));
    if met && self.tossable.resistance().read().is_enabled() {
      // Past the threshold the row stays under the pointer. It springs from
      // where resistance held it to catch up first.
      self.tossable.resistance().update(|r| ResistanceConfig { factor: 0., ..r });
      tracing::debug!(x = location.x, "swipe threshold crossed");
      self.catching_up.set(true);
      spring.initial_value().write(Point2D::new(location.x, 0.));
      spring.initial_velocity().write(Point2D::ZERO);
      spring.enabled().write(true);
    }
  }

  fn on_spring_state(&self, state: State) {
    if state == State::AtRest && self.dragging.get() && self.catching_up.replace(false) {
      self.tossable.spring().enabled().write(false);
    }
  }

  fn on_drag_state(&self, state: State) {
    match state {
      State::Active => self.dragging.set(true),
      State::AtRest if self.dragging.replace(false) => {
        self.catching_up.set(false);
        self.release()
      }
      _ => {}
    }
  }

  fn release(&self) {
    let swipe = if self.threshold_met.read() { self.direction.read() } else { SwipeState::None };
    tracing::debug!(?swipe, "swipe released");
    self.swipe_state.write(swipe);
    if swipe != SwipeState::None {
      self.recognition.write(GestureRecognitionState::Recognized);
      self.recognition.write(GestureRecognitionState::Possible);
    }

    let distance = self.width.read() + self.destination_margin.read();
    let x = match swipe {
      SwipeState::None => 0.,
      SwipeState::Left => -distance,
      SwipeState::Right => distance,
    };
    self.tossable.destination().write(Point2D::new(x, 0.));
  }
}

impl Drop for SwipeableInner {
  fn drop(&mut self) { self.subscription.unsubscribe() }
}
