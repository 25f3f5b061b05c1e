use std::{
  cell::Cell,
  f64::consts::FRAC_PI_2,
  rc::{Rc, Weak},
};

use crate::{
  error::MotionError,
  gesture::{Axis, DragSystem},
  observable::{MotionObservable, Subscribable},
  observer::Observer,
  ops::combine_latest2,
  property::ReactiveProperty,
  spring::{Point2DSpring, Spring},
  state::State,
  subject::Subject,
  subscription::{Subscription, SubscriptionLike},
  values::Point2D,
};

/// Radial resistance applied to a dragged point.
///
/// Within `radius_until_resistance` of `origin` the point follows the
/// pointer. Beyond it, progress through the next `basis` units is eased so
/// the point moves at most `basis / factor` further. A `factor` of zero
/// disables resistance.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResistanceConfig {
  pub origin: Point2D,
  pub radius_until_resistance: f64,
  pub basis: f64,
  pub factor: f64,
}

impl ResistanceConfig {
  /// Resistance for a drag locked to `axis` that moves freely between `min`
  /// and `max`.
  pub fn linear(min: f64, max: f64, axis: Axis, basis: f64, factor: f64) -> Result<Self, MotionError> {
    let center = min + (max - min) / 2.;
    let origin = match axis {
      Axis::X => Point2D::new(center, 0.),
      Axis::Y => Point2D::new(0., center),
      Axis::Both => return Err(MotionError::config("linear resistance needs an axis-locked drag")),
    };
    Ok(ResistanceConfig {
      origin,
      radius_until_resistance: (max - min).abs() / 2.,
      basis,
      factor,
    })
  }

  #[inline]
  pub fn is_enabled(&self) -> bool { self.factor != 0. && self.basis > 0. }

  pub fn apply(&self, location: Point2D) -> Point2D {
    if !self.is_enabled() {
      return location;
    }
    let from_origin = location - self.origin;
    let overflow = from_origin.length() - self.radius_until_resistance;
    if overflow < 0. {
      return location;
    }
    let progress = (overflow / self.basis).clamp(0., 1.);
    let radius = self.basis / self.factor * (progress * FRAC_PI_2).sin() + self.radius_until_resistance;
    let angle = from_origin.y.atan2(from_origin.x);
    self.origin + Point2D::new(radius * angle.cos(), radius * angle.sin())
  }
}

struct TossableInner {
  drag: DragSystem,
  spring: Point2DSpring,
  location: ReactiveProperty<Point2D>,
  resistance: ReactiveProperty<ResistanceConfig>,
  dragged_location: Subject<Point2D>,
  state: ReactiveProperty<State>,
  location_on_down: Cell<Point2D>,
  dragging: Cell<bool>,
  subscription: Subscription,
}

/// A point that follows a drag and is tossed into a spring on release.
///
/// The spring's destination is where the point comes to rest; it starts
/// out as the point's initial location.
#[derive(Clone)]
pub struct Tossable {
  inner: Rc<TossableInner>,
}

impl Tossable {
  /// Connect `drag` to `spring`. The point starts at the spring's current
  /// destination.
  pub fn new(drag: DragSystem, spring: Point2DSpring) -> Self {
    let start = spring.destination().read();
    spring.initial_value().write(start);
    let inner = Rc::new(TossableInner {
      drag,
      spring,
      location: ReactiveProperty::new(start),
      resistance: ReactiveProperty::new(ResistanceConfig::default()),
      dragged_location: Subject::new(),
      state: ReactiveProperty::new(State::AtRest),
      location_on_down: Cell::new(start),
      dragging: Cell::new(false),
      subscription: Subscription::default(),
    });

    let weak = Rc::downgrade(&inner);
    let on_drag_state = upgraded(&weak, TossableInner::on_drag_state);
    inner.subscription.add(inner.drag.state().subscribe(on_drag_state));
    let on_translation = upgraded(&weak, TossableInner::on_translation);
    inner
      .subscription
      .add(inner.drag.total_translation().subscribe(on_translation));
    let on_spring_value = upgraded(&weak, TossableInner::on_spring_value);
    inner.subscription.add(inner.spring.value().subscribe(on_spring_value));

    let activity = combine_latest2(&inner.drag.state(), &inner.spring.state())
      .map(|(drag, spring)| drag | spring)
      .dedupe();
    inner.subscription.add(activity.subscribe_observer(inner.state.clone()));

    Tossable { inner }
  }

  pub fn location(&self) -> &ReactiveProperty<Point2D> { &self.inner.location }

  /// Where the point settles after a toss.
  pub fn destination(&self) -> &ReactiveProperty<Point2D> { self.inner.spring.destination() }

  pub fn resistance(&self) -> &ReactiveProperty<ResistanceConfig> { &self.inner.resistance }

  /// The point while it is being dragged, after resistance.
  pub fn dragged_location(&self) -> MotionObservable<Point2D> { self.inner.dragged_location.observable() }

  /// The location, with this interaction's activity on the state channel.
  pub fn value(&self) -> MotionObservable<Point2D> {
    let location = self.inner.location.clone();
    let state = self.inner.state.clone();
    MotionObservable::new(move |observer| {
      let subscription = Subscription::default();
      let o = observer.clone();
      subscription.add(state.subscribe(move |s| o.state(s)));
      subscription.add(location.subscribe_observer(observer));
      subscription
    })
  }

  /// `Active` while the point is dragged or the spring is moving it.
  pub fn state(&self) -> MotionObservable<State> { self.inner.state.observable() }

  pub fn current_state(&self) -> State { self.inner.state.read() }

  pub fn drag(&self) -> &DragSystem { &self.inner.drag }

  pub fn spring(&self) -> &Point2DSpring { &self.inner.spring }
}

fn upgraded<T>(weak: &Weak<TossableInner>, f: fn(&TossableInner, T)) -> impl Fn(T) + 'static
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

impl TossableInner {
  fn on_drag_state(&self, state: State) {
    match state {
      State::Active if !self.dragging.get() => {
        self.dragging.set(true);
        self.location_on_down.set(self.location.read());
        self.spring.enabled().write(false);
      }
      State::AtRest if self.dragging.get() => {
        self.dragging.set(false);
        let velocity = self.drag.current_velocity();
        tracing::debug!(?velocity, "tossing into spring");
        self.spring.initial_value().write(self.location.read());
        self.spring.initial_velocity().write(velocity);
        self.spring.enabled().write(true);
      }
      _ => {}
    }
  }

  fn on_translation(&self, translation: Point2D) {
    if !self.dragging.get() {
      return;
    }
    let location = self.resistance.read().apply(self.location_on_down.get() + translation);
    self.dragged_location.next(location);
    // A spring enabled mid-drag is chasing the pointer and owns the location.
    if !self.spring.enabled().read() {
      self.location.write(location);
    }
  }

  fn on_spring_value(&self, value: Point2D) {
    if !self.dragging.get() || self.spring.enabled().read() {
      self.location.write(value);
    }
  }
}

impl Drop for TossableInner {
  fn drop(&mut self) { self.subscription.unsubscribe() }
}
