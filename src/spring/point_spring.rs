use super::{NumericSpring, Spring, SpringConfig};
use crate::{
  observable::{MotionObservable, Subscribable},
  ops::combine_latest2,
  property::ReactiveProperty,
  scheduler::SchedulerRef,
  state::State,
  subscription::Subscription,
  values::Point2D,
};

/// A two dimensional spring: one [`NumericSpring`] per axis.
///
/// Point properties are fanned out to the axes component-wise, and the
/// scalar physics properties are shared by both axes.
#[derive(Clone)]
pub struct Point2DSpring {
  x: NumericSpring,
  y: NumericSpring,
  destination: ReactiveProperty<Point2D>,
  initial_value: ReactiveProperty<Point2D>,
  initial_velocity: ReactiveProperty<Point2D>,
  tension: ReactiveProperty<f64>,
  friction: ReactiveProperty<f64>,
  threshold: ReactiveProperty<f64>,
  enabled: ReactiveProperty<bool>,
  value: MotionObservable<Point2D>,
  state: MotionObservable<State>,
  // Keeps the fan-out alive for as long as any clone exists.
  _links: Subscription,
}

fn link<T, U>(from: &ReactiveProperty<T>, to: &ReactiveProperty<U>, f: impl Fn(T) -> U + 'static) -> Subscription
where
  T: Clone + 'static,
  U: Clone + 'static,
{
  let to = to.clone();
  from.subscribe(move |v| to.write(f(v)))
}

impl Point2DSpring {
  pub fn new(scheduler: impl Into<SchedulerRef>) -> Self { Self::with_config(scheduler, SpringConfig::default()) }

  pub fn with_config(scheduler: impl Into<SchedulerRef>, config: SpringConfig) -> Self {
    let scheduler = scheduler.into();
    let x = NumericSpring::with_config(scheduler.clone(), config);
    let y = NumericSpring::with_config(scheduler, config);

    let destination = ReactiveProperty::new(Point2D::ZERO);
    let initial_value = ReactiveProperty::new(Point2D::ZERO);
    let initial_velocity = ReactiveProperty::new(Point2D::ZERO);
    let tension = ReactiveProperty::new(config.tension);
    let friction = ReactiveProperty::new(config.friction);
    let threshold = ReactiveProperty::new(config.threshold);
    let enabled = ReactiveProperty::new(true);

    let links = Subscription::default();
    for axis in [&x, &y] {
      links.add(link(&tension, axis.tension(), |v| v));
      links.add(link(&friction, axis.friction(), |v| v));
      links.add(link(&threshold, axis.threshold(), |v| v));
    }
    links.add(link(&initial_value, x.initial_value(), |p| p.x));
    links.add(link(&initial_value, y.initial_value(), |p| p.y));
    links.add(link(&initial_velocity, x.initial_velocity(), |p| p.x));
    links.add(link(&initial_velocity, y.initial_velocity(), |p| p.y));
    links.add(link(&destination, x.destination(), |p| p.x));
    links.add(link(&destination, y.destination(), |p| p.y));
    links.add(link(&enabled, x.enabled(), |v| v));
    links.add(link(&enabled, y.enabled(), |v| v));

    let value = combine_latest2(&x.value(), &y.value()).map(|(x, y)| Point2D::new(x, y));
    let state = combine_latest2(&x.state(), &y.state())
      .map(|(x, y)| x | y)
      .dedupe();

    Point2DSpring {
      x,
      y,
      destination,
      initial_value,
      initial_velocity,
      tension,
      friction,
      threshold,
      enabled,
      value,
      state,
      _links: links,
    }
  }
}

impl Spring<Point2D> for Point2DSpring {
  fn destination(&self) -> &ReactiveProperty<Point2D> { &self.destination }

  fn initial_value(&self) -> &ReactiveProperty<Point2D> { &self.initial_value }

  fn initial_velocity(&self) -> &ReactiveProperty<Point2D> { &self.initial_velocity }

  fn tension(&self) -> &ReactiveProperty<f64> { &self.tension }

  fn friction(&self) -> &ReactiveProperty<f64> { &self.friction }

  fn threshold(&self) -> &ReactiveProperty<f64> { &self.threshold }

  fn enabled(&self) -> &ReactiveProperty<bool> { &self.enabled }

  fn value(&self) -> MotionObservable<Point2D> { self.value.clone() }

  fn state(&self) -> MotionObservable<State> { self.state.clone() }

  fn current_state(&self) -> State { self.x.current_state() | self.y.current_state() }
}
