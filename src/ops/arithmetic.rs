//! Component-wise arithmetic between a stream and an operand.
//!
//! The operand is either a constant or another stream. How the two sides
//! interact is controlled by [`EmitMode`].

use std::rc::Rc;

use crate::{
  error::MotionError,
  observable::{of, MotionObservable, Subscribable},
  observer::{Observer, Subscriber},
  property::ReactiveProperty,
  rc::{MutRc, RcDeref, RcDerefMut},
  state::State,
  subscription::Subscription,
  values::{Dimensions, Numeric, NumericValue, Point2D},
};

/// The right-hand side of an arithmetic operator.
pub enum Operand<T> {
  Const(T),
  Stream(MotionObservable<T>),
}

impl<T> Clone for Operand<T>
where
  T: Clone,
{
  fn clone(&self) -> Self {
    match self {
      Operand::Const(v) => Operand::Const(v.clone()),
      Operand::Stream(s) => Operand::Stream(s.clone()),
    }
  }
}

impl<T: Clone + 'static> Operand<T> {
  /// The operand as a stream; a constant emits once on subscribe.
  pub fn observable(&self) -> MotionObservable<T> {
    match self {
      Operand::Const(v) => of(v.clone()),
      Operand::Stream(s) => s.clone(),
    }
  }
}

macro_rules! const_operand {
  ($($ty:ty),*) => {
    $(
      impl From<$ty> for Operand<$ty> {
        #[inline]
        fn from(v: $ty) -> Self { Operand::Const(v) }
      }
    )*
  };
}

const_operand!(f64, Point2D, Dimensions, NumericValue);

impl<T> From<MotionObservable<T>> for Operand<T> {
  #[inline]
  fn from(stream: MotionObservable<T>) -> Self { Operand::Stream(stream) }
}

impl<T: Clone + 'static> From<ReactiveProperty<T>> for Operand<T> {
  #[inline]
  fn from(property: ReactiveProperty<T>) -> Self { Operand::Stream(property.observable()) }
}

impl<T: Clone + 'static> From<&ReactiveProperty<T>> for Operand<T> {
  #[inline]
  fn from(property: &ReactiveProperty<T>) -> Self { Operand::Stream(property.observable()) }
}

/// When a combined stream emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmitMode {
  /// Either side emits, using the latest value of the other. Nothing is
  /// emitted until both sides have a value.
  #[default]
  CombineLatest,
  /// Only upstream values emit. Operand values are remembered for the next
  /// upstream value.
  OnlyWithUpstream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArithmeticOptions {
  pub emit: EmitMode,
}

impl ArithmeticOptions {
  pub fn only_with_upstream() -> Self { ArithmeticOptions { emit: EmitMode::OnlyWithUpstream } }
}

struct Latest<T, U> {
  upstream: Option<T>,
  operand: Option<U>,
}

impl<T: Clone + 'static> MotionObservable<T> {
  /// Combine every value with the latest operand value through `f`.
  ///
  /// The operand is subscribed first, so a constant (or any operand that
  /// replays) is known before the first upstream value. Errors from `f` go
  /// to the error channel. The state channel follows upstream.
  pub fn combine_with<U, R, F>(
    &self,
    operand: impl Into<Operand<U>>,
    options: ArithmeticOptions,
    f: F,
  ) -> MotionObservable<R>
  where
    U: Clone + 'static,
    R: 'static,
    F: Fn(&T, &U) -> Result<R, MotionError> + 'static,
  {
    let source = self.clone();
    let operand = operand.into().observable();
    let func = Rc::new(f);
    MotionObservable::new(move |observer: Subscriber<R>| {
      let latest = MutRc::own(Latest { upstream: None, operand: None });
      let subscription = Subscription::default();
      subscription.add(operand.subscribe_observer(OperandObserver {
        observer: observer.clone(),
        latest: latest.clone(),
        func: func.clone(),
        emit: options.emit,
      }));
      subscription.add(source.subscribe_observer(UpstreamObserver { observer, latest, func: func.clone() }));
      subscription
    })
  }
}

fn emit_latest<T, U, R, F>(latest: &MutRc<Latest<T, U>>, func: &F, observer: &Subscriber<R>)
where
  T: Clone,
  U: Clone,
  F: Fn(&T, &U) -> Result<R, MotionError>,
{
  let pair = {
    let latest = latest.rc_deref();
    match (&latest.upstream, &latest.operand) {
      (Some(a), Some(b)) => Some((a.clone(), b.clone())),
      _ => None,
    }
  };
  if let Some((a, b)) = pair {
    match func(&a, &b) {
      Ok(v) => observer.next(v),
      Err(err) => observer.error(err),
    }
  }
}

pub struct UpstreamObserver<O, T, U, F> {
  observer: O,
  latest: MutRc<Latest<T, U>>,
  func: Rc<F>,
}

impl<T, U, R, F> Observer<T> for UpstreamObserver<Subscriber<R>, T, U, F>
where
  T: Clone,
  U: Clone,
  F: Fn(&T, &U) -> Result<R, MotionError>,
{
  fn next(&self, value: T) {
    self.latest.rc_deref_mut().upstream = Some(value);
    emit_latest(&self.latest, &*self.func, &self.observer);
  }

  fn state(&self, state: State) { self.observer.state(state) }

  fn error(&self, err: MotionError) { self.observer.error(err) }
}

pub struct OperandObserver<O, T, U, F> {
  observer: O,
  latest: MutRc<Latest<T, U>>,
  func: Rc<F>,
  emit: EmitMode,
}

impl<T, U, R, F> Observer<U> for OperandObserver<Subscriber<R>, T, U, F>
where
  T: Clone,
  U: Clone,
  F: Fn(&T, &U) -> Result<R, MotionError>,
{
  fn next(&self, value: U) {
    self.latest.rc_deref_mut().operand = Some(value);
    if self.emit == EmitMode::CombineLatest {
      emit_latest(&self.latest, &*self.func, &self.observer);
    }
  }

  // Operand activity is not the combined stream's activity.
  fn state(&self, _state: State) {}

  fn error(&self, err: MotionError) { self.observer.error(err) }
}

// ==================== Operators ====================

macro_rules! component_op {
  ($(#[$doc:meta])* $name:ident, $name_with:ident, $op:expr) => {
    $(#[$doc])*
    pub fn $name(&self, operand: impl Into<Operand<T>>) -> MotionObservable<T> {
      self.$name_with(operand, ArithmeticOptions::default())
    }

    pub fn $name_with(&self, operand: impl Into<Operand<T>>, options: ArithmeticOptions) -> MotionObservable<T> {
      self.combine_with(operand, options, |a: &T, b: &T| a.zip_with(b, $op))
    }
  };
}

impl<T: Numeric> MotionObservable<T> {
  component_op!(
    /// `value + operand`, component-wise.
    added_by, added_by_with, |a, b| a + b
  );
  component_op!(
    /// `value - operand`, component-wise.
    subtracted_by, subtracted_by_with, |a, b| a - b
  );
  component_op!(
    /// `value * operand`, component-wise.
    multiplied_by, multiplied_by_with, |a, b| a * b
  );
  component_op!(
    /// `value / operand`, component-wise. Division by zero follows IEEE 754.
    divided_by, divided_by_with, |a, b| a / b
  );

  /// Same as [`added_by`](Self::added_by); reads better for positions.
  #[inline]
  pub fn offset_by(&self, operand: impl Into<Operand<T>>) -> MotionObservable<T> { self.added_by(operand) }

  /// Multiply every component by a scalar factor.
  pub fn scaled_by(&self, factor: impl Into<Operand<f64>>) -> MotionObservable<T> {
    self.scaled_by_with(factor, ArithmeticOptions::default())
  }

  pub fn scaled_by_with(&self, factor: impl Into<Operand<f64>>, options: ArithmeticOptions) -> MotionObservable<T> {
    self.combine_with(factor, options, |v: &T, k: &f64| Ok(v.map_components(|c| c * k)))
  }
}
