use std::cell::Cell;

use crate::{
  error::MotionError,
  observable::{MotionObservable, Subscribable},
  ops::{arithmetic::Operand, combine_latest::combine_latest, ArithmeticOptions},
};

/// Linear mapping from one range onto another.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapRange {
  pub from_start: f64,
  pub from_end: f64,
  pub to_start: f64,
  pub to_end: f64,
  /// Keep the output within `[to_start, to_end]`.
  pub clamp: bool,
}

impl Default for MapRange {
  fn default() -> Self { MapRange { from_start: 0., from_end: 1., to_start: 0., to_end: 1., clamp: false } }
}

impl MapRange {
  pub fn new(from_start: f64, from_end: f64, to_start: f64, to_end: f64) -> Self {
    MapRange { from_start, from_end, to_start, to_end, clamp: false }
  }

  pub fn clamped(self) -> Self { MapRange { clamp: true, ..self } }

  /// Map `value`. A zero-length input range has no answer.
  pub fn apply(&self, value: f64) -> Result<f64, MotionError> {
    let span = self.from_end - self.from_start;
    if span == 0. {
      return Err(MotionError::ZeroRange { start: self.from_start, end: self.from_end });
    }
    let mut progress = (value - self.from_start) / span;
    if self.clamp {
      progress = progress.clamp(0., 1.);
    }
    Ok(self.to_start + progress * (self.to_end - self.to_start))
  }
}

/// A [`MapRange`] whose bounds may change over time.
#[derive(Clone)]
pub struct RewriteRange {
  pub from_start: Operand<f64>,
  pub from_end: Operand<f64>,
  pub to_start: Operand<f64>,
  pub to_end: Operand<f64>,
}

impl RewriteRange {
  pub fn new(
    from_start: impl Into<Operand<f64>>,
    from_end: impl Into<Operand<f64>>,
    to_start: impl Into<Operand<f64>>,
    to_end: impl Into<Operand<f64>>,
  ) -> Self {
    RewriteRange {
      from_start: from_start.into(),
      from_end: from_end.into(),
      to_start: to_start.into(),
      to_end: to_end.into(),
    }
  }
}

/// Zero ranges short-circuit to `to_start`, warning once per subscription.
fn apply_or_start(range: &MapRange, value: f64, warned: &Cell<bool>) -> f64 {
  match range.apply(value) {
    Ok(v) => v,
    Err(err) => {
      if !warned.replace(true) {
        tracing::warn!(%err, "map_range input range is empty; emitting to_start");
      }
      range.to_start
    }
  }
}

impl MotionObservable<f64> {
  /// Interpolate every value from `[from_start, from_end]` onto
  /// `[to_start, to_end]`. Values outside the input range extrapolate
  /// unless `clamp` is set.
  pub fn map_range(&self, range: MapRange) -> MotionObservable<f64> {
    let source = self.clone();
    MotionObservable::new(move |observer| {
      let warned = Cell::new(false);
      source.map(move |v| apply_or_start(&range, v, &warned)).subscribe_observer(observer)
    })
  }

  /// [`map_range`](Self::map_range) with reactive bounds. Nothing is
  /// emitted until every bound has a value; a bound update re-maps the
  /// latest upstream value.
  pub fn rewrite_range(&self, range: RewriteRange) -> MotionObservable<f64> {
    let source = self.clone();
    let bounds = combine_latest(vec![
      range.from_start.observable(),
      range.from_end.observable(),
      range.to_start.observable(),
      range.to_end.observable(),
    ]);
    MotionObservable::new(move |observer| {
      let warned = Cell::new(false);
      source
        .combine_with(bounds.clone(), ArithmeticOptions::default(), move |v: &f64, b: &Vec<f64>| {
          Ok(apply_or_start(&MapRange::new(b[0], b[1], b[2], b[3]), *v, &warned))
        })
        .subscribe_observer(observer)
    })
  }
}
