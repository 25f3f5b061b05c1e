//! Classification of numeric streams against boundaries.
//!
//! Boundaries are inclusive: a value exactly on a boundary is always
//! [`ThresholdSide::Within`].

use std::{cell::Cell, cmp::Ordering, rc::Rc};

use crate::{
  observable::{MotionObservable, Subscribable},
  observer::{Observer, Subscriber},
};

/// Where a value falls relative to a threshold or a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ThresholdSide {
  Below,
  Within,
  Above,
}

/// Range classifications use the same three regions.
pub type ThresholdRegion = ThresholdSide;

/// Distance used by [`MotionObservable::sliding_threshold_default`].
pub const DEFAULT_SLIDING_DISTANCE: f64 = 56.;

fn classify(value: f64, lower: f64, upper: f64) -> Option<ThresholdSide> {
  match (value.partial_cmp(&lower)?, value.partial_cmp(&upper)?) {
    (Ordering::Less, _) => Some(ThresholdSide::Below),
    (_, Ordering::Greater) => Some(ThresholdSide::Above),
    _ => Some(ThresholdSide::Within),
  }
}

impl MotionObservable<f64> {
  /// `Below` under `limit`, `Above` over it, `Within` exactly at it.
  pub fn threshold(&self, limit: f64) -> MotionObservable<ThresholdSide> { self.threshold_range(limit, limit) }

  /// Classify against `[a, b]`. The bounds may be given in either order.
  pub fn threshold_range(&self, a: f64, b: f64) -> MotionObservable<ThresholdRegion> {
    let (lower, upper) = if a <= b { (a, b) } else { (b, a) };
    let source = self.clone();
    MotionObservable::new(move |observer| source.subscribe_observer(ThresholdObserver { observer, lower, upper }))
  }

  /// Report a side change once the value travels `distance` away from its
  /// running extreme: `Above` after rising `distance` over the lowest value
  /// since it last moved down, `Below` after falling `distance` under the
  /// highest. Repeats of the current side are not emitted.
  pub fn sliding_threshold(&self, distance: f64) -> MotionObservable<ThresholdSide> {
    let source = self.clone();
    MotionObservable::new(move |observer| {
      source.subscribe_observer(SlidingThresholdObserver {
        observer,
        distance,
        above: Cell::new(f64::INFINITY),
        below: Cell::new(f64::NEG_INFINITY),
        last_value: Cell::new(None),
        last_side: Cell::new(None),
      })
    })
  }

  pub fn sliding_threshold_default(&self) -> MotionObservable<ThresholdSide> {
    self.sliding_threshold(DEFAULT_SLIDING_DISTANCE)
  }
}

pub struct ThresholdObserver<O> {
  observer: O,
  lower: f64,
  upper: f64,
}

impl Observer<f64> for ThresholdObserver<Subscriber<ThresholdSide>> {
  fn next(&self, value: f64) {
    match classify(value, self.lower, self.upper) {
      Some(side) => self.observer.next(side),
      None => tracing::warn!(value, "threshold received an unordered value; skipped"),
    }
  }

  forward_state_and_error!(observer);
}

pub struct SlidingThresholdObserver<O> {
  observer: O,
  distance: f64,
  above: Cell<f64>,
  below: Cell<f64>,
  last_value: Cell<Option<f64>>,
  last_side: Cell<Option<ThresholdSide>>,
}

impl Observer<f64> for SlidingThresholdObserver<Subscriber<ThresholdSide>> {
  fn next(&self, value: f64) {
    let mut side = None;
    if value > self.above.get() && self.last_side.get() != Some(ThresholdSide::Above) {
      side = Some(ThresholdSide::Above);
    }
    if value < self.below.get() && self.last_side.get() != Some(ThresholdSide::Below) {
      side = Some(ThresholdSide::Below);
    }

    let last = self.last_value.get();
    if last.map_or(true, |last| value < last) {
      self.above.set(value + self.distance);
    }
    if last.map_or(true, |last| value > last) {
      self.below.set(value - self.distance);
    }
    self.last_value.set(Some(value));

    if let Some(side) = side {
      self.last_side.set(Some(side));
      self.observer.next(side);
    }
  }

  forward_state_and_error!(observer);
}

impl<T: PartialEq + 'static> MotionObservable<T> {
  /// `true` whenever the value equals one of `candidates`.
  pub fn is_any_of(&self, candidates: Vec<T>) -> MotionObservable<bool> {
    let candidates = Rc::new(candidates);
    self.map(move |v| candidates.contains(&v))
  }
}

impl MotionObservable<bool> {
  pub fn inverted(&self) -> MotionObservable<bool> { self.map(|v| !v) }
}
