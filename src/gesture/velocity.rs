//! Pointer velocity estimation.
//!
//! Velocity is measured over a short trailing window rather than the last
//! two samples. Walking back from the newest sample, the window is cut where
//! the pointer changed direction, and the average velocity between the
//! newest sample and the oldest one still moving the same way is reported.

use std::{collections::VecDeque, time::Duration};

use crate::{
  error::MotionError,
  values::{Point2D, Sample},
};

pub const DEFAULT_MAX_SAMPLES: usize = 5;
pub const DEFAULT_MAX_AGE: Duration = Duration::from_millis(250);
/// Units per millisecond.
pub const DEFAULT_MAX_VELOCITY: f64 = 5.;
/// Reported instead of an implausibly fast estimate built from only two
/// samples.
pub const DEFAULT_FALLBACK_VELOCITY: f64 = 1.;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VelocityConfig {
  pub max_samples: usize,
  pub max_age: Duration,
  pub max_velocity: f64,
  pub fallback_velocity: f64,
}

impl Default for VelocityConfig {
  fn default() -> Self {
    VelocityConfig {
      max_samples: DEFAULT_MAX_SAMPLES,
      max_age: DEFAULT_MAX_AGE,
      max_velocity: DEFAULT_MAX_VELOCITY,
      fallback_velocity: DEFAULT_FALLBACK_VELOCITY,
    }
  }
}

impl VelocityConfig {
  pub fn validate(&self) -> Result<(), MotionError> {
    if self.max_samples < 2 {
      return Err(MotionError::config(format!(
        "velocity needs at least 2 samples, got {}",
        self.max_samples
      )));
    }
    if self.max_velocity.is_nan() || self.max_velocity <= 0. {
      return Err(MotionError::config(format!("invalid max velocity {}", self.max_velocity)));
    }
    Ok(())
  }
}

/// Bounded history of pointer samples.
#[derive(Debug, Clone)]
pub struct VelocityTracker {
  config: VelocityConfig,
  samples: VecDeque<Sample<Point2D>>,
}

impl Default for VelocityTracker {
  fn default() -> Self { VelocityTracker::new(VelocityConfig::default()) }
}

impl VelocityTracker {
  pub fn new(config: VelocityConfig) -> Self {
    VelocityTracker { config, samples: VecDeque::with_capacity(config.max_samples) }
  }

  pub fn add(&mut self, sample: Sample<Point2D>) {
    if self.samples.len() == self.config.max_samples {
      self.samples.pop_front();
    }
    self.samples.push_back(sample);
  }

  pub fn reset(&mut self) { self.samples.clear(); }

  pub fn len(&self) -> usize { self.samples.len() }

  pub fn is_empty(&self) -> bool { self.samples.is_empty() }

  /// Velocity as of the newest sample.
  pub fn velocity(&self) -> Point2D {
    match self.samples.back() {
      Some(newest) => self.velocity_at(newest.timestamp),
      None => Point2D::ZERO,
    }
  }

  /// Velocity in units per millisecond, ignoring samples older than
  /// `max_age` at `now`.
  pub fn velocity_at(&self, now: Duration) -> Point2D {
    let recent: Vec<_> = self
      .samples
      .iter()
      .filter(|s| now.saturating_sub(s.timestamp) < self.config.max_age)
      .map(|s| (s.value, s.timestamp.as_micros() as f64 / 1000.))
      .collect();

    let x: Vec<_> = recent.iter().map(|(p, t)| (p.x, *t)).collect();
    let y: Vec<_> = recent.iter().map(|(p, t)| (p.y, *t)).collect();
    Point2D::new(self.estimate(&x), self.estimate(&y))
  }

  fn estimate(&self, records: &[(f64, f64)]) -> f64 {
    let (last_value, last_time) = match records {
      [.., _, last] => *last,
      _ => return 0.,
    };

    let mut velocity = 0.;
    let (mut next_value, mut next_time) = (last_value, last_time);
    for &(prev_value, prev_time) in records[..records.len() - 1].iter().rev() {
      let span = last_time - prev_time;
      if span > 0. {
        let average = (last_value - prev_value) / span;
        let pairwise = if next_time > prev_time {
          (next_value - prev_value) / (next_time - prev_time)
        } else {
          average
        };
        if velocity != 0. && (pairwise > 0.) != (velocity > 0.) {
          break;
        }
        velocity = average;
      }
      next_value = prev_value;
      next_time = prev_time;
    }

    if velocity.abs() > self.config.max_velocity {
      let limit = if records.len() < 3 { self.config.fallback_velocity } else { self.config.max_velocity };
      velocity = velocity.signum() * limit;
    }
    velocity
  }
}
