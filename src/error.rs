//! Error type shared by every stage of a motion pipeline.
//!
//! Construction-time problems (bad configs, malformed mappings) are returned
//! as `Result`s. Problems that only show up once values flow are reported on
//! the observer's error channel instead, see
//! [`Observer::error`](crate::observer::Observer::error).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MotionError {
  /// A config value or option that can never produce a working stream.
  #[error("invalid configuration: {0}")]
  Configuration(String),

  /// Two numeric values of different shapes met in a component-wise op.
  #[error("shape mismatch: expected {expected}, found {found}")]
  ShapeMismatch { expected: &'static str, found: &'static str },

  /// `rewrite` saw an upstream key that has no mapping and no default.
  #[error("no rewrite mapping for key {0}")]
  MissingRewriteKey(String),

  /// An interpolation range whose start equals its end.
  #[error("zero-length range [{start}, {end}]")]
  ZeroRange { start: f64, end: f64 },
}

impl MotionError {
  pub(crate) fn config(msg: impl Into<String>) -> Self { MotionError::Configuration(msg.into()) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_messages() {
    assert_eq!(
      MotionError::config("size must be positive").to_string(),
      "invalid configuration: size must be positive"
    );
    assert_eq!(
      MotionError::ShapeMismatch { expected: "point", found: "scalar" }.to_string(),
      "shape mismatch: expected point, found scalar"
    );
    assert_eq!(MotionError::ZeroRange { start: 1., end: 1. }.to_string(), "zero-length range [1, 1]");
  }
}
