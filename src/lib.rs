//! # motion-streams: reactive streams for user-interface motion
//!
//! Turns pointer input into recognized gestures, and gestures and other
//! time-varying signals into continuously updated view properties, through
//! composable operators and simulated springs.
//!
//! ## Quick Start
//!
//! ```rust
//! use motion_streams::prelude::*;
//!
//! let scroll = Subject::new();
//! let opacity = ReactiveProperty::new(1.);
//!
//! let runtime = MotionRuntime::new();
//! runtime.write(
//!   &scroll.observable().map_range(MapRange::new(0., 200., 1., 0.).clamped()),
//!   opacity.clone(),
//! );
//!
//! scroll.next(50.);
//! assert_eq!(opacity.read(), 0.75);
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`MotionObservable`] | Stream blueprint with `next`, `state` and `error` channels |
//! | [`Subject`] / [`ReplaySubject`] | Multicast entry points, without and with replay |
//! | [`ReactiveProperty`] | Readable, writable slot that is also a stream |
//! | [`MotionRuntime`] | Binds streams to sinks and aggregates their activity |
//! | [`DragSystem`] | Drag recognition over pointer events |
//! | [`NumericSpring`] / [`Point2DSpring`] | Springs driven by a [`Scheduler`] |
//! | [`Tossable`] / [`Swipeable`] | Drags handed off to springs on release |
//!
//! ## Feature Flags
//!
//! - **`timer`** (default): [`LocalScheduler`], a wall-clock scheduler on a
//!   `futures` local executor
//! - **`serde`**: `Serialize`/`Deserialize` for value and config types
//!
//! The library logs through `tracing` and installs no subscriber.
//!
//! [`MotionObservable`]: observable::MotionObservable
//! [`Subject`]: subject::Subject
//! [`ReplaySubject`]: subject::ReplaySubject
//! [`ReactiveProperty`]: property::ReactiveProperty
//! [`MotionRuntime`]: runtime::MotionRuntime
//! [`DragSystem`]: gesture::DragSystem
//! [`NumericSpring`]: spring::NumericSpring
//! [`Point2DSpring`]: spring::Point2DSpring
//! [`Scheduler`]: scheduler::Scheduler
//! [`Tossable`]: interactions::Tossable
//! [`Swipeable`]: interactions::Swipeable
//! [`LocalScheduler`]: prelude::LocalScheduler

pub mod error;
pub mod gesture;
pub mod interactions;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod property;
pub mod rc;
pub mod runtime;
pub mod scheduler;
pub mod spring;
pub mod state;
pub mod subject;
pub mod subscription;
pub mod values;

mod util;

// Re-export the prelude module
pub use prelude::*;

#[cfg(doctest)]
mod __markdown_doctests {
  mod readme {
    #![doc = include_str!("../README.md")]
  }
}
