//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Errors and value shapes
pub use crate::error::MotionError;
pub use crate::state::State;
pub use crate::values::{Dimensions, Numeric, NumericValue, Point2D, Sample};
// Core traits
pub use crate::observable::{from_iter, never, of, MotionObservable, Subscribable};
pub use crate::observer::{Callbacks, Observer, Subscriber};
// Subject
pub use crate::subject::{ReplaySubject, Subject};
// Subscription
pub use crate::subscription::{DynamicSubscriptions, Subscription, SubscriptionGuard, SubscriptionLike};
// Property
pub use crate::property::{Readable, ReactiveProperty, Writable};
// Operators
pub use crate::ops::{
  all_of, any_of, combine_latest, combine_latest2, combine_latest_partial, merge_all, none_of, when,
  ArithmeticOptions, EmitMode, MapRange, Operand, RewriteOptions, RewriteRange, RewriteTarget,
  ThresholdRegion, ThresholdSide,
};
// Scheduler
#[cfg(all(feature = "timer", not(target_arch = "wasm32")))]
pub use crate::scheduler::LocalScheduler;
pub use crate::scheduler::{Duration, Scheduler, SchedulerRef, Task, TaskHandle, TaskState, TestScheduler};
// Runtime
pub use crate::runtime::MotionRuntime;
// Springs
pub use crate::spring::{NumericSpring, Point2DSpring, Spring, SpringConfig};
// Gestures and interactions
pub use crate::gesture::{
  Axis, DragConfig, DragSystem, GestureRecognitionState, PointerEvent, VelocityConfig, VelocityTracker,
};
pub use crate::interactions::{
  ResistanceConfig, SwipeConfig, SwipeState, SwipeThreshold, Swipeable, Tossable,
};
