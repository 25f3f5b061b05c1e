//! Interactions: gestures handed off to springs.
//!
//! [`Tossable`] lets a drag move a point directly and, on release, hands the
//! point and the pointer's velocity to a spring. [`Swipeable`] narrows that
//! to horizontal swipes and decides where the spring should go.

mod swipeable;
mod tossable;

pub use swipeable::{SwipeConfig, SwipeState, SwipeThreshold, Swipeable, VISUAL_THRESHOLD};
pub use tossable::{ResistanceConfig, Tossable};
