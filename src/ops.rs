//! Operators over [`MotionObservable`](crate::observable::MotionObservable).
//!
//! Each operator lives in its own module as an inherent method (or a free
//! function, for the n-ary ones). Operators never mutate their inputs: they
//! return a new observable whose producer subscribes upstream with an
//! `XxxObserver` wrapping the downstream subscriber. Unless documented
//! otherwise, the state and error channels pass through untouched.

/// Expands to `state`/`error` methods that forward to `self.$field`. In
/// textual scope for every operator module declared below.
macro_rules! forward_state_and_error {
  ($field:ident) => {
    #[inline]
    fn state(&self, state: $crate::state::State) { self.$field.state(state) }
    #[inline]
    fn error(&self, err: $crate::error::MotionError) { self.$field.error(err) }
  };
}

pub mod aggregators;
pub mod arithmetic;
pub mod bounds;
pub mod combine_latest;
pub mod dedupe;
pub mod delay;
pub mod distance;
pub mod filter;
pub mod ignore_until;
pub mod log;
pub mod map;
pub mod map_range;
pub mod merge;
pub mod remember;
pub mod rewrite;
pub mod sliding_window;
pub mod start_with;
pub mod tap;
pub mod threshold;
pub mod timestamp;
pub mod velocity;

pub use aggregators::{all_of, any_of, none_of, when};
pub use arithmetic::{ArithmeticOptions, EmitMode, Operand};
pub use combine_latest::{combine_latest, combine_latest2, combine_latest_partial};
pub use map_range::{MapRange, RewriteRange};
pub use merge::merge_all;
pub use rewrite::{RewriteOptions, RewriteTarget};
pub use threshold::{ThresholdRegion, ThresholdSide};

#[cfg(test)]
pub(crate) mod test_util {
  use std::{cell::RefCell, rc::Rc};

  use crate::{error::MotionError, observer::Callbacks, state::State};

  /// Everything an observer received, in order.
  #[derive(Debug, PartialEq, Clone)]
  pub enum Event<T> {
    Next(T),
    State(State),
    Error(MotionError),
  }

  pub type Log<T> = Rc<RefCell<Vec<Event<T>>>>;

  pub fn recorder<T: 'static>() -> (Log<T>, Callbacks<T>) {
    let log: Log<T> = Rc::new(RefCell::new(vec![]));
    let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
    let callbacks = Callbacks::new(move |v| l1.borrow_mut().push(Event::Next(v)))
      .on_state(move |s| l2.borrow_mut().push(Event::State(s)))
      .on_error(move |e| l3.borrow_mut().push(Event::Error(e)));
    (log, callbacks)
  }

  pub fn values<T: Clone>(log: &Log<T>) -> Vec<T> {
    log
      .borrow()
      .iter()
      .filter_map(|e| match e {
        Event::Next(v) => Some(v.clone()),
        _ => None,
      })
      .collect()
  }

  pub fn collector<T: 'static>() -> (Rc<RefCell<Vec<T>>>, impl Fn(T) + 'static) {
    let seen = Rc::new(RefCell::new(vec![]));
    let s = seen.clone();
    (seen, move |v| s.borrow_mut().push(v))
  }
}
