use std::collections::VecDeque;

use crate::{
  error::MotionError,
  observable::{MotionObservable, Subscribable},
  observer::{Observer, Subscriber},
  rc::{MutRc, RcDerefMut},
};

/// Window size used by [`MotionObservable::sliding_window_pairs`].
pub const DEFAULT_WINDOW_SIZE: usize = 2;
/// Larger windows grow their buffer as values arrive.
const PREALLOCATED_WINDOW: usize = 64;

impl<T: Clone + 'static> MotionObservable<T> {
  /// Emit the most recent `size` values, oldest first, on every new value.
  ///
  /// Until `size` values have arrived the partial window is emitted, so
  /// `sliding_window(3)` fed `1, 2, 3, 4` emits `[1]`, `[1, 2]`, `[1, 2, 3]`,
  /// `[2, 3, 4]`.
  pub fn sliding_window(&self, size: usize) -> Result<MotionObservable<Vec<T>>, MotionError> {
    if size == 0 {
      return Err(MotionError::config("sliding window size must be at least 1"));
    }
    Ok(self.window(size))
  }

  /// `sliding_window` with the default size of two: the previous and the
  /// current value.
  pub fn sliding_window_pairs(&self) -> MotionObservable<Vec<T>> { self.window(DEFAULT_WINDOW_SIZE) }

  fn window(&self, size: usize) -> MotionObservable<Vec<T>> {
    let source = self.clone();
    MotionObservable::new(move |observer| {
      source.subscribe_observer(SlidingWindowObserver {
        observer,
        size,
        buffer: MutRc::own(VecDeque::with_capacity(size.min(PREALLOCATED_WINDOW))),
      })
    })
  }
}

pub struct SlidingWindowObserver<O, T> {
  observer: O,
  size: usize,
  buffer: MutRc<VecDeque<T>>,
}

impl<T: Clone> Observer<T> for SlidingWindowObserver<Subscriber<Vec<T>>, T> {
  fn next(&self, value: T) {
    let window = {
      let mut buffer = self.buffer.rc_deref_mut();
      if buffer.len() == self.size {
        buffer.pop_front();
      }
      buffer.push_back(value);
      buffer.iter().cloned().collect::<Vec<_>>()
    };
    self.observer.next(window);
  }

  forward_state_and_error!(observer);
}
