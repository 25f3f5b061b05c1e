//! Boolean aggregation over several streams.
//!
//! `any_of`, `all_of` and `none_of` stay silent until every input has
//! emitted at least once, then re-evaluate on every input value.

use crate::{observable::MotionObservable, ops::combine_latest::combine_latest};

pub fn any_of(streams: Vec<MotionObservable<bool>>) -> MotionObservable<bool> {
  combine_latest(streams).map(|values| values.iter().any(|v| *v))
}

pub fn all_of(streams: Vec<MotionObservable<bool>>) -> MotionObservable<bool> {
  combine_latest(streams).map(|values| values.iter().all(|v| *v))
}

pub fn none_of(streams: Vec<MotionObservable<bool>>) -> MotionObservable<bool> {
  combine_latest(streams).map(|values| !values.iter().any(|v| *v))
}

/// Pass only the `true` values of `stream`.
pub fn when(stream: &MotionObservable<bool>) -> MotionObservable<bool> { stream.filter(|v| *v) }

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{observable::from_iter, ops::test_util::collector, prelude::*};

  #[test]
  fn inert_until_every_stream_emits() {
    let a = Subject::new();
    let b = Subject::new();
    let (any, push_any) = collector();
    let (all, push_all) = collector();
    let (none, push_none) = collector();
    any_of(vec![a.observable(), b.observable()]).subscribe(push_any);
    all_of(vec![a.observable(), b.observable()]).subscribe(push_all);
    none_of(vec![a.observable(), b.observable()]).subscribe(push_none);

    a.next(true);
    assert!(any.borrow().is_empty());
    b.next(false);
    b.next(true);

    assert_eq!(*any.borrow(), vec![true, true]);
    assert_eq!(*all.borrow(), vec![false, true]);
    assert_eq!(*none.borrow(), vec![false, false]);
  }

  #[test]
  fn when_passes_only_true() {
    let (seen, push) = collector();
    when(&from_iter(vec![false, true, false, true])).subscribe(push);
    assert_eq!(*seen.borrow(), vec![true, true]);
  }
}
