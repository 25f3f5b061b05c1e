//! Shared mutable cells for operator and subject state.
//!
//! Everything in this crate runs on one thread, so state shared between an
//! operator's producer, its observer and its teardown is an `Rc<RefCell<_>>`.
//! Borrows must never be held across a call into an observer: the observer
//! may re-enter the operator that owns the cell.

use std::{
  cell::{Ref, RefCell, RefMut},
  rc::Rc,
};

/// Immutable borrow of a shared cell.
pub trait RcDeref<T> {
  fn rc_deref(&self) -> Ref<'_, T>;
}

/// Mutable borrow of a shared cell.
pub trait RcDerefMut<T> {
  fn rc_deref_mut(&self) -> RefMut<'_, T>;
}

#[derive(Default)]
pub struct MutRc<T>(Rc<RefCell<T>>);

impl<T> MutRc<T> {
  pub fn own(t: T) -> Self { Self(Rc::new(RefCell::new(t))) }

  /// Swap in `t` and hand back the previous value.
  pub fn replace(&self, t: T) -> T { self.0.replace(t) }

  pub fn ptr_eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.0, &other.0) }
}

impl<T: Clone> MutRc<T> {
  /// A copy of the value; the borrow ends before this returns.
  pub fn get(&self) -> T { self.0.borrow().clone() }

  /// Like [`MutRc::get`], but `None` while the cell is mutably borrowed
  /// further up the stack.
  pub fn try_get(&self) -> Option<T> { self.0.try_borrow().ok().map(|v| v.clone()) }
}

impl<T> RcDeref<T> for MutRc<T> {
  #[inline]
  fn rc_deref(&self) -> Ref<'_, T> { self.0.borrow() }
}

impl<T> RcDerefMut<T> for MutRc<T> {
  #[inline]
  fn rc_deref_mut(&self) -> RefMut<'_, T> { self.0.borrow_mut() }
}

impl<T> Clone for MutRc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn clones_share_one_cell() {
    let a = MutRc::own(vec![1]);
    let b = a.clone();
    b.rc_deref_mut().push(2);
    assert!(a.ptr_eq(&b));
    assert_eq!(a.get(), vec![1, 2]);
    assert_eq!(a.replace(vec![]), vec![1, 2]);
    assert!(b.rc_deref().is_empty());
  }

  #[test]
  fn try_get_fails_while_mutably_borrowed() {
    let cell = MutRc::own(1);
    let guard = cell.rc_deref_mut();
    assert_eq!(cell.try_get(), None);
    drop(guard);
    assert_eq!(cell.try_get(), Some(1));
  }
}
