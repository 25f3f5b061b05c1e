use smallvec::SmallVec;

use super::SubscriptionLike;

/// Id-keyed storage for a changing set of items, kept in insertion order.
///
/// Subjects keep their observers here and `delay_by` keeps its pending
/// deliveries here. The id returned by `add` stays valid until the
/// item is removed, so a teardown closure can capture it and remove exactly
/// its own entry.
pub struct DynamicSubscriptions<U> {
  next_id: usize,
  items: SmallVec<[(usize, U); 2]>,
}

impl<U> Default for DynamicSubscriptions<U> {
  fn default() -> Self { Self { next_id: 0, items: SmallVec::new() } }
}

impl<U> DynamicSubscriptions<U> {
  #[inline]
  pub fn new() -> Self { Self::default() }

  /// Add an item and return its unique ID.
  pub fn add(&mut self, item: U) -> usize {
    let id = self.next_id;
    self.next_id += 1;
    self.items.push((id, item));
    id
  }

  pub fn remove(&mut self, id: usize) -> Option<U> {
    self
      .items
      .iter()
      .position(|(i, _)| *i == id)
      .map(|pos| self.items.remove(pos).1)
  }

  #[inline]
  pub fn contains(&self, id: usize) -> bool { self.items.iter().any(|(i, _)| *i == id) }

  #[inline]
  pub fn len(&self) -> usize { self.items.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.items.is_empty() }

  pub fn drain(&mut self) -> impl Iterator<Item = U> + '_ { self.items.drain(..).map(|(_, item)| item) }

  pub fn iter(&self) -> impl Iterator<Item = &U> { self.items.iter().map(|(_, item)| item) }
}

impl<U: Clone> DynamicSubscriptions<U> {
  /// Copy out the current items so callers can iterate without holding a
  /// borrow of the container.
  pub fn snapshot(&self) -> SmallVec<[U; 2]> { self.iter().cloned().collect() }
}

impl<U: SubscriptionLike> DynamicSubscriptions<U> {
  pub fn unsubscribe_all(&mut self) {
    for item in self.drain() {
      item.unsubscribe();
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ids_survive_removal_of_others() {
    let mut subs = DynamicSubscriptions::new();
    let a = subs.add("a");
    let b = subs.add("b");
    let c = subs.add("c");

    assert_eq!(subs.remove(b), Some("b"));
    assert!(subs.contains(a) && subs.contains(c));
    assert_eq!(subs.remove(b), None);
    assert_eq!(subs.snapshot().as_slice(), &["a", "c"]);
  }
}
