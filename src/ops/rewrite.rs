//! Key-to-value rewriting.
//!
//! Every upstream value is a key looked up in a mapping. A key may map to a
//! plain value, emitted as is, or to a stream whose emissions are forwarded
//! until the key changes.

use std::{cell::Cell, fmt::Debug, rc::Rc};

use crate::{
  error::MotionError,
  observable::{MotionObservable, Subscribable},
  observer::{Observer, Subscriber},
  rc::{MutRc, RcDeref},
  state::State,
  subscription::{Subscription, SubscriptionLike},
};

pub enum RewriteTarget<V> {
  Value(V),
  Stream(MotionObservable<V>),
}

impl<V: Clone> Clone for RewriteTarget<V> {
  fn clone(&self) -> Self {
    match self {
      RewriteTarget::Value(v) => RewriteTarget::Value(v.clone()),
      RewriteTarget::Stream(s) => RewriteTarget::Stream(s.clone()),
    }
  }
}

impl<V> From<MotionObservable<V>> for RewriteTarget<V> {
  fn from(stream: MotionObservable<V>) -> Self { RewriteTarget::Stream(stream) }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RewriteOptions<V> {
  /// Emitted for keys missing from the mapping. Without it a missing key is
  /// an error.
  pub default: Option<V>,
  /// Forward what a newly mapped stream replays while being subscribed.
  pub dispatch_on_key_change: bool,
}

impl<V> Default for RewriteOptions<V> {
  fn default() -> Self { RewriteOptions { default: None, dispatch_on_key_change: true } }
}

struct Mapping<K, V> {
  entries: Vec<(K, RewriteTarget<V>)>,
  options: RewriteOptions<V>,
}

impl<K: PartialEq, V> Mapping<K, V> {
  fn position(&self, key: &K) -> Option<usize> { self.entries.iter().position(|(k, _)| k == key) }
}

impl<K> MotionObservable<K>
where
  K: PartialEq + Debug + 'static,
{
  /// Rewrite with default options.
  pub fn rewrite<V>(&self, mapping: Vec<(K, RewriteTarget<V>)>) -> Result<MotionObservable<V>, MotionError>
  where
    V: Clone + 'static,
  {
    self.rewrite_with(mapping, RewriteOptions::default())
  }

  /// Rewrite every key through `mapping`.
  ///
  /// When the key changes, the stream mapped to the previous key is
  /// unsubscribed before the new one is subscribed. A repeated key keeps the
  /// current stream. Duplicate keys in `mapping` are rejected.
  pub fn rewrite_with<V>(
    &self,
    mapping: Vec<(K, RewriteTarget<V>)>,
    options: RewriteOptions<V>,
  ) -> Result<MotionObservable<V>, MotionError>
  where
    V: Clone + 'static,
  {
    for (i, (key, _)) in mapping.iter().enumerate() {
      if mapping[..i].iter().any(|(k, _)| k == key) {
        return Err(MotionError::config(format!("duplicate rewrite key {key:?}")));
      }
    }

    let source = self.clone();
    let mapping = Rc::new(Mapping { entries: mapping, options });
    Ok(MotionObservable::new(move |observer| {
      let current = MutRc::own(None);
      let generation = Rc::new(Cell::new(0));
      let subscription = source.subscribe_observer(RewriteObserver {
        observer,
        mapping: mapping.clone(),
        current: current.clone(),
        generation: generation.clone(),
      });
      subscription.add_teardown(move || {
        generation.set(generation.get() + 1);
        if let Some((_, inner)) = current.replace(None) {
          inner.unsubscribe();
        }
      });
      subscription
    }))
  }

  /// Rewrite to plain values only.
  pub fn rewrite_values<V>(&self, mapping: Vec<(K, V)>) -> Result<MotionObservable<V>, MotionError>
  where
    V: Clone + 'static,
  {
    self.rewrite(mapping.into_iter().map(|(k, v)| (k, RewriteTarget::Value(v))).collect())
  }
}

pub struct RewriteObserver<O, K, V> {
  observer: O,
  mapping: Rc<Mapping<K, V>>,
  current: MutRc<Option<(usize, Subscription)>>,
  /// Bumped whenever the current inner stream is released, so a switch that
  /// was overtaken while its stream replayed drops its own subscription.
  generation: Rc<Cell<u64>>,
}

impl<K: PartialEq + Debug, V: Clone + 'static> RewriteObserver<Subscriber<V>, K, V> {
  fn release_current(&self) {
    self.generation.set(self.generation.get() + 1);
    if let Some((_, inner)) = self.current.replace(None) {
      inner.unsubscribe();
    }
  }

  fn switch_to(&self, index: usize, stream: &MotionObservable<V>) {
    let unchanged = matches!(&*self.current.rc_deref(), Some((i, _)) if *i == index);
    if unchanged {
      return;
    }
    self.release_current();
    let generation = self.generation.get();

    let swallowing = Rc::new(Cell::new(!self.mapping.options.dispatch_on_key_change));
    let inner = stream.subscribe_observer(InnerObserver {
      observer: self.observer.clone(),
      swallowing: swallowing.clone(),
    });
    swallowing.set(false);
    if self.generation.get() == generation {
      self.current.replace(Some((index, inner)));
    } else {
      inner.unsubscribe();
    }
  }
}

impl<K, V> Observer<K> for RewriteObserver<Subscriber<V>, K, V>
where
  K: PartialEq + Debug,
  V: Clone + 'static,
{
  fn next(&self, key: K) {
    match self.mapping.position(&key) {
      Some(index) => match &self.mapping.entries[index].1 {
        RewriteTarget::Value(v) => {
          self.release_current();
          self.observer.next(v.clone());
        }
        RewriteTarget::Stream(stream) => self.switch_to(index, stream),
      },
      None => {
        self.release_current();
        match &self.mapping.options.default {
          Some(default) => {
            tracing::warn!(?key, "no rewrite mapping for key; emitting default");
            self.observer.next(default.clone());
          }
          None => self.observer.error(MotionError::MissingRewriteKey(format!("{key:?}"))),
        }
      }
    }
  }

  fn state(&self, state: State) { self.observer.state(state) }

  fn error(&self, err: MotionError) { self.observer.error(err) }
}

pub struct InnerObserver<O> {
  observer: O,
  swallowing: Rc<Cell<bool>>,
}

impl<V> Observer<V> for InnerObserver<Subscriber<V>> {
  fn next(&self, value: V) {
    if !self.swallowing.get() {
      self.observer.next(value);
    }
  }

  // Activity comes from upstream only.
  fn state(&self, _state: State) {}

  fn error(&self, err: MotionError) { self.observer.error(err) }
}
