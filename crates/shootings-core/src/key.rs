//! Surrogate-key assignment.
//!
//! Every surrogate key in the model comes from a [`KeyAssigner`]: an ordered
//! map from a structured tuple to the integer assigned when that tuple was
//! first seen. Keys are dense and start at zero, so the n-th distinct tuple
//! receives `n`.
//!
//! Tuples are compared structurally rather than through a joined string, so
//! `("a_b", "c")` and `("a", "b_c")` never share a key, and neither do a
//! boolean `true` and the label `"true"`.

use std::{collections::HashMap, fmt, hash::Hash};

use serde::{Deserialize, Serialize};

/// An opaque integer identifier assigned by the pipeline.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SurrogateKey(usize);

impl SurrogateKey {
  pub const fn new(index: usize) -> Self { Self(index) }

  pub const fn get(self) -> usize { self.0 }
}

impl fmt::Display for SurrogateKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

// ─── Assigner ────────────────────────────────────────────────────────────────

/// Assigns dense surrogate keys to tuples in order of first appearance.
#[derive(Debug, Clone)]
pub struct KeyAssigner<K> {
  index: HashMap<K, SurrogateKey>,
  order: Vec<K>,
}

impl<K> Default for KeyAssigner<K> {
  fn default() -> Self {
    Self {
      index: HashMap::new(),
      order: Vec::new(),
    }
  }
}

impl<K: Eq + Hash + Clone> KeyAssigner<K> {
  pub fn new() -> Self { Self::default() }

  /// Return the key for `tuple`, assigning the next unused key if the tuple
  /// has not been seen before.
  pub fn assign(&mut self, tuple: K) -> SurrogateKey {
    if let Some(key) = self.index.get(&tuple) {
      return *key;
    }
    let key = SurrogateKey(self.order.len());
    self.order.push(tuple.clone());
    self.index.insert(tuple, key);
    key
  }

  /// Look up the key of a tuple without assigning one.
  pub fn get(&self, tuple: &K) -> Option<SurrogateKey> {
    self.index.get(tuple).copied()
  }

  pub fn contains(&self, tuple: &K) -> bool { self.index.contains_key(tuple) }

  pub fn len(&self) -> usize { self.order.len() }

  pub fn is_empty(&self) -> bool { self.order.is_empty() }

  /// Iterate `(key, tuple)` pairs in key order.
  pub fn iter(&self) -> impl Iterator<Item = (SurrogateKey, &K)> + '_ {
    self
      .order
      .iter()
      .enumerate()
      .map(|(i, tuple)| (SurrogateKey(i), tuple))
  }

  /// The distinct tuples, in key order.
  pub fn into_tuples(self) -> Vec<K> { self.order }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for KeyAssigner<K> {
  fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
    let mut assigner = Self::new();
    for tuple in iter {
      assigner.assign(tuple);
    }
    assigner
  }
}

/// Produce one key per input tuple; equal tuples share a key.
pub fn factorize<K, I>(tuples: I) -> Vec<SurrogateKey>
where
  K: Eq + Hash + Clone,
  I: IntoIterator<Item = K>,
{
  let mut assigner = KeyAssigner::new();
  tuples.into_iter().map(|t| assigner.assign(t)).collect()
}

/// Drop repeated tuples, keeping the first occurrence of each.
pub fn distinct<K, I>(tuples: I) -> Vec<K>
where
  K: Eq + Hash + Clone,
  I: IntoIterator<Item = K>,
{
  tuples.into_iter().collect::<KeyAssigner<K>>().into_tuples()
}
