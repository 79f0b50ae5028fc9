//! The key sequence that defines iteration and positional addressing for an
//! [`OrderedMap`](crate::OrderedMap).
//!
//! `KeyOrder` on its own does not enforce uniqueness; the owning map only pushes keys it has
//! checked against its store.

use core::borrow::Borrow;
use core::cmp::Ordering;
use core::ops::Index;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyOrder<K> {
    keys: Vec<K>,
}

impl<K> KeyOrder<K> {
    pub const fn new() -> Self {
        Self { keys: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            keys: Vec::with_capacity(cap),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn as_slice(&self) -> &[K] {
        &self.keys
    }

    pub fn iter(&self) -> core::slice::Iter<'_, K> {
        self.keys.iter()
    }

    pub fn push(&mut self, key: K) {
        self.keys.push(key)
    }

    /// Inserts `key` before position `pos`, shifting later keys toward the end.
    ///
    /// ## Panics
    /// Panics if `pos > len`. Use [`KeyOrder::resolve_clamped`] to obtain a valid position.
    pub fn insert(&mut self, pos: usize, key: K) {
        self.keys.insert(pos, key)
    }

    /// ## Panics
    /// Panics if `pos >= len`.
    pub fn remove(&mut self, pos: usize) -> K {
        self.keys.remove(pos)
    }

    pub fn position<Q: Eq + ?Sized>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
    {
        self.keys.iter().position(|k| k.borrow() == key)
    }

    pub fn reserve(&mut self, additional: usize) {
        self.keys.reserve(additional)
    }

    pub fn clear(&mut self) {
        self.keys.clear()
    }

    /// Maps a possibly negative index onto `[0, len)`.
    ///
    /// `-1` is the last key and `-len` the first. Anything outside `[-len, len)` yields `None`.
    pub fn resolve(&self, index: isize) -> Option<usize> {
        let len = self.keys.len();
        let pos = if index < 0 {
            len.checked_sub(index.unsigned_abs())?
        } else {
            index as usize
        };

        (pos < len).then_some(pos)
    }

    /// Maps a possibly negative index onto an insertion point in `[0, len]`.
    ///
    /// Negative indices count from the end. Positions before the front clamp to `0`, positions
    /// past the end clamp to `len`.
    pub fn resolve_clamped(&self, index: isize) -> usize {
        let len = self.keys.len();
        if index < 0 {
            len.saturating_sub(index.unsigned_abs())
        } else {
            (index as usize).min(len)
        }
    }

    pub fn sort_by<F: FnMut(&K, &K) -> Ordering>(&mut self, cmp: F) {
        self.keys.sort_by(cmp)
    }

    pub fn sort_by_key<T: Ord, F: FnMut(&K) -> T>(&mut self, f: F) {
        self.keys.sort_by_key(f)
    }

    pub fn reverse(&mut self) {
        self.keys.reverse()
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        self.keys.swap(a, b)
    }
}

impl<K: Ord> KeyOrder<K> {
    pub fn sort(&mut self) {
        self.keys.sort()
    }
}

impl<K> Index<usize> for KeyOrder<K> {
    type Output = K;

    #[track_caller]
    fn index(&self, pos: usize) -> &K {
        &self.keys[pos]
    }
}

impl<K> FromIterator<K> for KeyOrder<K> {
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

impl<K> IntoIterator for KeyOrder<K> {
    type Item = K;
    type IntoIter = std::vec::IntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.into_iter()
    }
}

impl<'a, K> IntoIterator for &'a KeyOrder<K> {
    type Item = &'a K;
    type IntoIter = core::slice::Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}
