use core::borrow::Borrow;
use core::cmp::Ordering;
use core::hash::{BuildHasher, Hash};
use core::iter::{Extend, FromIterator, FusedIterator};
use core::marker::PhantomData;
use std::ops::Index;

use serde::de::DeserializeSeed;

use crate::error::{inconsistency, Error, Result};
use crate::order::KeyOrder;
use crate::store::{MapStore, RawStore};

/// A hash map that iterates, and can be addressed by position, in a caller-controlled order.
///
/// Keys are kept both in a [`KeyOrder`] and in the backing store `M`. New keys are appended at
/// the end; [`OrderedMap::set_at`] places (or moves) a key at a given position and the `sort_*`
/// and [`OrderedMap::reverse`] methods permute the order without touching values.
///
/// Positional methods take an `isize`: negative indices count from the end, so `-1` is the last
/// entry.
#[derive(Clone)]
pub struct OrderedMap<K, V, M = RawStore<K, V>> {
    order: KeyOrder<K>,
    store: M,
    _values: PhantomData<fn() -> V>,
}

impl<K, V, M: Default> Default for OrderedMap<K, V, M> {
    fn default() -> Self {
        Self {
            order: KeyOrder::new(),
            store: M::default(),
            _values: PhantomData,
        }
    }
}

impl<K, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            order: KeyOrder::with_capacity(cap),
            store: RawStore::with_capacity(cap),
            _values: PhantomData,
        }
    }
}

impl<K, V, S> OrderedMap<K, V, RawStore<K, V, S>> {
    pub const fn with_hasher(hasher: S) -> Self {
        Self {
            order: KeyOrder::new(),
            store: RawStore::with_hasher(hasher),
            _values: PhantomData,
        }
    }

    pub fn with_capacity_and_hasher(cap: usize, hasher: S) -> Self {
        Self {
            order: KeyOrder::with_capacity(cap),
            store: RawStore::with_capacity_and_hasher(cap, hasher),
            _values: PhantomData,
        }
    }
}

impl<K, V, M> OrderedMap<K, V, M> {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The keys in map order.
    ///
    /// The slice borrows the map, so it stays a consistent snapshot for as long as it is held.
    pub fn keys(&self) -> &[K] {
        self.order.as_slice()
    }

    /// Read-only access to the backing store. Its iteration order is unrelated to map order.
    pub fn store(&self) -> &M {
        &self.store
    }

    pub fn reverse(&mut self) {
        self.order.reverse()
    }

    pub fn sort_by<F: FnMut(&K, &K) -> Ordering>(&mut self, cmp: F) {
        self.order.sort_by(cmp)
    }

    pub fn sort_by_key<T: Ord, F: FnMut(&K) -> T>(&mut self, f: F) {
        self.order.sort_by_key(f)
    }

    /// Exchanges the positions of two entries.
    pub fn swap(&mut self, a: isize, b: isize) -> Result<()> {
        let len = self.len();
        let a = self
            .order
            .resolve(a)
            .ok_or(Error::IndexOutOfRange { index: a, len })?;
        let b = self
            .order
            .resolve(b)
            .ok_or(Error::IndexOutOfRange { index: b, len })?;

        self.order.swap(a, b);
        Ok(())
    }
}

impl<K: Ord, V, M> OrderedMap<K, V, M> {
    /// Stable sort of the entries by key.
    pub fn sort_keys(&mut self) {
        self.order.sort()
    }
}

impl<K: Hash + Eq, V, M: MapStore<K, V>> OrderedMap<K, V, M> {
    /// Adopts a pre-filled store. Map order is a snapshot of the store's own key order.
    pub fn from_store(plain: M) -> Self
    where
        K: Clone,
    {
        let order = plain.keys().cloned().collect();

        Self {
            order,
            store: plain,
            _values: PhantomData,
        }
    }

    /// Builds a map from `(key, value)` pairs in sequence order.
    ///
    /// A key that appears more than once keeps the position of its first occurrence and the
    /// value of its last.
    pub fn from_pairs<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self
    where
        K: Clone,
        M: Default,
    {
        let mut map = Self::default();
        map.extend(pairs);
        map
    }

    pub fn reserve(&mut self, additional: usize) {
        self.order.reserve(additional);
        self.store.reserve(additional);
    }

    pub fn contains_key<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        self.store.contains_key(key)
    }

    pub fn get<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
    {
        self.store.get(key).ok_or(Error::KeyNotFound)
    }

    pub fn get_mut<Q: Hash + Eq + ?Sized>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
    {
        self.store.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// The entry at `index`, counting from the end when negative.
    pub fn get_at(&self, index: isize) -> Result<(&K, &V)> {
        let pos = self.resolve(index)?;
        let key = &self.order[pos];
        let value = self
            .store
            .get(key)
            .ok_or_else(|| inconsistency(format!("no value stored for position {pos}")))?;

        Ok((key, value))
    }

    pub fn get_at_mut(&mut self, index: isize) -> Result<(&K, &mut V)> {
        let pos = self.resolve(index)?;
        let key = &self.order[pos];
        let value = self
            .store
            .get_mut(key)
            .ok_or_else(|| inconsistency(format!("no value stored for position {pos}")))?;

        Ok((key, value))
    }

    /// Current position of `key`. This is a linear scan.
    pub fn position<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
    {
        self.order.position(key)
    }

    /// Stores `value` under `key`, returning the value it replaced.
    ///
    /// A new key is appended at the end; an existing key keeps its position.
    pub fn set(&mut self, key: K, value: V) -> Option<V>
    where
        K: Clone,
    {
        if !self.store.contains_key(&key) {
            self.order.push(key.clone());
        }

        self.store.insert(key, value)
    }

    /// Stores `value` under `key` and places `key` at `index`.
    ///
    /// If `key` is already present it is moved rather than duplicated. A negative `index` counts
    /// from the end of the map as it stands after that removal. Indices before the front insert
    /// at the front and indices past the end append.
    pub fn set_at(&mut self, index: isize, key: K, value: V) -> Result<Option<V>>
    where
        K: Clone,
    {
        match self.order.position(&key) {
            Some(pos) => {
                self.order.remove(pos);
            }
            None if self.store.contains_key(&key) => {
                return Err(inconsistency("stored key is missing from the key order"));
            }
            None => {}
        }

        let pos = self.order.resolve_clamped(index);
        tracing::trace!(index, pos, "placing key");
        self.order.insert(pos, key.clone());

        Ok(self.store.insert(key, value))
    }

    /// Removes `key`. Returns `false` if it was not present.
    pub fn remove<Q: Hash + Eq + ?Sized>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        self.remove_entry(key).is_some()
    }

    pub fn remove_entry<Q: Hash + Eq + ?Sized>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
    {
        let pos = self.order.position(key)?;
        self.take_at(pos)
    }

    /// Removes the entry at `index`. Returns `false` if `index` is out of range.
    pub fn remove_at(&mut self, index: isize) -> bool {
        self.remove_entry_at(index).is_some()
    }

    pub fn remove_entry_at(&mut self, index: isize) -> Option<(K, V)> {
        let pos = self.order.resolve(index)?;
        self.take_at(pos)
    }

    fn take_at(&mut self, pos: usize) -> Option<(K, V)> {
        if !self.store.contains_key(&self.order[pos]) {
            inconsistency(format!("no value stored for position {pos}"));
            return None;
        }

        let key = self.order.remove(pos);
        let value = self.store.remove(&key)?;
        Some((key, value))
    }

    fn resolve(&self, index: isize) -> Result<usize> {
        self.order.resolve(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.store.clear();
    }

    /// Values in map order, each looked up as the iterator reaches it.
    pub fn values(&self) -> Values<'_, K, V, M> {
        Values {
            keys: self.order.iter(),
            store: &self.store,
            _values: PhantomData,
        }
    }

    /// `(key, value)` pairs in map order, each looked up as the iterator reaches it.
    pub fn pairs(&self) -> Pairs<'_, K, V, M> {
        Pairs {
            keys: self.order.iter(),
            store: &self.store,
            _values: PhantomData,
        }
    }

    pub fn iter(&self) -> Pairs<'_, K, V, M> {
        self.pairs()
    }

    /// An owned snapshot of every entry in map order.
    pub fn to_pairs(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.pairs().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Compares the stored entries with `other`, ignoring order.
    pub fn store_eq(&self, other: &M) -> bool
    where
        M: PartialEq,
    {
        self.store == *other
    }

    /// Verifies that the key order and the store describe the same set of keys.
    pub fn check_invariants(&self) -> Result<()> {
        if self.order.len() != self.store.len() {
            return Err(inconsistency(format!(
                "{} ordered keys but {} stored values",
                self.order.len(),
                self.store.len()
            )));
        }

        for (pos, key) in self.order.iter().enumerate() {
            if !self.store.contains_key(key) {
                return Err(inconsistency(format!("key at position {pos} has no stored value")));
            }
            if self.order.position(key) != Some(pos) {
                return Err(inconsistency(format!("key at position {pos} also appears earlier")));
            }
        }

        Ok(())
    }
}

impl<K, V, M> core::fmt::Debug for OrderedMap<K, V, M>
where
    K: core::fmt::Debug + Hash + Eq,
    V: core::fmt::Debug,
    M: MapStore<K, V>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.pairs()).finish()
    }
}

/// Order-sensitive: equal maps hold equal entries in the same order.
impl<K, V, M> PartialEq for OrderedMap<K, V, M>
where
    K: Hash + Eq,
    V: PartialEq,
    M: MapStore<K, V>,
{
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order && self.values().eq(other.values())
    }
}

impl<K: Hash + Eq, V: Eq, M: MapStore<K, V>> Eq for OrderedMap<K, V, M> {}

impl<K, Q, V, M> Index<&Q> for OrderedMap<K, V, M>
where
    K: Hash + Eq + Borrow<Q>,
    Q: Hash + Eq + ?Sized,
    M: MapStore<K, V>,
{
    type Output = V;

    #[track_caller]
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no such key in map")
    }
}

impl<'a, K, V, M> IntoIterator for &'a OrderedMap<K, V, M>
where
    K: Hash + Eq,
    M: MapStore<K, V>,
{
    type IntoIter = Pairs<'a, K, V, M>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.pairs()
    }
}

impl<K: Hash + Eq, V, M: MapStore<K, V>> IntoIterator for OrderedMap<K, V, M> {
    type IntoIter = IntoIter<K, V, M>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            keys: self.order.into_iter(),
            store: self.store,
            _values: PhantomData,
        }
    }
}

impl<K: Hash + Eq + Clone, V, M: MapStore<K, V> + Default> FromIterator<(K, V)>
    for OrderedMap<K, V, M>
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::from_pairs(iter)
    }
}

impl<'a, 'b, K: Hash + Eq + Clone, V: Clone, M: MapStore<K, V> + Default>
    FromIterator<(&'a K, &'b V)> for OrderedMap<K, V, M>
{
    fn from_iter<T: IntoIterator<Item = (&'a K, &'b V)>>(iter: T) -> Self {
        let mut map = Self::default();

        map.extend(iter);

        map
    }
}

impl<K: Hash + Eq + Clone, V, M: MapStore<K, V> + Default, const N: usize> From<[(K, V); N]>
    for OrderedMap<K, V, M>
{
    fn from(pairs: [(K, V); N]) -> Self {
        Self::from_pairs(pairs)
    }
}

impl<K: Hash + Eq + Clone, V, M: MapStore<K, V>> Extend<(K, V)> for OrderedMap<K, V, M> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);

        for (k, v) in iter {
            if self.store.contains_key(&k) {
                if let Some(pos) = self.order.position(&k) {
                    tracing::debug!(
                        pos,
                        "duplicate key in pair sequence, keeping its first position"
                    );
                }
            }
            self.set(k, v);
        }
    }
}

impl<'a, 'b, K: Hash + Eq + Clone, V: Clone, M: MapStore<K, V>> Extend<(&'a K, &'b V)>
    for OrderedMap<K, V, M>
{
    fn extend<T: IntoIterator<Item = (&'a K, &'b V)>>(&mut self, iter: T) {
        self.extend(iter.into_iter().map(|(k, v)| (k.clone(), v.clone())))
    }
}

pub struct Values<'a, K, V, M> {
    keys: core::slice::Iter<'a, K>,
    store: &'a M,
    _values: PhantomData<&'a V>,
}

impl<'a, K, V, M> Clone for Values<'a, K, V, M> {
    fn clone(&self) -> Self {
        Self {
            keys: self.keys.clone(),
            store: self.store,
            _values: PhantomData,
        }
    }
}

impl<'a, K: Hash + Eq, V: 'a, M: MapStore<K, V>> Iterator for Values<'a, K, V, M> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let store = self.store;
        self.keys.by_ref().find_map(|k| store.get(k))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<'a, K: Hash + Eq, V: 'a, M: MapStore<K, V>> DoubleEndedIterator for Values<'a, K, V, M> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let store = self.store;
        self.keys.by_ref().rev().find_map(|k| store.get(k))
    }
}

impl<'a, K: Hash + Eq, V: 'a, M: MapStore<K, V>> ExactSizeIterator for Values<'a, K, V, M> {}
impl<'a, K: Hash + Eq, V: 'a, M: MapStore<K, V>> FusedIterator for Values<'a, K, V, M> {}

pub struct Pairs<'a, K, V, M> {
    keys: core::slice::Iter<'a, K>,
    store: &'a M,
    _values: PhantomData<&'a V>,
}

impl<'a, K, V, M> Clone for Pairs<'a, K, V, M> {
    fn clone(&self) -> Self {
        Self {
            keys: self.keys.clone(),
            store: self.store,
            _values: PhantomData,
        }
    }
}

impl<'a, K: Hash + Eq, V: 'a, M: MapStore<K, V>> Iterator for Pairs<'a, K, V, M> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let store = self.store;
        self.keys.by_ref().find_map(|k| store.get(k).map(|v| (k, v)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<'a, K: Hash + Eq, V: 'a, M: MapStore<K, V>> DoubleEndedIterator for Pairs<'a, K, V, M> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let store = self.store;
        self.keys
            .by_ref()
            .rev()
            .find_map(|k| store.get(k).map(|v| (k, v)))
    }
}

impl<'a, K: Hash + Eq, V: 'a, M: MapStore<K, V>> ExactSizeIterator for Pairs<'a, K, V, M> {}
impl<'a, K: Hash + Eq, V: 'a, M: MapStore<K, V>> FusedIterator for Pairs<'a, K, V, M> {}

pub struct IntoIter<K, V, M> {
    keys: std::vec::IntoIter<K>,
    store: M,
    _values: PhantomData<fn() -> V>,
}

impl<K: Hash + Eq, V, M: MapStore<K, V>> Iterator for IntoIter<K, V, M> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let store = &mut self.store;
        self.keys.by_ref().find_map(|k| store.remove(&k).map(|v| (k, v)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<K: Hash + Eq, V, M: MapStore<K, V>> DoubleEndedIterator for IntoIter<K, V, M> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let store = &mut self.store;
        self.keys
            .by_ref()
            .rev()
            .find_map(|k| store.remove(&k).map(|v| (k, v)))
    }
}

impl<K: Hash + Eq, V, M: MapStore<K, V>> ExactSizeIterator for IntoIter<K, V, M> {}
impl<K: Hash + Eq, V, M: MapStore<K, V>> FusedIterator for IntoIter<K, V, M> {}

impl<K, V, M> serde::ser::Serialize for OrderedMap<K, V, M>
where
    K: serde::ser::Serialize + Hash + Eq,
    V: serde::ser::Serialize,
    M: MapStore<K, V>,
{
    fn serialize<__S>(&self, serializer: __S) -> Result<__S::Ok, __S::Error>
    where
        __S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut ser = serializer.serialize_map(Some(self.len()))?;

        for (key, value) in self {
            ser.serialize_entry(key, value)?;
        }

        ser.end()
    }
}

impl<'de, K, V, M> serde::de::Deserialize<'de> for OrderedMap<K, V, M>
where
    K: serde::de::Deserialize<'de> + Hash + Eq + Clone,
    V: serde::de::Deserialize<'de>,
    M: MapStore<K, V> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        de::WithStore::<PhantomData<K>, PhantomData<V>, M>::new(M::default())
            .deserialize(deserializer)
    }
}

impl<K, V, S: BuildHasher> OrderedMap<K, V, RawStore<K, V, S>> {
    pub fn hasher(&self) -> &S {
        self.store.hasher()
    }
}

pub mod de;

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::OrderedMap;
    use crate::error::Error;
    use crate::hasher::RandomState;
    use crate::order::KeyOrder;
    use crate::store::RawStore;

    fn abc() -> OrderedMap<&'static str, i32> {
        OrderedMap::from([("a", 1), ("b", 2), ("c", 3)])
    }

    #[test]
    fn set_appends_new_and_keeps_existing_positions() {
        let mut map = OrderedMap::new();
        assert_eq!(map.set("one", 1), None);
        assert_eq!(map.set("two", 2), None);
        assert_eq!(map.set("one", 10), Some(1));

        assert_eq!(map.keys(), ["one", "two"]);
        assert_eq!(map["one"], 10);
        map.check_invariants().unwrap();
    }

    #[test]
    fn set_at_moves_existing_key() {
        let mut map = abc();
        assert_eq!(map.set_at(0, "b", 20), Ok(Some(2)));

        assert_eq!(map.keys(), ["b", "a", "c"]);
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("b"), Ok(&20));
        map.check_invariants().unwrap();
    }

    #[test]
    fn set_at_negative_index_counts_after_removal() {
        let mut map = abc();
        // "a" is taken out first, leaving ["b", "c"]; -1 then resolves to position 1
        map.set_at(-1, "a", 1).unwrap();
        assert_eq!(map.keys(), ["b", "a", "c"]);

        let mut map = abc();
        map.set_at(-1, "d", 4).unwrap();
        assert_eq!(map.keys(), ["a", "b", "d", "c"]);
    }

    #[test]
    fn set_at_clamps_to_the_ends() {
        let mut map = abc();
        map.set_at(100, "z", 26).unwrap();
        map.set_at(-100, "y", 25).unwrap();
        assert_eq!(map.keys(), ["y", "a", "b", "c", "z"]);

        map.set_at(3, "c", 3).unwrap();
        assert_eq!(map.keys(), ["y", "a", "b", "c", "z"]);
        map.check_invariants().unwrap();
    }

    #[test]
    fn set_at_on_empty_map() {
        let mut map: OrderedMap<&str, i32> = OrderedMap::new();
        map.set_at(-5, "only", 1).unwrap();
        assert_eq!(map.keys(), ["only"]);
    }

    #[test]
    fn set_at_reports_key_missing_from_order() {
        let mut store = RawStore::new();
        store.insert("ghost", 0);
        let mut map = OrderedMap {
            order: KeyOrder::new(),
            store,
            _values: core::marker::PhantomData,
        };

        let err = map.set_at(0, "ghost", 1).unwrap_err();
        assert!(err.is_inconsistency());
        assert!(map.keys().is_empty());
        assert!(map.check_invariants().is_err());
    }

    #[test]
    fn remove_leaves_order_alone_when_value_is_missing() {
        let mut map: OrderedMap<&str, i32> = OrderedMap {
            order: ["ghost", "real"].into_iter().collect(),
            store: [("real", 1)].into_iter().collect(),
            _values: core::marker::PhantomData,
        };

        assert!(!map.remove_at(0));
        assert_eq!(map.remove_entry("ghost"), None);
        assert_eq!(map.keys(), ["ghost", "real"]);

        assert!(map.remove_at(-1));
        assert_eq!(map.keys(), ["ghost"]);
    }

    #[test]
    fn get_at_wraps_negative_indices() {
        let map = abc();
        assert_eq!(map.get_at(0), Ok((&"a", &1)));
        assert_eq!(map.get_at(-1), Ok((&"c", &3)));
        assert_eq!(map.get_at(-3), Ok((&"a", &1)));
    }

    #[test]
    fn get_at_out_of_range_is_an_error() {
        let map = abc();
        assert_eq!(
            map.get_at(3),
            Err(Error::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(
            map.get_at(-4),
            Err(Error::IndexOutOfRange { index: -4, len: 3 })
        );
    }

    #[test]
    fn get_missing_key_is_an_error() {
        let mut map = abc();
        assert_eq!(map.get("d"), Err(Error::KeyNotFound));
        assert!(map.get_mut("d").unwrap_err().is_not_found());
    }

    #[test]
    fn get_at_mut_updates_value_in_place() {
        let mut map = abc();
        *map.get_at_mut(-2).unwrap().1 += 40;
        assert_eq!(map["b"], 42);
    }

    #[test]
    fn removal_scenario() {
        let mut map = OrderedMap::new();
        map.set("one", 1);
        map.set("two", 2);
        map.set("three", 3);
        assert_eq!(map.keys(), ["one", "two", "three"]);

        assert!(!map.remove("four"));
        assert_eq!(map.keys(), ["one", "two", "three"]);

        assert!(map.remove("three"));
        assert_eq!(map.keys(), ["one", "two"]);

        assert!(map.remove_at(0));
        assert_eq!(map.keys(), ["two"]);
        assert_eq!(map.store().len(), 1);
        assert_eq!(map.store().get("two"), Some(&2));
        map.check_invariants().unwrap();
    }

    #[test]
    fn remove_at_negative_and_out_of_range() {
        let mut map = abc();
        assert!(map.remove_at(-1));
        assert_eq!(map.keys(), ["a", "b"]);

        assert!(!map.remove_at(2));
        assert!(!map.remove_at(-3));
        assert_eq!(map.len(), 2);

        assert_eq!(map.remove_entry_at(-2), Some(("a", 1)));
        assert_eq!(map.remove_entry("b"), Some(("b", 2)));
        assert!(map.is_empty());
    }

    #[test]
    fn clear_resets_both_structures() {
        let mut map = abc();
        map.set_at(1, "x", 9).unwrap();
        map.remove("a");
        map.clear();

        assert!(map.keys().is_empty());
        assert_eq!(map.store().len(), 0);
        assert!(map.get_at(0).unwrap_err().is_out_of_range());
    }

    #[test]
    fn from_pairs_keeps_first_position_and_last_value() {
        let map: OrderedMap<&str, i32> = OrderedMap::from_pairs([("a", 1), ("b", 2), ("a", 3)]);
        assert_eq!(map.keys(), ["a", "b"]);
        assert_eq!(map["a"], 3);
        assert_eq!(map.len(), 2);
        map.check_invariants().unwrap();
    }

    #[test]
    fn from_store_adopts_store_order() {
        let mut plain = HashMap::new();
        plain.insert("x", 1);
        plain.insert("y", 2);
        plain.insert("z", 3);
        let expected: Vec<_> = plain.keys().copied().collect();

        let map = OrderedMap::from_store(plain.clone());
        assert_eq!(map.keys(), expected);
        assert!(map.store_eq(&plain));
        map.check_invariants().unwrap();
    }

    #[test]
    fn clone_does_not_alias() {
        let original = abc();
        let mut copy = original.clone();
        copy.set("d", 4);
        copy.reverse();
        *copy.get_mut("a").unwrap() = 100;

        assert_eq!(original.keys(), ["a", "b", "c"]);
        assert_eq!(original["a"], 1);
        assert_eq!(copy.keys(), ["d", "c", "b", "a"]);
    }

    #[test]
    fn values_follow_order_and_restart() {
        let mut map = abc();
        map.set_at(0, "c", 3).unwrap();

        let values: Vec<_> = map.values().copied().collect();
        assert_eq!(values, [3, 1, 2]);
        assert_eq!(map.values().rev().copied().collect::<Vec<_>>(), [2, 1, 3]);
        assert_eq!(map.values().len(), 3);
        assert_eq!(map.values().copied().collect::<Vec<_>>(), values);
    }

    #[test]
    fn pairs_and_owned_iteration_follow_order() {
        let mut map = abc();
        map.sort_by(|a, b| b.cmp(a));

        let pairs: Vec<_> = map.pairs().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(pairs, [("c", 3), ("b", 2), ("a", 1)]);
        assert_eq!(map.to_pairs(), pairs);
        assert_eq!(map.into_iter().collect::<Vec<_>>(), pairs);
    }

    #[test]
    fn sorting_permutes_only_the_order() {
        let mut map: OrderedMap<String, usize> = ["pear", "fig", "apple"]
            .into_iter()
            .enumerate()
            .map(|(i, k)| (k.to_string(), i))
            .collect();

        map.sort_keys();
        assert_eq!(map.keys(), ["apple", "fig", "pear"]);

        map.sort_by_key(|k| k.len());
        assert_eq!(map.keys(), ["fig", "pear", "apple"]);
        assert_eq!(map["apple"], 2);

        map.swap(0, -1).unwrap();
        assert_eq!(map.keys(), ["apple", "pear", "fig"]);
        assert!(map.swap(0, 3).unwrap_err().is_out_of_range());
        map.check_invariants().unwrap();
    }

    #[test]
    fn equality_is_order_sensitive_but_store_eq_is_not() {
        let forward = abc();
        let mut backward = abc();
        backward.reverse();

        assert_ne!(forward, backward);
        assert!(forward.store_eq(backward.store()));

        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn std_hash_map_as_store() {
        let mut map: OrderedMap<String, i32, HashMap<String, i32>> = OrderedMap::default();
        map.set("b".to_string(), 2);
        map.set_at(0, "a".to_string(), 1).unwrap();
        assert_eq!(map.keys(), ["a", "b"]);
        assert!(map.remove("b"));
        assert_eq!(map.get("a"), Ok(&1));
    }

    #[test]
    fn fixed_hasher_is_kept() {
        let map: OrderedMap<u32, u32, RawStore<u32, u32, RandomState<1, 3>>> =
            OrderedMap::with_capacity_and_hasher(8, RandomState::with_keys(4, 2));
        assert_eq!(map.hasher().keys(), (4, 2));
        assert!(map.is_empty());
    }

    #[test]
    fn debug_prints_in_order() {
        let mut map = abc();
        map.reverse();
        assert_eq!(format!("{map:?}"), r#"{"c": 3, "b": 2, "a": 1}"#);
    }
}
