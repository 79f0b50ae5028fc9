//! Key→value storage backing an [`OrderedMap`](crate::OrderedMap).
//!
//! The map never relies on a store's own iteration order except once, when adopting a
//! pre-filled store through [`OrderedMap::from_store`](crate::OrderedMap::from_store).

use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use std::collections::{hash_map, HashMap};

mod raw;

pub use raw::{IntoIter, Iter, Keys, RawStore};

/// A key→value store usable as the backing storage of an ordered map.
///
/// Implementations must behave as a plain map: `insert` on an existing key replaces the value
/// without adding an entry, `keys` yields each key exactly once.
pub trait MapStore<K, V> {
    type Keys<'a>: Iterator<Item = &'a K>
    where
        Self: 'a,
        K: 'a;

    fn get<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>;

    fn get_mut<Q: Hash + Eq + ?Sized>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>;

    fn contains_key<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        self.get(key).is_some()
    }

    /// Returns the value previously stored under `key`, if any.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    fn remove<Q: Hash + Eq + ?Sized>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);

    fn reserve(&mut self, additional: usize);

    /// Every key once, in the store's own order.
    fn keys(&self) -> Self::Keys<'_>;
}

impl<K: Hash + Eq, V, S: BuildHasher> MapStore<K, V> for RawStore<K, V, S> {
    type Keys<'a> = Keys<'a, K, V> where Self: 'a, K: 'a;

    fn get<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
    {
        RawStore::get(self, key)
    }

    fn get_mut<Q: Hash + Eq + ?Sized>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
    {
        RawStore::get_mut(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        RawStore::insert(self, key, value)
    }

    fn remove<Q: Hash + Eq + ?Sized>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
    {
        RawStore::remove(self, key)
    }

    fn len(&self) -> usize {
        RawStore::len(self)
    }

    fn clear(&mut self) {
        RawStore::clear(self)
    }

    fn reserve(&mut self, additional: usize) {
        RawStore::reserve(self, additional)
    }

    fn keys(&self) -> Self::Keys<'_> {
        Keys::new(self.iter())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> MapStore<K, V> for HashMap<K, V, S> {
    type Keys<'a> = hash_map::Keys<'a, K, V> where Self: 'a, K: 'a;

    fn get<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
    {
        HashMap::get(self, key)
    }

    fn get_mut<Q: Hash + Eq + ?Sized>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
    {
        HashMap::get_mut(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        HashMap::insert(self, key, value)
    }

    fn remove<Q: Hash + Eq + ?Sized>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
    {
        HashMap::remove(self, key)
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn clear(&mut self) {
        HashMap::clear(self)
    }

    fn reserve(&mut self, additional: usize) {
        HashMap::reserve(self, additional)
    }

    fn keys(&self) -> Self::Keys<'_> {
        HashMap::keys(self)
    }
}
