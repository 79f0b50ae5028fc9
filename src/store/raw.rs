use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash, Hasher};
use core::iter::FusedIterator;
use core::marker::PhantomData;

use hashbrown::raw::{RawIntoIter, RawIter, RawTable};

use crate::hasher::DefaultHashBuilder;

/// Hash table of `(K, V)` pairs keyed through `S`.
///
/// Iteration order is whatever the table layout gives; [`OrderedMap`](crate::OrderedMap) keeps
/// its own order on top of this.
#[derive(Clone)]
pub struct RawStore<K, V, S = DefaultHashBuilder> {
    table: RawTable<(K, V)>,
    hasher: S,
}

impl<K: core::fmt::Debug, V: core::fmt::Debug, S> core::fmt::Debug for RawStore<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S: Default> Default for RawStore<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V> RawStore<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::new())
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self::with_capacity_and_hasher(cap, DefaultHashBuilder::new())
    }
}

impl<K, V, S> RawStore<K, V, S> {
    pub const fn with_hasher(hasher: S) -> Self {
        Self {
            table: RawTable::new(),
            hasher,
        }
    }

    pub fn with_capacity_and_hasher(cap: usize, hasher: S) -> Self {
        Self {
            table: RawTable::with_capacity(cap),
            hasher,
        }
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn clear(&mut self) {
        self.table.clear()
    }

    /// Entries in table order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        // SAFETY: `Iter` borrows `self`, so the table outlives the iterator and cannot be resized
        Iter(unsafe { self.table.iter() }, PhantomData)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> RawStore<K, V, S> {
    fn hash_key<Q: Hash + ?Sized>(hasher: &S, key: &Q) -> u64 {
        let mut hasher = hasher.build_hasher();
        key.hash(&mut hasher);
        hasher.finish()
    }

    fn key_eq<Q: Eq + ?Sized>(key: &Q) -> impl FnMut(&(K, V)) -> bool + '_
    where
        K: Borrow<Q>,
    {
        move |(k, _): &(K, V)| <K as Borrow<Q>>::borrow(k) == key
    }

    pub fn reserve(&mut self, additional: usize) {
        let hasher = &self.hasher;

        self.table
            .reserve(additional, |(key, _)| Self::hash_key(hasher, key));
    }

    pub fn contains_key<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        self.get(key).is_some()
    }

    pub fn get<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
    {
        let hash = Self::hash_key(&self.hasher, key);
        self.table.get(hash, Self::key_eq(key)).map(|(_, v)| v)
    }

    pub fn get_mut<Q: Hash + Eq + ?Sized>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
    {
        let hash = Self::hash_key(&self.hasher, key);
        self.table.get_mut(hash, Self::key_eq(key)).map(|(_, v)| v)
    }

    /// Inserts `value` under `key`, returning the value it replaced.
    ///
    /// An existing entry keeps its original key.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hasher = &self.hasher;
        let table = &mut self.table;
        let hash = Self::hash_key(hasher, &key);

        match table.find_or_find_insert_slot(
            hash,
            |(k, _)| *k == key,
            |(k, _)| Self::hash_key(hasher, k),
        ) {
            Ok(bucket) => {
                // SAFETY: `bucket` was just found in `table`, which has not been mutated since
                let (_, slot) = unsafe { bucket.as_mut() };

                Some(core::mem::replace(slot, value))
            }
            Err(slot) => {
                // SAFETY: We just got this `slot` and we haven't mutated `table` since getting it
                unsafe {
                    table.insert_in_slot(hash, slot, (key, value));
                }

                None
            }
        }
    }

    pub fn remove<Q: Hash + Eq + ?Sized>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry<Q: Hash + Eq + ?Sized>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
    {
        let hash = Self::hash_key(&self.hasher, key);
        self.table.remove_entry(hash, Self::key_eq(key))
    }
}

/// Order-insensitive: equal when both hold the same keys with equal values.
impl<K: Hash + Eq, V: PartialEq, S: BuildHasher> PartialEq for RawStore<K, V, S> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).map_or(false, |theirs| v == theirs))
    }
}

impl<K: Hash + Eq, V: Eq, S: BuildHasher> Eq for RawStore<K, V, S> {}

impl<K: Hash + Eq, V, S: BuildHasher + Default> FromIterator<(K, V)> for RawStore<K, V, S> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let mut store = Self::with_capacity_and_hasher(iter.size_hint().0, S::default());

        for (k, v) in iter {
            store.insert(k, v);
        }

        store
    }
}

impl<K, V, S> IntoIterator for RawStore<K, V, S> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self.table.into_iter())
    }
}

impl<'a, K, V, S> IntoIterator for &'a RawStore<K, V, S> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct IntoIter<K, V>(RawIntoIter<(K, V)>);

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

pub struct Iter<'a, K, V>(RawIter<(K, V)>, PhantomData<&'a (K, V)>);

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        // SAFETY: the bucket belongs to a table borrowed for `'a`
        self.0.next().map(|bucket| {
            let (k, v) = unsafe { bucket.as_ref() };
            (k, v)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}
impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

pub struct Keys<'a, K, V>(Iter<'a, K, V>);

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) fn new(iter: Iter<'a, K, V>) -> Self {
        Self(iter)
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V> ExactSizeIterator for Keys<'a, K, V> {}
impl<'a, K, V> FusedIterator for Keys<'a, K, V> {}
