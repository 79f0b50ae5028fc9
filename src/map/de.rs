//! Seeded deserialization of [`OrderedMap`](super::OrderedMap).
//!
//! Input is requested as a map. Formats that hand maps over as a sequence of `[key, value]`
//! pairs are accepted too. Entries are applied in input order with
//! [`OrderedMap::set`](super::OrderedMap::set), so a repeated key keeps its first position and
//! its last value.

use serde::de::{DeserializeSeed, Error, IgnoredAny, MapAccess, SeqAccess, Visitor};

use core::marker::PhantomData;
use std::hash::Hash;

use crate::store::MapStore;

/// Deserializes into a caller-supplied store, with optional seeds for keys and values.
#[derive(Clone)]
pub struct WithStore<K, V, M>(K, V, M);

impl<'de, K: DeserializeSeed<'de> + Clone, V: DeserializeSeed<'de> + Clone, M> DeserializeSeed<'de>
    for WithStore<K, V, M>
where
    K::Value: Hash + Eq + Clone,
    M: MapStore<K::Value, V::Value>,
{
    type Value = super::OrderedMap<K::Value, V::Value, M>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(WithStoreVisitor(self.0, self.1, self.2))
    }
}

impl<K, V, M> WithStore<PhantomData<K>, PhantomData<V>, M> {
    pub const fn new(store: M) -> Self {
        Self(PhantomData, PhantomData, store)
    }
}

impl<K, V, M> WithStore<K, V, M> {
    pub const fn new_seeded(key_seed: K, val_seed: V, store: M) -> Self {
        Self(key_seed, val_seed, store)
    }
}

struct WithStoreVisitor<K, V, M>(K, V, M);

impl<'de, K: DeserializeSeed<'de> + Clone, V: DeserializeSeed<'de> + Clone, M> Visitor<'de>
    for WithStoreVisitor<K, V, M>
where
    K::Value: Hash + Eq + Clone,
    M: MapStore<K::Value, V::Value>,
{
    type Value = super::OrderedMap<K::Value, V::Value, M>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a map or a sequence of key-value pairs")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut ret = super::OrderedMap::from_store(self.2);
        ret.reserve(map.size_hint().unwrap_or(0));

        while let Some((key, val)) = map.next_entry_seed(self.0.clone(), self.1.clone())? {
            ret.set(key, val);
        }
        Ok(ret)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut ret = super::OrderedMap::from_store(self.2);
        ret.reserve(seq.size_hint().unwrap_or(0));

        while let Some((key, val)) =
            seq.next_element_seed(SeededPair(self.0.clone(), self.1.clone()))?
        {
            ret.set(key, val);
        }
        Ok(ret)
    }
}

/// A `(A, B)` tuple read through two seeds.
pub struct SeededPair<A, B>(pub A, pub B);

struct SeededPairVisitor<A, B>(A, B);

impl<'de, A: DeserializeSeed<'de>, B: DeserializeSeed<'de>> Visitor<'de>
    for SeededPairVisitor<A, B>
{
    type Value = (A::Value, B::Value);

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a tuple of length 2")
    }

    fn visit_seq<I>(self, mut seq: I) -> Result<Self::Value, I::Error>
    where
        I: SeqAccess<'de>,
    {
        let key = seq
            .next_element_seed(self.0)?
            .ok_or_else(|| I::Error::invalid_length(0, &"a tuple of length 2"))?;
        let val = seq
            .next_element_seed(self.1)?
            .ok_or_else(|| I::Error::invalid_length(1, &"a tuple of length 2"))?;
        let mut len = 2;
        while let Some(IgnoredAny) = seq.next_element()? {
            len += 1;
        }

        if len != 2 {
            Err(I::Error::invalid_length(len, &"a tuple of length 2"))
        } else {
            Ok((key, val))
        }
    }
}

impl<'de, A: DeserializeSeed<'de>, B: DeserializeSeed<'de>> DeserializeSeed<'de>
    for SeededPair<A, B>
{
    type Value = (A::Value, B::Value);

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_tuple(2, SeededPairVisitor(self.0, self.1))
    }
}
