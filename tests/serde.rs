use std::collections::HashMap;
use std::marker::PhantomData;

use ordmap::map::de::{SeededPair, WithStore};
use ordmap::OrderedMap;
use serde::de::value::SeqDeserializer;
use serde::de::DeserializeSeed;
use serde_json::{json, Value};
use serde_derive::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Manifest {
    name: String,
    targets: OrderedMap<String, u32>,
}

#[test]
fn serializes_in_map_order() {
    let mut map: OrderedMap<String, i32> = OrderedMap::new();
    map.set("zeta".to_string(), 1);
    map.set("alpha".to_string(), 2);
    map.set_at(0, "mid".to_string(), 3).unwrap();

    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, r#"{"mid":3,"zeta":1,"alpha":2}"#);
}

#[test]
fn deserializes_in_document_order() {
    let map: OrderedMap<String, i32> =
        serde_json::from_str(r#"{"c": 3, "a": 1, "b": 2}"#).unwrap();

    assert_eq!(map.keys(), ["c", "a", "b"]);
    assert_eq!(map["a"], 1);
    map.check_invariants().unwrap();
}

#[test]
fn repeated_keys_keep_first_position_and_last_value() {
    let map: OrderedMap<String, i32> =
        serde_json::from_str(r#"{"x": 1, "y": 2, "x": 3}"#).unwrap();

    assert_eq!(map.keys(), ["x", "y"]);
    assert_eq!(map["x"], 3);
}

#[test]
fn nested_round_trip() {
    let manifest = Manifest {
        name: "demo".to_string(),
        targets: OrderedMap::from([
            ("lib".to_string(), 2),
            ("bin".to_string(), 1),
            ("test".to_string(), 3),
        ]),
    };

    let json = serde_json::to_string(&manifest).unwrap();
    let back: Manifest = serde_json::from_str(&json).unwrap();

    assert_eq!(back, manifest);
    assert_eq!(back.targets.keys(), ["lib", "bin", "test"]);
}

#[test]
fn seeded_into_std_hash_map() {
    let store = HashMap::<String, bool>::new();
    let seed = WithStore::<PhantomData<String>, PhantomData<bool>, _>::new(store);
    let mut de = serde_json::Deserializer::from_str(r#"{"on": true, "off": false}"#);

    let map = seed.deserialize(&mut de).unwrap();
    assert_eq!(map.keys(), ["on", "off"]);
    assert_eq!(map.get("off"), Ok(&false));
}

#[test]
fn seeded_pair_reads_two_element_arrays() {
    let mut de = serde_json::Deserializer::from_str(r#"["key", 7]"#);
    let pair = SeededPair(PhantomData::<String>, PhantomData::<u8>)
        .deserialize(&mut de)
        .unwrap();
    assert_eq!(pair, ("key".to_string(), 7));

    let mut de = serde_json::Deserializer::from_str(r#"["key", 7, 8]"#);
    assert!(SeededPair(PhantomData::<String>, PhantomData::<u8>)
        .deserialize(&mut de)
        .is_err());
}

fn pairs(items: Vec<Value>) -> SeqDeserializer<std::vec::IntoIter<Value>, serde_json::Error> {
    SeqDeserializer::new(items.into_iter())
}

#[test]
fn reads_a_sequence_of_pairs() {
    let de = pairs(vec![json!(["b", 2]), json!(["a", 1]), json!(["b", 3])]);
    let map = <OrderedMap<String, i32> as serde::Deserialize>::deserialize(de).unwrap();

    assert_eq!(map.keys(), ["b", "a"]);
    assert_eq!(map["b"], 3);
    assert_eq!(map["a"], 1);
    map.check_invariants().unwrap();
}

#[test]
fn sequence_entries_must_be_pairs() {
    let de = pairs(vec![json!(["a", 1]), json!(["b", 2, 3])]);
    assert!(<OrderedMap<String, i32> as serde::Deserialize>::deserialize(de).is_err());

    let de = pairs(vec![json!(["a"])]);
    assert!(<OrderedMap<String, i32> as serde::Deserialize>::deserialize(de).is_err());
}

#[test]
fn rejects_non_map_input() {
    assert!(serde_json::from_str::<OrderedMap<String, i32>>("[1, 2]").is_err());
}
