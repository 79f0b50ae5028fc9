//! An insertion-ordered hash map with positional access.
//!
//! [`OrderedMap`] keeps a [`KeyOrder`](order::KeyOrder) alongside a key→value
//! [`MapStore`](store::MapStore). Keys iterate in the order they were first inserted unless moved
//! with [`OrderedMap::set_at`] or permuted with the sorting methods, and every entry can also be
//! reached by position, with negative positions counting from the end.
//!
//! ```
//! use ordmap::OrderedMap;
//!
//! let mut map = OrderedMap::new();
//! map.set("one", 1);
//! map.set("two", 2);
//! map.set_at(0, "zero", 0).unwrap();
//!
//! assert_eq!(map.keys(), ["zero", "one", "two"]);
//! assert_eq!(map.get_at(-1).unwrap(), (&"two", &2));
//! assert!(map.remove_at(1));
//! assert_eq!(map.keys(), ["zero", "two"]);
//! ```
//!
//! The map does no locking; share it between threads behind a single lock.

mod error;
pub mod hasher;
pub mod map;
pub mod order;
mod rand;
pub mod store;

pub use error::{Error, Result};
pub use map::OrderedMap;
