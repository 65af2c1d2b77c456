//! A thread-safe bidirectional multimap.
//!
//! Keys map to many values and values map to many keys; either side can be looked up directly.
//! [`BiMultiMap`] keeps both directions behind one lock so they never disagree, and
//! [`BiMultiIndex`] is the same structure without the lock, for single-threaded use.
//!
//! ```
//! use bimultimap::BiMultiMap;
//!
//! let subscriptions = BiMultiMap::new();
//! subscriptions.add("alice", "tech");
//! subscriptions.add("alice", "math");
//! subscriptions.add("bob", "tech");
//!
//! let mut readers = subscriptions.lookup_value(&"tech");
//! readers.sort();
//! assert_eq!(readers, ["alice", "bob"]);
//!
//! subscriptions.delete_key(&"alice");
//! assert_eq!(subscriptions.lookup_value(&"tech"), ["bob"]);
//! assert!(!subscriptions.value_exists(&"math"));
//! ```

pub mod bimultimap;
pub mod collections;

pub use crate::bimultimap::BiMultiMap;
pub use crate::collections::BiMultiIndex;
