//! Fast hash map and hash set type aliases.
//!
//! Student identifiers and group ids are short keys, which is the case the
//! Fx hash algorithm from `rustc-hash` is tuned for. None of these maps are
//! keyed by untrusted input from the network, so the lack of
//! denial-of-service resistance does not matter here.
//!
//! # Examples
//!
//! ```
//! use cv_core::{FxHashMap, FxHashSet, fx_hash_map, fx_hash_set};
//!
//! let mut by_sid: FxHashMap<String, usize> = FxHashMap::default();
//! by_sid.insert("11667051".to_owned(), 0);
//!
//! let map: FxHashMap<&str, i32> = fx_hash_map();
//! let set: FxHashSet<&str> = fx_hash_set();
//! assert!(map.is_empty() && set.is_empty());
//! ```

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// A [`HashSet`](std::collections::HashSet) using the Fx hash algorithm.
pub type FxHashSet<V> = rustc_hash::FxHashSet<V>;

/// Creates a new empty [`FxHashMap`].
#[inline]
#[must_use]
pub fn fx_hash_map<K, V>() -> FxHashMap<K, V> {
    FxHashMap::default()
}

/// Creates a new empty [`FxHashSet`].
#[inline]
#[must_use]
pub fn fx_hash_set<V>() -> FxHashSet<V> {
    FxHashSet::default()
}
