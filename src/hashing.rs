//! This module provides a deterministic `HashMap` and `HashSet`. The hashing data structures in
//! the standard library are not deterministic:
//!
//! > By default, HashMap uses a hashing algorithm selected to provide
//! > resistance against HashDoS attacks. The algorithm is randomly seeded, and a
//! > reasonable best-effort is made to generate this seed from a high quality,
//! > secure source of randomness provided by the host without blocking the program.
//!
//! Two runs with the same parameters should log and apply scheduled changes in the same order,
//! so the crate uses the `rustc-hash` hasher throughout. `HashMap<K, V, S>` has no `new` method
//! for a custom hasher; bring `HashMapExt` (or `HashSetExt`) into scope to get one.

use std::hash::Hash;

pub use rustc_hash::{FxBuildHasher, FxHashMap as HashMap, FxHashSet as HashSet};

pub trait HashMapExt {
    fn new() -> Self;
    fn with_capacity(capacity: usize) -> Self;
}

impl<K: Hash + Eq, V> HashMapExt for HashMap<K, V> {
    fn new() -> Self {
        HashMap::default()
    }

    fn with_capacity(capacity: usize) -> Self {
        HashMap::with_capacity_and_hasher(capacity, FxBuildHasher)
    }
}

pub trait HashSetExt {
    fn new() -> Self;
    fn with_capacity(capacity: usize) -> Self;
}

impl<T: Hash + Eq> HashSetExt for HashSet<T> {
    fn new() -> Self {
        HashSet::default()
    }

    fn with_capacity(capacity: usize) -> Self {
        HashSet::with_capacity_and_hasher(capacity, FxBuildHasher)
    }
}
