//! Caller-owned memoization for expensive planning results.
//!
//! The engines never hold hidden state; a caller that wants to reuse results
//! passes a [`ResultCache`] explicitly and keys it with [`stable_key`].

use serde::Serialize;
use std::collections::HashMap;

/// Minimal get/set/clear cache interface.
pub trait ResultCache<V> {
    fn get(&self, key: &str) -> Option<V>;
    fn set(&mut self, key: String, value: V);
    /// Drop every entry, returning how many were removed.
    fn clear(&mut self) -> usize;
}

/// Unbounded in-memory cache backed by a `HashMap`.
#[derive(Debug, Clone)]
pub struct MemoryCache<V> {
    entries: HashMap<String, V>,
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V> MemoryCache<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> ResultCache<V> for MemoryCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: String, value: V) {
        self.entries.insert(key, value);
    }

    fn clear(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        n
    }
}

/// Deterministic key for `value` under `namespace`: `"<namespace>:<blake3 hex>"`.
///
/// The value is hashed through its JSON encoding, so callers must normalize
/// ordering (sort lists, use ordered maps) before hashing.
///
/// # Errors
///
/// Returns the serialization error if `value` cannot be encoded as JSON.
pub fn stable_key<T: Serialize + ?Sized>(
    namespace: &str,
    value: &T,
) -> Result<String, serde_json::Error> {
    let bytes = serde_json::to_vec(value)?;
    let mut hasher = blake3::Hasher::new();
    hasher.update(namespace.as_bytes());
    hasher.update(b"\0");
    hasher.update(&bytes);
    Ok(format!("{namespace}:{}", hasher.finalize().to_hex()))
}
