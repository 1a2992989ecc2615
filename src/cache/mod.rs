//! Process-wide memo of pairwise verification verdicts.
//!
//! Keys are the BLAKE3 hash of the normalized (client, vendor) pair (see
//! [`hash_pair`]). Only real verdicts are stored; an unavailable verification is
//! never cached so a later call can retry it.


use std::sync::Arc;

use moka::sync::Cache;

use crate::hashing::hash_pair;
use crate::scoring::VerificationVerdict;

/// In-memory verdict cache (bounded, LRU-style eviction).
pub struct VerdictCache {
    entries: Cache<[u8; 32], Arc<VerificationVerdict>>,
}

impl VerdictCache {
    pub const DEFAULT_CAPACITY: u64 = 10_000;

    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    #[inline]
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(capacity).build(),
        }
    }

    /// Looks up the verdict for a pair.
    #[inline]
    pub fn get(&self, client_text: &str, vendor_text: &str) -> Option<Arc<VerificationVerdict>> {
        self.get_by_key(&hash_pair(client_text, vendor_text))
    }

    #[inline]
    pub fn get_by_key(&self, key: &[u8; 32]) -> Option<Arc<VerificationVerdict>> {
        self.entries.get(key)
    }

    /// Stores a verdict and returns its key.
    #[inline]
    pub fn insert(
        &self,
        client_text: &str,
        vendor_text: &str,
        verdict: VerificationVerdict,
    ) -> [u8; 32] {
        let key = hash_pair(client_text, vendor_text);
        self.insert_by_key(key, Arc::new(verdict));
        key
    }

    #[inline]
    pub fn insert_by_key(&self, key: [u8; 32], verdict: Arc<VerificationVerdict>) {
        self.entries.insert(key, verdict);
    }

    #[inline]
    pub fn contains(&self, client_text: &str, vendor_text: &str) -> bool {
        self.entries
            .contains_key(&hash_pair(client_text, vendor_text))
    }

    /// Approximate number of entries (moka updates counts lazily).
    #[inline]
    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.entry_count() == 0
    }

    #[inline]
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Runs pending maintenance so `len` reflects recent writes.
    #[inline]
    pub fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks();
    }
}

impl Default for VerdictCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VerdictCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerdictCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

#[derive(Clone, Debug, Default)]
/// Shared handle to a [`VerdictCache`].
pub struct VerdictCacheHandle {
    inner: Arc<VerdictCache>,
}

impl VerdictCacheHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            inner: Arc::new(VerdictCache::with_capacity(capacity)),
        }
    }
}

impl std::ops::Deref for VerdictCacheHandle {
    type Target = VerdictCache;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
