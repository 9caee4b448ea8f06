use std::num::NonZeroUsize;

use alloy_primitives::B256;
use lru::LruCache;
use ream_consensus_misc::attestation::Attestation;

/// Remembers the fingerprints of recently accepted attestations.
#[derive(Debug)]
pub struct DedupCache {
    seen_attestations: LruCache<B256, ()>,
}

impl DedupCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            seen_attestations: LruCache::new(capacity),
        }
    }

    /// Returns true the first time some attestation content is seen. A repeat refreshes the
    /// entry's recency and returns false.
    pub fn accept(&mut self, attestation: &Attestation) -> bool {
        if self.touch(attestation) {
            return false;
        }

        self.remember(attestation);
        true
    }

    /// Refreshes the recency of a known attestation. Returns false if it was never remembered.
    pub fn touch(&mut self, attestation: &Attestation) -> bool {
        self.seen_attestations
            .get(&attestation.fingerprint())
            .is_some()
    }

    pub fn remember(&mut self, attestation: &Attestation) {
        self.seen_attestations.put(attestation.fingerprint(), ());
    }

    pub fn forget(&mut self, attestation: &Attestation) {
        self.seen_attestations.pop(&attestation.fingerprint());
    }

    /// Checks membership without touching recency.
    pub fn contains(&self, attestation: &Attestation) -> bool {
        self.seen_attestations.contains(&attestation.fingerprint())
    }

    pub fn len(&self) -> usize {
        self.seen_attestations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen_attestations.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.seen_attestations.cap().get()
    }
}
