use std::{collections::VecDeque, num::NonZeroUsize};

use alloy_primitives::B256;
use lru::LruCache;
use ream_consensus_misc::{
    attestation::Attestation, constants::beacon::GENESIS_EPOCH, misc::compute_epoch_at_slot,
};
use ream_metrics::{UNKNOWN_BLOCK_POOL_SIZE, set_int_gauge_vec};
use tracing::trace;

/// Previous and current epoch, on top of the lookahead.
const BASE_TRACKED_EPOCHS: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStatus {
    /// The voted block has been imported, the attestation may proceed.
    Known,
    /// Kept until its block is imported.
    Held,
    /// Block unknown and target epoch outside the tracked window.
    Untracked,
}

#[derive(Debug)]
struct HeldBucket {
    epoch: u64,
    attestations: VecDeque<Attestation>,
}

/// Parks attestations that vote for a block the node has not imported yet.
///
/// Held attestations are bucketed by target epoch over the window
/// `[baseline, baseline + 2 + lookahead)`, where the baseline trails the current epoch by one.
/// Importing a block releases every attestation voting for it. Moving the baseline drops the
/// buckets it passes, and the oldest attestations go first once `max_size` is exceeded.
#[derive(Debug)]
pub struct UnknownBlockPool {
    known_roots: LruCache<B256, ()>,
    buckets: VecDeque<HeldBucket>,
    baseline: Option<u64>,
    tracked_epochs: u64,
    size: usize,
    max_size: usize,
}

impl UnknownBlockPool {
    pub fn new(max_known_blocks: NonZeroUsize, max_size: usize, lookahead: u64) -> Self {
        Self {
            known_roots: LruCache::new(max_known_blocks),
            buckets: VecDeque::new(),
            baseline: None,
            tracked_epochs: BASE_TRACKED_EPOCHS + lookahead,
            size: 0,
            max_size,
        }
    }

    /// Returns `Known` when the voted block is known. Otherwise the attestation is held if its
    /// target epoch falls into the tracked window.
    pub fn check(&mut self, attestation: &Attestation) -> BlockStatus {
        let root = attestation.data.beacon_block_root;
        if self.known_roots.get(&root).is_some() {
            return BlockStatus::Known;
        }

        let epoch = attestation.data.target.epoch;
        let Some((lower, upper)) = self.window() else {
            return BlockStatus::Untracked;
        };
        if epoch < lower || epoch > upper {
            trace!("Not holding attestation for block {root} with target epoch {epoch}");
            return BlockStatus::Untracked;
        }

        let index = self.buckets.partition_point(|bucket| bucket.epoch < epoch);
        if self
            .buckets
            .get(index)
            .is_none_or(|bucket| bucket.epoch != epoch)
        {
            self.buckets.insert(
                index,
                HeldBucket {
                    epoch,
                    attestations: VecDeque::new(),
                },
            );
        }
        if let Some(bucket) = self.buckets.get_mut(index) {
            bucket.attestations.push_back(attestation.clone());
            self.size += 1;
        }

        self.purge();
        self.record_metrics();
        BlockStatus::Held
    }

    /// Marks `root` as imported and hands back every attestation held for it, oldest epoch first.
    pub fn on_imported_block(&mut self, root: B256) -> Vec<Attestation> {
        self.known_roots.put(root, ());

        let mut released = vec![];
        for bucket in &mut self.buckets {
            let (matching, rest): (VecDeque<_>, VecDeque<_>) = bucket
                .attestations
                .drain(..)
                .partition(|attestation| attestation.data.beacon_block_root == root);
            bucket.attestations = rest;
            released.extend(matching);
        }
        self.buckets.retain(|bucket| !bucket.attestations.is_empty());
        self.size -= released.len();

        if !released.is_empty() {
            self.record_metrics();
        }
        released
    }

    /// Moves the baseline to the epoch before the slot's epoch and drops buckets it passes.
    /// The baseline only moves forward. Returns the number of dropped attestations.
    pub fn feed_new_slot(&mut self, slot: u64) -> usize {
        let epoch = compute_epoch_at_slot(slot);
        let baseline = if epoch == GENESIS_EPOCH {
            epoch
        } else {
            epoch - 1
        };
        if self.baseline.is_some_and(|current| baseline <= current) {
            return 0;
        }
        self.baseline = Some(baseline);

        let mut evicted = 0;
        while self
            .buckets
            .front()
            .is_some_and(|bucket| bucket.epoch < baseline)
        {
            if let Some(bucket) = self.buckets.pop_front() {
                evicted += bucket.attestations.len();
            }
        }
        self.size -= evicted;

        if evicted > 0 {
            trace!("Dropped {evicted} attestations for blocks never imported");
        }
        self.record_metrics();
        evicted
    }

    fn purge(&mut self) {
        while self.size > self.max_size {
            let Some(bucket) = self.buckets.front_mut() else {
                break;
            };
            if bucket.attestations.pop_front().is_some() {
                self.size -= 1;
            }
            if bucket.attestations.is_empty() {
                self.buckets.pop_front();
            }
        }
    }

    /// Inclusive bounds of the tracked target epochs, once a slot has been seen.
    pub fn window(&self) -> Option<(u64, u64)> {
        self.baseline
            .map(|baseline| (baseline, baseline + self.tracked_epochs - 1))
    }

    pub fn is_known(&self, root: &B256) -> bool {
        self.known_roots.contains(root)
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    fn record_metrics(&self) {
        set_int_gauge_vec(&UNKNOWN_BLOCK_POOL_SIZE, self.size as i64, &[]);
    }
}
