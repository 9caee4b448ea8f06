use std::collections::VecDeque;

use ream_consensus_misc::{attestation::Attestation, constants::beacon::GENESIS_EPOCH};
use ream_metrics::{CHURN_QUEUE_EPOCH_BOUNDARY, CHURN_QUEUE_SIZE, set_int_gauge_vec};
use tracing::{debug, trace};

#[derive(Debug)]
struct Bucket {
    epoch: u64,
    attestations: VecDeque<Attestation>,
}

impl Bucket {
    fn new(epoch: u64) -> Self {
        Self {
            epoch,
            attestations: VecDeque::new(),
        }
    }
}

/// Attestations bucketed by target epoch, retained only while their target falls inside the
/// `[lower_epoch, upper_epoch]` window.
///
/// Buckets are kept sorted by epoch so that sliding the window only ever pops from the ends, and
/// so that eviction can always start from the oldest target. Within a bucket attestations stay in
/// arrival order.
#[derive(Debug)]
pub struct ChurnQueue {
    buckets: VecDeque<Bucket>,
    lower_epoch: u64,
    upper_epoch: u64,
    size: usize,
    max_size: usize,
}

impl ChurnQueue {
    pub fn new(max_size: usize) -> Self {
        Self {
            buckets: VecDeque::new(),
            lower_epoch: GENESIS_EPOCH,
            upper_epoch: GENESIS_EPOCH,
            size: 0,
            max_size,
        }
    }

    /// Queues every attestation whose target is inside the window and returns how many were
    /// taken. Eviction runs once the whole batch is in.
    pub fn add(&mut self, attestations: impl IntoIterator<Item = Attestation>) -> usize {
        let mut retained = 0;
        for attestation in attestations {
            let epoch = attestation.data.target.epoch;
            if epoch < self.lower_epoch || epoch > self.upper_epoch {
                trace!(
                    "Dropping attestation with target epoch {epoch} outside window [{}, {}]",
                    self.lower_epoch, self.upper_epoch
                );
                continue;
            }

            let index = self.buckets.partition_point(|bucket| bucket.epoch < epoch);
            if self
                .buckets
                .get(index)
                .is_none_or(|bucket| bucket.epoch != epoch)
            {
                self.buckets.insert(index, Bucket::new(epoch));
            }
            if let Some(bucket) = self.buckets.get_mut(index) {
                bucket.attestations.push_back(attestation);
                self.size += 1;
                retained += 1;
            }
        }

        self.purge();
        self.record_metrics();
        retained
    }

    /// Evicts from the oldest bucket, in arrival order, until the queue fits `max_size`.
    /// Returns the number of evicted attestations.
    pub fn purge(&mut self) -> usize {
        let mut evicted = 0;
        while self.size > self.max_size {
            let Some(bucket) = self.buckets.front_mut() else {
                break;
            };
            if bucket.attestations.pop_front().is_some() {
                self.size -= 1;
                evicted += 1;
            }
            if bucket.attestations.is_empty() {
                self.buckets.pop_front();
            }
        }

        if evicted > 0 {
            debug!(
                "Evicted {evicted} attestations from churn queue, max size is {}",
                self.max_size
            );
        }
        evicted
    }

    /// Moves the window forward. The update is applied only when neither bound moves back and
    /// at least one of them advances; returns whether it was applied.
    pub fn update_epoch_boundaries(&mut self, new_lower: u64, new_upper: u64) -> bool {
        debug_assert!(
            new_lower <= new_upper,
            "lower epoch {new_lower} is above upper epoch {new_upper}"
        );
        if new_lower > new_upper {
            return false;
        }

        let grows = new_lower >= self.lower_epoch
            && new_upper >= self.upper_epoch
            && (new_lower > self.lower_epoch || new_upper > self.upper_epoch);
        if !grows {
            trace!(
                "Keeping churn window [{}, {}], refused [{new_lower}, {new_upper}]",
                self.lower_epoch, self.upper_epoch
            );
            return false;
        }

        self.lower_epoch = new_lower;
        self.upper_epoch = new_upper;

        while self
            .buckets
            .front()
            .is_some_and(|bucket| bucket.epoch < new_lower)
        {
            if let Some(bucket) = self.buckets.pop_front() {
                self.size -= bucket.attestations.len();
            }
        }
        while self
            .buckets
            .back()
            .is_some_and(|bucket| bucket.epoch > new_upper)
        {
            if let Some(bucket) = self.buckets.pop_back() {
                self.size -= bucket.attestations.len();
            }
        }

        debug!("Churn window moved to [{new_lower}, {new_upper}], {} retained", self.size);
        self.record_metrics();
        true
    }

    /// Retained attestations by ascending target epoch, then arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &Attestation> {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.attestations.iter())
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn lower_epoch(&self) -> u64 {
        self.lower_epoch
    }

    pub fn upper_epoch(&self) -> u64 {
        self.upper_epoch
    }

    pub fn bucket_epochs(&self) -> Vec<u64> {
        self.buckets.iter().map(|bucket| bucket.epoch).collect()
    }

    fn record_metrics(&self) {
        set_int_gauge_vec(&CHURN_QUEUE_SIZE, self.size as i64, &[]);
        set_int_gauge_vec(&CHURN_QUEUE_EPOCH_BOUNDARY, self.lower_epoch as i64, &["lower"]);
        set_int_gauge_vec(&CHURN_QUEUE_EPOCH_BOUNDARY, self.upper_epoch as i64, &["upper"]);
    }
}
