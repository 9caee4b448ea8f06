use std::collections::HashMap;

use alloy_primitives::B256;
use ream_consensus_misc::{
    attestation::Attestation, attestation_data::AttestationData, beacon_state::BeaconTuple,
    checkpoint::Checkpoint, misc::compute_epoch_at_slot,
};
use ream_metrics::{COMPUTE_AGGREGATES_TIME, start_timer_vec, stop_timer};
use ssz_types::{BitList, typenum::U2048};
use tracing::{debug, info};
use tree_hash::TreeHash;

use crate::{
    aggregate::AttestationAggregate, churn_queue::ChurnQueue, validator::AttestationValidator,
};

/// Aggregates built on top of a given block, ready to be handed to a proposer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffChainAggregates {
    pub block_root: B256,
    pub slot: u64,
    pub aggregates: Vec<AttestationAggregate>,
}

impl OffChainAggregates {
    pub fn attestations(self) -> Vec<Attestation> {
        self.aggregates
            .into_iter()
            .map(AttestationAggregate::into_attestation)
            .collect()
    }
}

pub struct AggregationEngine<V> {
    queue: ChurnQueue,
    justified_checkpoint: Option<Checkpoint>,
    validator: V,
}

impl<V: AttestationValidator> AggregationEngine<V> {
    pub fn new(churn_queue_max_size: usize, validator: V) -> Self {
        Self {
            queue: ChurnQueue::new(churn_queue_max_size),
            justified_checkpoint: None,
            validator,
        }
    }

    pub fn queue(&self) -> &ChurnQueue {
        &self.queue
    }

    pub fn justified_checkpoint(&self) -> Option<Checkpoint> {
        self.justified_checkpoint
    }

    /// Finality always wins: the window's lower bound is pulled up to the checkpoint.
    pub fn feed_finalized_checkpoint(&mut self, checkpoint: Checkpoint) {
        if self
            .justified_checkpoint
            .is_none_or(|justified| justified.epoch < checkpoint.epoch)
        {
            self.justified_checkpoint = Some(checkpoint);
        }
        self.move_window_to_checkpoint(checkpoint);
    }

    /// Only a strictly newer justified checkpoint is applied.
    pub fn feed_justified_checkpoint(&mut self, checkpoint: Checkpoint) {
        if let Some(justified) = self.justified_checkpoint
            && checkpoint.epoch <= justified.epoch
        {
            debug!(
                "Ignoring justified checkpoint at epoch {}, current is {}",
                checkpoint.epoch, justified.epoch
            );
            return;
        }

        self.justified_checkpoint = Some(checkpoint);
        self.move_window_to_checkpoint(checkpoint);
    }

    pub fn feed_new_slot(&mut self, slot: u64) {
        let epoch = compute_epoch_at_slot(slot);
        self.queue
            .update_epoch_boundaries(epoch.saturating_sub(1), epoch);
    }

    pub fn add(&mut self, attestations: impl IntoIterator<Item = Attestation>) -> usize {
        self.queue.add(attestations)
    }

    /// Builds aggregates out of queued attestations that still add participants on top of what
    /// `tuple.state` already recorded, and that the validator still accepts for that state.
    pub fn compute(&mut self, tuple: &BeaconTuple) -> OffChainAggregates {
        let timer = start_timer_vec(&COMPUTE_AGGREGATES_TIME, &["compute"]);
        let state = &tuple.state;

        self.queue
            .update_epoch_boundaries(state.get_previous_epoch(), state.get_current_epoch());

        let mut aggregates: Vec<AttestationAggregate> = vec![];
        if !self.queue.is_empty() {
            let mut coverage: HashMap<&AttestationData, BitList<U2048>> = HashMap::new();
            for pending_attestation in state.pending_attestations() {
                coverage
                    .entry(&pending_attestation.data)
                    .and_modify(|bits| *bits = bits.union(&pending_attestation.aggregation_bits))
                    .or_insert_with(|| pending_attestation.aggregation_bits.clone());
            }

            let candidates = self
                .queue
                .iter()
                .filter(|attestation| {
                    coverage.get(&attestation.data).is_none_or(|covered| {
                        !attestation.aggregation_bits.is_subset(covered)
                    })
                })
                .filter(|attestation| self.validator.is_valid(state, attestation));

            for attestation in candidates {
                if !aggregates
                    .last_mut()
                    .is_some_and(|current| current.add(attestation))
                {
                    aggregates.push(AttestationAggregate::create(attestation));
                }
            }
        }

        let output = OffChainAggregates {
            block_root: tuple.block.tree_hash_root(),
            slot: state.slot,
            aggregates,
        };
        stop_timer(timer);

        info!(
            "Computed {} aggregates from {} queued attestations at slot {}",
            output.aggregates.len(),
            self.queue.len(),
            output.slot
        );
        output
    }

    fn move_window_to_checkpoint(&mut self, checkpoint: Checkpoint) {
        let upper_epoch = checkpoint.epoch.max(self.queue.upper_epoch());
        self.queue
            .update_epoch_boundaries(checkpoint.epoch, upper_epoch);
    }
}
