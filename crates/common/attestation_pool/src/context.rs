use ream_consensus_misc::{checkpoint::Checkpoint, misc::compute_epoch_at_slot};
use tracing::debug;

/// Chain position the intake filters judge attestations against. Only the serial dispatcher
/// mutates it, by feeding finalized checkpoints and slot ticks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterContext {
    finalized_checkpoint: Option<Checkpoint>,
    max_acceptable_epoch: Option<u64>,
    max_attestation_lookahead: u64,
}

/// A fully initialised [FilterContext]. Filter predicates only accept this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveFilterContext {
    pub finalized_checkpoint: Checkpoint,
    pub max_acceptable_epoch: u64,
}

impl FilterContext {
    pub fn new(max_attestation_lookahead: u64) -> Self {
        Self {
            finalized_checkpoint: None,
            max_acceptable_epoch: None,
            max_attestation_lookahead,
        }
    }

    /// Returns false when the checkpoint is older than the one already known.
    pub fn feed_finalized_checkpoint(&mut self, checkpoint: Checkpoint) -> bool {
        if let Some(current) = self.finalized_checkpoint
            && checkpoint.epoch < current.epoch
        {
            debug!(
                "Ignoring finalized checkpoint at epoch {} older than {}",
                checkpoint.epoch, current.epoch
            );
            return false;
        }

        self.finalized_checkpoint = Some(checkpoint);
        true
    }

    pub fn feed_new_slot(&mut self, slot: u64) {
        self.max_acceptable_epoch =
            Some(compute_epoch_at_slot(slot).saturating_add(self.max_attestation_lookahead));
    }

    pub fn finalized_checkpoint(&self) -> Option<Checkpoint> {
        self.finalized_checkpoint
    }

    pub fn max_acceptable_epoch(&self) -> Option<u64> {
        self.max_acceptable_epoch
    }

    pub fn is_initialized(&self) -> bool {
        self.active().is_some()
    }

    pub fn active(&self) -> Option<ActiveFilterContext> {
        Some(ActiveFilterContext {
            finalized_checkpoint: self.finalized_checkpoint?,
            max_acceptable_epoch: self.max_acceptable_epoch?,
        })
    }
}
