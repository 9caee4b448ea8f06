use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::{VariableList, typenum::U4096};
use tree_hash_derive::TreeHash;

use crate::{
    beacon_block::BeaconBlock,
    checkpoint::Checkpoint,
    constants::beacon::GENESIS_EPOCH,
    misc::compute_epoch_at_slot,
    pending_attestation::PendingAttestation,
};

/// The part of the phase0 beacon state that attestation pooling reads.
#[derive(
    Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
pub struct BeaconState {
    #[serde(with = "serde_utils::quoted_u64")]
    pub slot: u64,

    // Attestations
    pub previous_epoch_attestations: VariableList<PendingAttestation, U4096>,
    pub current_epoch_attestations: VariableList<PendingAttestation, U4096>,

    // Finality
    pub previous_justified_checkpoint: Checkpoint,
    pub current_justified_checkpoint: Checkpoint,
    pub finalized_checkpoint: Checkpoint,
}

impl BeaconState {
    /// Return the current epoch.
    pub fn get_current_epoch(&self) -> u64 {
        compute_epoch_at_slot(self.slot)
    }

    /// Return the previous epoch (unless the current epoch is ``GENESIS_EPOCH``).
    pub fn get_previous_epoch(&self) -> u64 {
        let current_epoch = self.get_current_epoch();
        if current_epoch == GENESIS_EPOCH {
            GENESIS_EPOCH
        } else {
            current_epoch - 1
        }
    }

    /// Every attestation recorded on chain for the previous and current epochs.
    pub fn pending_attestations(&self) -> impl Iterator<Item = &PendingAttestation> {
        self.previous_epoch_attestations
            .iter()
            .chain(self.current_epoch_attestations.iter())
    }
}

/// A canonical block together with its post-state.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct BeaconTuple {
    pub block: BeaconBlock,
    pub state: BeaconState,
}

impl BeaconTuple {
    pub fn new(block: BeaconBlock, state: BeaconState) -> Self {
        Self { block, state }
    }
}
