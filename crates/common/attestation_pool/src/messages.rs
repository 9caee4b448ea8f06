use ream_consensus_misc::{
    attestation::Attestation, beacon_block::BeaconBlock, beacon_state::BeaconTuple,
    checkpoint::Checkpoint,
};
use tokio::sync::oneshot;

use crate::{engine::OffChainAggregates, filter::RejectionReason};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Gossip { peer_id: String },
    Api,
    Own,
}

/// An attestation as delivered to the pool, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedAttestation {
    pub attestation: Attestation,
    pub origin: Origin,
}

impl ReceivedAttestation {
    pub fn new(attestation: Attestation, origin: Origin) -> Self {
        Self {
            attestation,
            origin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerdictOutcome {
    Valid,
    Duplicate,
    Invalid(RejectionReason),
    /// Held until the voted block is imported. The block should be requested from peers.
    UnknownBlock,
    /// Passed the filters but lies outside every window the pool keeps.
    Ignored,
}

impl VerdictOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            VerdictOutcome::Valid => "valid",
            VerdictOutcome::Duplicate => "duplicate",
            VerdictOutcome::Invalid(_) => "invalid",
            VerdictOutcome::UnknownBlock => "unknown_block",
            VerdictOutcome::Ignored => "ignored",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationVerdict {
    pub attestation: Attestation,
    pub origin: Origin,
    pub outcome: VerdictOutcome,
}

#[derive(Debug)]
pub enum AttestationPoolMessage {
    Attestation(ReceivedAttestation),
    NewSlot(u64),
    FinalizedCheckpoint(Checkpoint),
    JustifiedCheckpoint(Checkpoint),
    /// A block finished importing. Attestations held for it move on to the churn queue.
    ImportedBlock(BeaconBlock),
    /// A new canonical head. Aggregates are computed and published on the aggregates channel.
    ChainHead(BeaconTuple),
    Compute {
        tuple: BeaconTuple,
        response: oneshot::Sender<OffChainAggregates>,
    },
}
