use anyhow::anyhow;
use ream_consensus_misc::{
    beacon_block::BeaconBlock, beacon_state::BeaconTuple, checkpoint::Checkpoint,
};
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

use crate::{
    engine::OffChainAggregates,
    messages::{AttestationPoolMessage, ReceivedAttestation},
};

#[derive(Debug, Clone)]
pub struct AttestationPoolSender(pub mpsc::UnboundedSender<AttestationPoolMessage>);

impl AttestationPoolSender {
    pub fn send_attestation(&self, attestation: ReceivedAttestation) {
        if let Err(err) = self.0.send(AttestationPoolMessage::Attestation(attestation)) {
            warn!("Failed to send attestation to pool: {err}");
        }
    }

    pub fn send_new_slot(&self, slot: u64) {
        if let Err(err) = self.0.send(AttestationPoolMessage::NewSlot(slot)) {
            warn!("Failed to send new slot {slot} to pool: {err}");
        }
    }

    pub fn send_finalized_checkpoint(&self, checkpoint: Checkpoint) {
        if let Err(err) = self
            .0
            .send(AttestationPoolMessage::FinalizedCheckpoint(checkpoint))
        {
            warn!("Failed to send finalized checkpoint to pool: {err}");
        }
    }

    pub fn send_justified_checkpoint(&self, checkpoint: Checkpoint) {
        if let Err(err) = self
            .0
            .send(AttestationPoolMessage::JustifiedCheckpoint(checkpoint))
        {
            warn!("Failed to send justified checkpoint to pool: {err}");
        }
    }

    pub fn send_imported_block(&self, block: BeaconBlock) {
        if let Err(err) = self.0.send(AttestationPoolMessage::ImportedBlock(block)) {
            warn!("Failed to send imported block to pool: {err}");
        }
    }

    pub fn send_chain_head(&self, tuple: BeaconTuple) {
        if let Err(err) = self.0.send(AttestationPoolMessage::ChainHead(tuple)) {
            warn!("Failed to send chain head to pool: {err}");
        }
    }

    /// Asks the pool for aggregates on top of `tuple` and waits for the answer.
    pub async fn compute(&self, tuple: BeaconTuple) -> anyhow::Result<OffChainAggregates> {
        let (response, receiver) = oneshot::channel();
        self.0
            .send(AttestationPoolMessage::Compute { tuple, response })
            .map_err(|err| anyhow!("Failed to send compute request to pool: {err}"))?;
        receiver
            .await
            .map_err(|err| anyhow!("Pool dropped compute request: {err}"))
    }
}
