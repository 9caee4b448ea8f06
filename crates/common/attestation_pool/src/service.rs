use std::num::NonZeroUsize;

use alloy_primitives::B256;
use anyhow::anyhow;
use ream_consensus_misc::{attestation::Attestation, beacon_state::BeaconTuple};
use ream_metrics::{ATTESTATION_VERDICTS, inc_int_counter_vec};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};
use tree_hash::TreeHash;

use crate::{
    config::AttestationPoolConfig,
    context::FilterContext,
    dedup::DedupCache,
    engine::{AggregationEngine, OffChainAggregates},
    filter::FilterChain,
    messages::{AttestationPoolMessage, AttestationVerdict, ReceivedAttestation, VerdictOutcome},
    unknown_block::{BlockStatus, UnknownBlockPool},
    validator::AttestationValidator,
};

/// AttestationPoolService owns every piece of pool state and applies inbound messages one at a
/// time, so none of it needs locking.
///
/// Per attestation the pipeline is: filter chain, then dedup cache, then the unknown block pool,
/// then the churn queue of the [AggregationEngine]. An attestation is remembered by the dedup
/// cache only once the pool keeps it. Imported blocks, checkpoints and chain heads mark block
/// roots as known and release the attestations held for them. Slot ticks and checkpoints update
/// the filter context and the windows. Aggregates are computed either on a new chain head
/// (published on the aggregates channel) or on request.
pub struct AttestationPoolService<V> {
    context: FilterContext,
    filter_chain: FilterChain,
    dedup_cache: DedupCache,
    unknown_block: UnknownBlockPool,
    engine: AggregationEngine<V>,
    receiver: mpsc::UnboundedReceiver<AttestationPoolMessage>,
    verdict_sender: Option<mpsc::UnboundedSender<AttestationVerdict>>,
    aggregates_sender: Option<mpsc::UnboundedSender<OffChainAggregates>>,
}

impl<V: AttestationValidator> AttestationPoolService<V> {
    pub fn new(
        config: &AttestationPoolConfig,
        validator: V,
        receiver: mpsc::UnboundedReceiver<AttestationPoolMessage>,
    ) -> anyhow::Result<Self> {
        config.validate()?;
        let capacity = NonZeroUsize::new(config.max_known_attestations)
            .ok_or_else(|| anyhow!("max_known_attestations must be greater than zero"))?;
        let max_known_blocks = NonZeroUsize::new(config.max_known_blocks)
            .ok_or_else(|| anyhow!("max_known_blocks must be greater than zero"))?;

        Ok(Self {
            context: FilterContext::new(config.max_attestation_lookahead),
            filter_chain: FilterChain::from_config(config),
            dedup_cache: DedupCache::new(capacity),
            unknown_block: UnknownBlockPool::new(
                max_known_blocks,
                config.max_unknown_attestations,
                config.max_attestation_lookahead,
            ),
            engine: AggregationEngine::new(config.churn_queue_max_size, validator),
            receiver,
            verdict_sender: None,
            aggregates_sender: None,
        })
    }

    pub fn with_verdict_sender(mut self, sender: mpsc::UnboundedSender<AttestationVerdict>) -> Self {
        self.verdict_sender = Some(sender);
        self
    }

    pub fn with_aggregates_sender(
        mut self,
        sender: mpsc::UnboundedSender<OffChainAggregates>,
    ) -> Self {
        self.aggregates_sender = Some(sender);
        self
    }

    pub fn context(&self) -> &FilterContext {
        &self.context
    }

    pub fn dedup_cache(&self) -> &DedupCache {
        &self.dedup_cache
    }

    pub fn unknown_block(&self) -> &UnknownBlockPool {
        &self.unknown_block
    }

    pub fn engine(&self) -> &AggregationEngine<V> {
        &self.engine
    }

    /// Runs until every sender of the inbound channel has been dropped.
    pub async fn start(mut self) -> anyhow::Result<()> {
        info!(
            "AttestationPoolService started with filter stages {:?}",
            self.filter_chain.stages()
        );

        while let Some(message) = self.receiver.recv().await {
            self.handle_message(message);
        }

        info!("AttestationPoolService stopped, inbound channel closed");
        Ok(())
    }

    pub fn handle_message(&mut self, message: AttestationPoolMessage) {
        match message {
            AttestationPoolMessage::Attestation(received) => self.handle_attestation(received),
            AttestationPoolMessage::NewSlot(slot) => {
                trace!("New slot {slot}");
                self.context.feed_new_slot(slot);
                self.engine.feed_new_slot(slot);
                self.unknown_block.feed_new_slot(slot);
            }
            AttestationPoolMessage::FinalizedCheckpoint(checkpoint) => {
                if self.context.feed_finalized_checkpoint(checkpoint) {
                    info!("Finalized checkpoint updated to epoch {}", checkpoint.epoch);
                    self.engine.feed_finalized_checkpoint(checkpoint);
                    self.release_held(checkpoint.root);
                }
            }
            AttestationPoolMessage::JustifiedCheckpoint(checkpoint) => {
                self.engine.feed_justified_checkpoint(checkpoint);
                self.release_held(checkpoint.root);
            }
            AttestationPoolMessage::ImportedBlock(block) => {
                self.release_held(block.tree_hash_root());
            }
            AttestationPoolMessage::ChainHead(tuple) => {
                self.release_held(tuple.block.tree_hash_root());
                let aggregates = self.compute(&tuple);
                if let Some(sender) = &self.aggregates_sender
                    && let Err(err) = sender.send(aggregates)
                {
                    warn!("Failed to publish aggregates: {err}");
                }
            }
            AttestationPoolMessage::Compute { tuple, response } => {
                if response.send(self.compute(&tuple)).is_err() {
                    warn!("Compute requester went away before receiving aggregates");
                }
            }
        }
    }

    fn compute(&mut self, tuple: &BeaconTuple) -> OffChainAggregates {
        self.engine.compute(tuple)
    }

    fn handle_attestation(&mut self, received: ReceivedAttestation) {
        let Some(context) = self.context.active() else {
            trace!("Dropping attestation received before the pool is initialised");
            inc_int_counter_vec(&ATTESTATION_VERDICTS, &["ignored"]);
            return;
        };

        let ReceivedAttestation {
            attestation,
            origin,
        } = received;

        let outcome = if let Err(reason) = self.filter_chain.check(&attestation, &context) {
            debug!("Rejected attestation from {origin:?}: {reason}");
            VerdictOutcome::Invalid(reason)
        } else if self.dedup_cache.touch(&attestation) {
            trace!("Dropping duplicate attestation from {origin:?}");
            VerdictOutcome::Duplicate
        } else {
            let outcome = self.admit(&attestation);
            if outcome != VerdictOutcome::Ignored {
                self.dedup_cache.remember(&attestation);
            }
            outcome
        };

        inc_int_counter_vec(&ATTESTATION_VERDICTS, &[outcome.label()]);

        if let Some(sender) = &self.verdict_sender
            && let Err(err) = sender.send(AttestationVerdict {
                attestation,
                origin,
                outcome,
            })
        {
            warn!("Failed to send attestation verdict: {err}");
        }
    }

    /// Hands a filtered, unseen attestation to the unknown block pool or the churn queue.
    fn admit(&mut self, attestation: &Attestation) -> VerdictOutcome {
        match self.unknown_block.check(attestation) {
            BlockStatus::Known => {
                if self.engine.add([attestation.clone()]) > 0 {
                    VerdictOutcome::Valid
                } else {
                    trace!(
                        "Ignoring attestation with target epoch {} outside the churn queue window",
                        attestation.data.target.epoch
                    );
                    VerdictOutcome::Ignored
                }
            }
            BlockStatus::Held => {
                debug!(
                    "Holding attestation for unknown block {}",
                    attestation.data.beacon_block_root
                );
                VerdictOutcome::UnknownBlock
            }
            BlockStatus::Untracked => VerdictOutcome::Ignored,
        }
    }

    /// Marks `root` as known and moves the attestations held for it into the churn queue.
    /// Those the queue refuses are forgotten by the dedup cache.
    fn release_held(&mut self, root: B256) {
        let released = self.unknown_block.on_imported_block(root);
        if released.is_empty() {
            return;
        }

        let total = released.len();
        let mut queued = 0;
        for attestation in released {
            if self.engine.add([attestation.clone()]) > 0 {
                queued += 1;
            } else {
                self.dedup_cache.forget(&attestation);
            }
        }
        debug!("Block {root} imported, queued {queued} of {total} held attestations");
    }
}
