use ream_consensus_misc::attestation::Attestation;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{config::AttestationPoolConfig, context::ActiveFilterContext};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    #[error("target epoch {target} is not after finalized epoch {finalized}")]
    TargetNotAfterFinalized { target: u64, finalized: u64 },
    #[error("source epoch {source_epoch} is not after finalized epoch {finalized}")]
    SourceBeforeFinalized { source_epoch: u64, finalized: u64 },
    #[error("target epoch {target} is beyond max acceptable epoch {max_acceptable}")]
    TargetBeyondLookahead { target: u64, max_acceptable: u64 },
    #[error("source epoch {source_epoch} is not before target epoch {target}")]
    SourceNotBeforeTarget { source_epoch: u64, target: u64 },
    #[error("source root does not match finalized checkpoint at epoch {epoch}")]
    SourceRootMismatch { epoch: u64 },
    #[error("committee index {index} is out of range, bound is {bound}")]
    CommitteeIndexOutOfRange { index: u64, bound: u64 },
    #[error("signature is not a well formed compressed point")]
    MalformedSignature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterStage {
    TimeFrame,
    Sanity,
    SignatureEncoding,
}

impl FilterStage {
    pub const fn all() -> [FilterStage; 3] {
        [
            FilterStage::TimeFrame,
            FilterStage::Sanity,
            FilterStage::SignatureEncoding,
        ]
    }

    pub fn check(
        &self,
        attestation: &Attestation,
        context: &ActiveFilterContext,
        committee_bound: u64,
    ) -> Result<(), RejectionReason> {
        match self {
            FilterStage::TimeFrame => check_time_frame(attestation, context),
            FilterStage::Sanity => check_sanity(attestation, context, committee_bound),
            FilterStage::SignatureEncoding => check_signature_encoding(attestation),
        }
    }
}

/// Rejects votes that land at or behind finality, or too far in the future.
pub fn check_time_frame(
    attestation: &Attestation,
    context: &ActiveFilterContext,
) -> Result<(), RejectionReason> {
    let data = &attestation.data;
    let finalized = context.finalized_checkpoint.epoch;

    if data.target.epoch <= finalized {
        return Err(RejectionReason::TargetNotAfterFinalized {
            target: data.target.epoch,
            finalized,
        });
    }

    if data.source.epoch <= finalized {
        return Err(RejectionReason::SourceBeforeFinalized {
            source_epoch: data.source.epoch,
            finalized,
        });
    }

    if data.target.epoch > context.max_acceptable_epoch {
        return Err(RejectionReason::TargetBeyondLookahead {
            target: data.target.epoch,
            max_acceptable: context.max_acceptable_epoch,
        });
    }

    Ok(())
}

pub fn check_sanity(
    attestation: &Attestation,
    context: &ActiveFilterContext,
    committee_bound: u64,
) -> Result<(), RejectionReason> {
    let data = &attestation.data;
    let finalized = &context.finalized_checkpoint;

    if data.source.epoch >= data.target.epoch {
        return Err(RejectionReason::SourceNotBeforeTarget {
            source_epoch: data.source.epoch,
            target: data.target.epoch,
        });
    }

    if data.source.epoch == finalized.epoch && data.source.root != finalized.root {
        return Err(RejectionReason::SourceRootMismatch {
            epoch: finalized.epoch,
        });
    }

    if data.index >= committee_bound {
        return Err(RejectionReason::CommitteeIndexOutOfRange {
            index: data.index,
            bound: committee_bound,
        });
    }

    Ok(())
}

pub fn check_signature_encoding(attestation: &Attestation) -> Result<(), RejectionReason> {
    if !attestation.signature.has_valid_encoding() {
        return Err(RejectionReason::MalformedSignature);
    }
    Ok(())
}

/// Ordered admission stages. The first stage to reject decides the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChain {
    stages: Vec<FilterStage>,
    committee_bound: u64,
}

impl FilterChain {
    pub fn new(stages: Vec<FilterStage>, committee_bound: u64) -> Self {
        Self {
            stages,
            committee_bound,
        }
    }

    pub fn from_config(config: &AttestationPoolConfig) -> Self {
        Self::new(config.filter_stages.clone(), config.committee_bound)
    }

    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    pub fn check(
        &self,
        attestation: &Attestation,
        context: &ActiveFilterContext,
    ) -> Result<(), RejectionReason> {
        self.stages
            .iter()
            .try_for_each(|stage| stage.check(attestation, context, self.committee_bound))
    }
}
