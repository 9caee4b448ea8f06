use std::{fs, path::Path};

use anyhow::{Context, ensure};
use ream_consensus_misc::constants::beacon::MAX_COMMITTEES_PER_SLOT;
use serde::{Deserialize, Serialize};

use crate::filter::FilterStage;

pub const DEFAULT_MAX_ATTESTATION_LOOKAHEAD: u64 = 1;
pub const DEFAULT_MAX_KNOWN_ATTESTATIONS: usize = 1_000_000;
pub const DEFAULT_CHURN_QUEUE_MAX_SIZE: usize = 16_384;
pub const DEFAULT_MAX_UNKNOWN_ATTESTATIONS: usize = 100_000;
pub const DEFAULT_MAX_KNOWN_BLOCKS: usize = 8_192;

/// Tunables of the attestation pool. Every key is optional in YAML and falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttestationPoolConfig {
    /// How many epochs past the current one an attestation target may point to.
    pub max_attestation_lookahead: u64,
    /// Capacity of the fingerprint cache used to drop duplicates.
    pub max_known_attestations: usize,
    /// Committee indices at or above this bound are rejected.
    pub committee_bound: u64,
    /// Attestations kept in the churn queue before the oldest get evicted.
    pub churn_queue_max_size: usize,
    /// Attestations held while their block is unknown.
    pub max_unknown_attestations: usize,
    /// Imported block roots remembered to tell known blocks from unknown ones.
    pub max_known_blocks: usize,
    pub filter_stages: Vec<FilterStage>,
}

impl Default for AttestationPoolConfig {
    fn default() -> Self {
        Self {
            max_attestation_lookahead: DEFAULT_MAX_ATTESTATION_LOOKAHEAD,
            max_known_attestations: DEFAULT_MAX_KNOWN_ATTESTATIONS,
            committee_bound: MAX_COMMITTEES_PER_SLOT,
            churn_queue_max_size: DEFAULT_CHURN_QUEUE_MAX_SIZE,
            max_unknown_attestations: DEFAULT_MAX_UNKNOWN_ATTESTATIONS,
            max_known_blocks: DEFAULT_MAX_KNOWN_BLOCKS,
            filter_stages: FilterStage::all().to_vec(),
        }
    }
}

impl AttestationPoolConfig {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read pool config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML from {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.max_known_attestations > 0,
            "max_known_attestations must be greater than zero"
        );
        ensure!(
            self.churn_queue_max_size > 0,
            "churn_queue_max_size must be greater than zero"
        );
        ensure!(
            self.max_unknown_attestations > 0,
            "max_unknown_attestations must be greater than zero"
        );
        ensure!(
            self.max_known_blocks > 0,
            "max_known_blocks must be greater than zero"
        );
        ensure!(
            self.committee_bound > 0,
            "committee_bound must be greater than zero"
        );
        Ok(())
    }
}
