use std::{net::IpAddr, path::PathBuf};

use clap::Parser;
use ream_attestation_pool::config::{
    AttestationPoolConfig, DEFAULT_CHURN_QUEUE_MAX_SIZE, DEFAULT_MAX_ATTESTATION_LOOKAHEAD,
    DEFAULT_MAX_KNOWN_ATTESTATIONS, DEFAULT_MAX_UNKNOWN_ATTESTATIONS,
};
use ream_consensus_misc::{
    checkpoint::Checkpoint, constants::beacon::MAX_COMMITTEES_PER_SLOT,
};

use crate::cli::{
    constants::{
        DEFAULT_METRICS_ADDRESS, DEFAULT_METRICS_ENABLED, DEFAULT_METRICS_PORT, DEFAULT_VERBOSITY,
    },
    verbosity::{Verbosity, verbosity_parser},
};

#[derive(Debug, Parser)]
pub struct NodeConfig {
    /// Verbosity level
    #[arg(short, long, default_value = DEFAULT_VERBOSITY, value_parser = verbosity_parser)]
    pub verbosity: Verbosity,

    #[arg(long, help = "Genesis time as unix seconds. Defaults to the time the node starts")]
    pub genesis_time: Option<u64>,

    #[arg(
        long,
        help = "Epochs past the current one an attestation target may point to",
        default_value_t = DEFAULT_MAX_ATTESTATION_LOOKAHEAD
    )]
    pub max_attestation_lookahead: u64,

    #[arg(
        long,
        help = "Number of attestation fingerprints remembered to drop duplicates",
        default_value_t = DEFAULT_MAX_KNOWN_ATTESTATIONS
    )]
    pub max_known_attestations: usize,

    #[arg(
        long,
        help = "Attestations with a committee index at or above this bound are rejected",
        default_value_t = MAX_COMMITTEES_PER_SLOT
    )]
    pub committee_bound: u64,

    #[arg(
        long,
        help = "Maximum number of attestations kept for aggregation",
        default_value_t = DEFAULT_CHURN_QUEUE_MAX_SIZE
    )]
    pub churn_queue_max_size: usize,

    #[arg(
        long,
        help = "Maximum number of attestations held while their block is unknown",
        default_value_t = DEFAULT_MAX_UNKNOWN_ATTESTATIONS
    )]
    pub max_unknown_attestations: usize,

    #[arg(
        long,
        help = "Path to a YAML pool config file. Overrides the individual pool flags"
    )]
    pub pool_config: Option<PathBuf>,

    #[arg(
        long,
        help = "Initial finalized and justified checkpoint, formatted as 0x<root>:<epoch>"
    )]
    pub anchor_checkpoint: Option<Checkpoint>,

    #[arg(long = "metrics", help = "Enable metrics", default_value_t = DEFAULT_METRICS_ENABLED)]
    pub enable_metrics: bool,

    #[arg(long, help = "Set metrics address", default_value_t = DEFAULT_METRICS_ADDRESS)]
    pub metrics_address: IpAddr,

    #[arg(long, help = "Set metrics port", default_value_t = DEFAULT_METRICS_PORT)]
    pub metrics_port: u16,
}

impl NodeConfig {
    /// The pool config from `--pool-config` if given, otherwise from the individual flags.
    pub fn attestation_pool_config(&self) -> anyhow::Result<AttestationPoolConfig> {
        match &self.pool_config {
            Some(path) => AttestationPoolConfig::from_yaml_file(path),
            None => {
                let config = AttestationPoolConfig::from(self);
                config.validate()?;
                Ok(config)
            }
        }
    }
}

impl From<&NodeConfig> for AttestationPoolConfig {
    fn from(config: &NodeConfig) -> Self {
        Self {
            max_attestation_lookahead: config.max_attestation_lookahead,
            max_known_attestations: config.max_known_attestations,
            committee_bound: config.committee_bound,
            churn_queue_max_size: config.churn_queue_max_size,
            max_unknown_attestations: config.max_unknown_attestations,
            ..Default::default()
        }
    }
}
