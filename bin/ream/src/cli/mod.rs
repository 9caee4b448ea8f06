pub mod constants;
pub mod node;
pub mod verbosity;

use clap::{Parser, Subcommand};

use crate::cli::node::NodeConfig;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the attestation pool node
    #[command(name = "node")]
    Node(NodeConfig),
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;
    use ream_attestation_pool::config::AttestationPoolConfig;
    use ream_consensus_misc::checkpoint::Checkpoint;

    use super::*;
    use crate::cli::verbosity::Verbosity;

    #[test]
    fn test_cli_node_command() {
        let cli = Cli::parse_from([
            "program",
            "node",
            "--verbosity",
            "2",
            "--max-attestation-lookahead",
            "2",
            "--churn-queue-max-size",
            "512",
            "--max-unknown-attestations",
            "1024",
            "--anchor-checkpoint",
            "0x0101010101010101010101010101010101010101010101010101010101010101:10",
        ]);

        match cli.command {
            Commands::Node(config) => {
                assert_eq!(config.verbosity, Verbosity::Warn);
                assert_eq!(
                    config.anchor_checkpoint,
                    Some(Checkpoint::new(10, B256::repeat_byte(1)))
                );
                assert!(!config.enable_metrics);

                let pool_config = config.attestation_pool_config().unwrap();
                assert_eq!(
                    pool_config,
                    AttestationPoolConfig {
                        max_attestation_lookahead: 2,
                        churn_queue_max_size: 512,
                        max_unknown_attestations: 1024,
                        ..Default::default()
                    }
                );
            }
        }
    }

    #[test]
    fn test_zero_capacity_flag_is_rejected() {
        let cli = Cli::parse_from(["program", "node", "--max-known-attestations", "0"]);

        match cli.command {
            Commands::Node(config) => assert!(config.attestation_pool_config().is_err()),
        }
    }
}
