use std::str::FromStr;

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

/// An epoch boundary block, identified by its epoch and root.
#[derive(
    Debug,
    Eq,
    Hash,
    PartialEq,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    Encode,
    Decode,
    TreeHash,
    PartialOrd,
    Ord,
    Default,
)]
pub struct Checkpoint {
    #[serde(with = "serde_utils::quoted_u64")]
    pub epoch: u64,
    pub root: B256,
}

impl Checkpoint {
    pub fn new(epoch: u64, root: B256) -> Self {
        Self { epoch, root }
    }
}

impl FromStr for Checkpoint {
    type Err = CheckpointParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (root_str, epoch_str) = s
            .split_once(':')
            .ok_or(CheckpointParseError::InvalidFormat)?;

        let root = root_str
            .strip_prefix("0x")
            .ok_or(CheckpointParseError::MissingHexPrefix)
            .and_then(|hex| B256::from_str(hex).map_err(|_| CheckpointParseError::InvalidHex))?;

        let epoch = epoch_str
            .parse::<u64>()
            .map_err(|_| CheckpointParseError::InvalidEpoch)?;

        Ok(Self { epoch, root })
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CheckpointParseError {
    #[error("Expected format: 0x<block_root>:<epoch>")]
    InvalidFormat,
    #[error("Missing '0x' prefix on block_root")]
    MissingHexPrefix,
    #[error("Invalid hex block_root (expected 32 bytes)")]
    InvalidHex,
    #[error("Epoch must be a valid u64 integer")]
    InvalidEpoch,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_parse_checkpoint() {
        let checkpoint = Checkpoint::from_str(
            "0x1111111111111111111111111111111111111111111111111111111111111111:42",
        )
        .unwrap();

        assert_eq!(checkpoint.epoch, 42);
        assert_eq!(checkpoint.root, B256::repeat_byte(0x11));
    }

    #[rstest]
    #[case("no-separator", CheckpointParseError::InvalidFormat)]
    #[case(
        "1111111111111111111111111111111111111111111111111111111111111111:1",
        CheckpointParseError::MissingHexPrefix
    )]
    #[case("0x1234:1", CheckpointParseError::InvalidHex)]
    #[case(
        "0x1111111111111111111111111111111111111111111111111111111111111111:ten",
        CheckpointParseError::InvalidEpoch
    )]
    fn test_parse_checkpoint_errors(#[case] input: &str, #[case] expected: CheckpointParseError) {
        assert_eq!(Checkpoint::from_str(input).unwrap_err(), expected);
    }

    #[test]
    fn test_checkpoint_serde_quotes_epoch() {
        let checkpoint = Checkpoint::new(7, B256::ZERO);
        let json = serde_json::to_value(checkpoint).unwrap();

        assert_eq!(json["epoch"], "7");
        assert_eq!(
            serde_json::from_value::<Checkpoint>(json).unwrap(),
            checkpoint
        );
    }
}
