use alloy_primitives::B256;
use ream_bls::BLSSignature;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::{BitList, typenum::U2048};
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

use crate::attestation_data::AttestationData;

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct Attestation {
    pub aggregation_bits: BitList<U2048>,
    pub data: AttestationData,
    pub signature: BLSSignature,
}

impl Attestation {
    /// Content fingerprint over bits, data and signature. Two attestations with the same
    /// fingerprint carry the same vote regardless of where they came from.
    pub fn fingerprint(&self) -> B256 {
        self.tree_hash_root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::Checkpoint;

    fn attestation(bits: &[usize]) -> Attestation {
        let mut aggregation_bits = BitList::with_capacity(8).unwrap();
        for &bit in bits {
            aggregation_bits.set(bit, true).unwrap();
        }

        Attestation {
            aggregation_bits,
            data: AttestationData {
                slot: 1,
                index: 0,
                beacon_block_root: B256::repeat_byte(1),
                source: Checkpoint::new(0, B256::repeat_byte(2)),
                target: Checkpoint::new(1, B256::repeat_byte(3)),
            },
            signature: BLSSignature::infinity(),
        }
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        assert_eq!(attestation(&[0]).fingerprint(), attestation(&[0]).fingerprint());
        assert_ne!(attestation(&[0]).fingerprint(), attestation(&[1]).fingerprint());

        let mut other_data = attestation(&[0]);
        other_data.data.index = 1;
        assert_ne!(other_data.fingerprint(), attestation(&[0]).fingerprint());
    }
}
