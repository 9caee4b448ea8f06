use alloy_primitives::B256;
use ream_bls::BLSSignature;
use ream_consensus_misc::{
    attestation::Attestation, attestation_data::AttestationData, beacon_block::BeaconBlock,
    checkpoint::Checkpoint, misc::compute_start_slot_at_epoch,
};
use ssz_types::BitList;
use tree_hash::TreeHash;

pub fn bits(len: usize, set: &[usize]) -> BitList<ssz_types::typenum::U2048> {
    let mut bits = BitList::with_capacity(len).unwrap();
    for &index in set {
        bits.set(index, true).unwrap();
    }
    bits
}

/// The block every test attestation votes for.
pub fn voted_block() -> BeaconBlock {
    BeaconBlock {
        slot: 1,
        proposer_index: 3,
        ..Default::default()
    }
}

pub fn attestation_data(source_epoch: u64, target_epoch: u64) -> AttestationData {
    AttestationData {
        slot: compute_start_slot_at_epoch(target_epoch),
        index: 0,
        beacon_block_root: voted_block().tree_hash_root(),
        source: Checkpoint::new(source_epoch, B256::repeat_byte(source_epoch as u8)),
        target: Checkpoint::new(target_epoch, B256::repeat_byte(target_epoch as u8)),
    }
}

pub fn attestation(source_epoch: u64, target_epoch: u64, set: &[usize]) -> Attestation {
    Attestation {
        aggregation_bits: bits(8, set),
        data: attestation_data(source_epoch, target_epoch),
        signature: BLSSignature::infinity(),
    }
}
