use alloy_primitives::B256;
use ream_attestation_pool::{
    config::AttestationPoolConfig,
    filter::RejectionReason,
    messages::{AttestationPoolMessage, Origin, ReceivedAttestation, VerdictOutcome},
    sender::AttestationPoolSender,
    service::AttestationPoolService,
    validator::StateAttestationValidator,
};
use ream_bls::{
    BLSSignature, PrivateKey,
    traits::{Aggregatable, Signable},
};
use ream_consensus_misc::{
    attestation::Attestation,
    attestation_data::AttestationData,
    beacon_block::BeaconBlock,
    beacon_state::{BeaconState, BeaconTuple},
    checkpoint::Checkpoint,
    misc::compute_start_slot_at_epoch,
    pending_attestation::PendingAttestation,
};
use ssz_types::{BitList, VariableList, typenum::U2048};
use tokio::sync::mpsc;
use tree_hash::TreeHash;

const COMMITTEE_SIZE: usize = 8;

fn finalized() -> Checkpoint {
    Checkpoint::new(10, B256::repeat_byte(10))
}

fn justified() -> Checkpoint {
    Checkpoint::new(11, B256::repeat_byte(11))
}

fn bits(set: &[usize]) -> BitList<U2048> {
    let mut bits = BitList::with_capacity(COMMITTEE_SIZE).unwrap();
    for &index in set {
        bits.set(index, true).unwrap();
    }
    bits
}

fn voted_block() -> BeaconBlock {
    BeaconBlock {
        slot: compute_start_slot_at_epoch(12) + 1,
        proposer_index: 5,
        parent_root: B256::repeat_byte(0xbb),
        ..Default::default()
    }
}

fn data(source: Checkpoint, target_epoch: u64) -> AttestationData {
    AttestationData {
        slot: compute_start_slot_at_epoch(target_epoch) + 2,
        index: 3,
        beacon_block_root: voted_block().tree_hash_root(),
        source,
        target: Checkpoint::new(target_epoch, B256::repeat_byte(target_epoch as u8)),
    }
}

fn signed(data: &AttestationData, validator: usize) -> Attestation {
    let private_key = PrivateKey::key_gen(&[validator as u8 + 1; 32]).unwrap();
    Attestation {
        aggregation_bits: bits(&[validator]),
        data: data.clone(),
        signature: private_key.sign(data.tree_hash_root().as_slice()).unwrap(),
    }
}

fn received(attestation: Attestation) -> ReceivedAttestation {
    ReceivedAttestation::new(
        attestation,
        Origin::Gossip {
            peer_id: "16Uiu2HAm".to_string(),
        },
    )
}

fn config() -> AttestationPoolConfig {
    AttestationPoolConfig {
        max_attestation_lookahead: 2,
        ..Default::default()
    }
}

/// Finalized epoch 10, current epoch 12 and a lookahead of 2 admit targets up to epoch 14.
#[test]
fn test_intake_follows_finality_and_lookahead() {
    let (_sender, receiver) = mpsc::unbounded_channel();
    let (verdict_sender, mut verdicts) = mpsc::unbounded_channel();
    let mut service = AttestationPoolService::new(&config(), StateAttestationValidator, receiver)
        .unwrap()
        .with_verdict_sender(verdict_sender);

    service.handle_message(AttestationPoolMessage::FinalizedCheckpoint(finalized()));
    service.handle_message(AttestationPoolMessage::NewSlot(compute_start_slot_at_epoch(
        12,
    )));
    service.handle_message(AttestationPoolMessage::ImportedBlock(voted_block()));
    assert_eq!(service.context().max_acceptable_epoch(), Some(14));

    let cases = [
        (
            data(Checkpoint::new(9, B256::repeat_byte(9)), 12),
            VerdictOutcome::Invalid(RejectionReason::SourceBeforeFinalized {
                source_epoch: 9,
                finalized: 10,
            }),
        ),
        (data(justified(), 12), VerdictOutcome::Valid),
        (
            data(justified(), 15),
            VerdictOutcome::Invalid(RejectionReason::TargetBeyondLookahead {
                target: 15,
                max_acceptable: 14,
            }),
        ),
    ];

    for (data, expected) in cases {
        service.handle_message(AttestationPoolMessage::Attestation(received(signed(
            &data, 0,
        ))));
        assert_eq!(verdicts.try_recv().unwrap().outcome, expected);
    }

    let mut malformed = signed(&data(justified(), 12), 1);
    malformed.signature = BLSSignature::default();
    service.handle_message(AttestationPoolMessage::Attestation(received(malformed)));
    assert_eq!(
        verdicts.try_recv().unwrap().outcome,
        VerdictOutcome::Invalid(RejectionReason::MalformedSignature)
    );

    assert_eq!(service.engine().queue().len(), 1);
}

#[tokio::test]
async fn test_aggregates_skip_votes_already_on_chain() {
    let (sender, receiver) = mpsc::unbounded_channel();
    let service = AttestationPoolService::new(&config(), StateAttestationValidator, receiver)
        .unwrap();
    let handle = tokio::spawn(service.start());

    let pool = AttestationPoolSender(sender);
    pool.send_finalized_checkpoint(finalized());
    pool.send_justified_checkpoint(justified());
    pool.send_new_slot(compute_start_slot_at_epoch(12));
    pool.send_imported_block(voted_block());

    let data = data(justified(), 12);
    let votes = (0..4).map(|validator| signed(&data, validator)).collect::<Vec<_>>();
    for vote in &votes {
        pool.send_attestation(received(vote.clone()));
    }
    // Gossip often delivers the same vote more than once.
    pool.send_attestation(received(votes[2].clone()));

    let block = BeaconBlock {
        slot: compute_start_slot_at_epoch(12) + 5,
        proposer_index: 7,
        ..Default::default()
    };
    let state = BeaconState {
        slot: compute_start_slot_at_epoch(12) + 5,
        previous_epoch_attestations: VariableList::default(),
        current_epoch_attestations: VariableList::new(vec![PendingAttestation {
            aggregation_bits: bits(&[0, 1]),
            data: data.clone(),
            inclusion_delay: 1,
            proposer_index: 3,
        }])
        .unwrap(),
        previous_justified_checkpoint: finalized(),
        current_justified_checkpoint: justified(),
        finalized_checkpoint: finalized(),
    };
    let tuple = BeaconTuple::new(block.clone(), state.clone());

    let output = pool.compute(tuple).await.unwrap();
    assert_eq!(output.block_root, block.tree_hash_root());
    assert_eq!(output.slot, state.slot);

    let attestations = output.attestations();
    assert_eq!(attestations.len(), 1);
    assert_eq!(attestations[0].aggregation_bits, bits(&[2, 3]));
    assert_eq!(
        attestations[0].signature,
        BLSSignature::aggregate(&[&votes[2].signature, &votes[3].signature]).unwrap()
    );

    drop(pool);
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_votes_wait_for_their_block() {
    let (sender, receiver) = mpsc::unbounded_channel();
    let (verdict_sender, mut verdicts) = mpsc::unbounded_channel();
    let service = AttestationPoolService::new(&config(), StateAttestationValidator, receiver)
        .unwrap()
        .with_verdict_sender(verdict_sender);
    let handle = tokio::spawn(service.start());

    let pool = AttestationPoolSender(sender);
    pool.send_finalized_checkpoint(finalized());
    pool.send_justified_checkpoint(justified());
    pool.send_new_slot(compute_start_slot_at_epoch(12));

    let data = data(justified(), 12);
    let votes = (0..2).map(|validator| signed(&data, validator)).collect::<Vec<_>>();
    for vote in &votes {
        pool.send_attestation(received(vote.clone()));
        assert_eq!(
            verdicts.recv().await.unwrap().outcome,
            VerdictOutcome::UnknownBlock
        );
    }

    let tuple = BeaconTuple::new(
        BeaconBlock {
            slot: compute_start_slot_at_epoch(12) + 5,
            ..Default::default()
        },
        BeaconState {
            slot: compute_start_slot_at_epoch(12) + 5,
            previous_justified_checkpoint: finalized(),
            current_justified_checkpoint: justified(),
            finalized_checkpoint: finalized(),
            ..Default::default()
        },
    );
    assert!(pool.compute(tuple.clone()).await.unwrap().aggregates.is_empty());

    pool.send_imported_block(voted_block());
    let attestations = pool.compute(tuple).await.unwrap().attestations();
    assert_eq!(attestations.len(), 1);
    assert_eq!(attestations[0].aggregation_bits, bits(&[0, 1]));

    drop(pool);
    handle.await.unwrap().unwrap();
}
