use ream_consensus_misc::{
    attestation::Attestation,
    beacon_state::BeaconState,
    constants::beacon::{MIN_ATTESTATION_INCLUSION_DELAY, SLOTS_PER_EPOCH},
    misc::compute_epoch_at_slot,
};

/// Decides whether a queued attestation could still be included on top of `state`.
pub trait AttestationValidator {
    fn is_valid(&self, state: &BeaconState, attestation: &Attestation) -> bool;
}

impl<F> AttestationValidator for F
where
    F: Fn(&BeaconState, &Attestation) -> bool,
{
    fn is_valid(&self, state: &BeaconState, attestation: &Attestation) -> bool {
        self(state, attestation)
    }
}

/// The phase0 `process_attestation` conditions that can be evaluated without the validator
/// registry: target epoch, inclusion window and source checkpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateAttestationValidator;

impl AttestationValidator for StateAttestationValidator {
    fn is_valid(&self, state: &BeaconState, attestation: &Attestation) -> bool {
        let data = &attestation.data;
        let current_epoch = state.get_current_epoch();
        let previous_epoch = state.get_previous_epoch();

        if data.target.epoch != previous_epoch && data.target.epoch != current_epoch {
            return false;
        }

        if data.target.epoch != compute_epoch_at_slot(data.slot) {
            return false;
        }

        if data.slot + MIN_ATTESTATION_INCLUSION_DELAY > state.slot
            || state.slot > data.slot + SLOTS_PER_EPOCH
        {
            return false;
        }

        let justified_checkpoint = if data.target.epoch == current_epoch {
            &state.current_justified_checkpoint
        } else {
            &state.previous_justified_checkpoint
        };
        data.source == *justified_checkpoint
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;
    use ream_consensus_misc::{checkpoint::Checkpoint, misc::compute_start_slot_at_epoch};
    use rstest::rstest;

    use super::*;
    use crate::test_utils::attestation;

    fn state(slot: u64) -> BeaconState {
        BeaconState {
            slot,
            previous_justified_checkpoint: Checkpoint::new(10, B256::repeat_byte(10)),
            current_justified_checkpoint: Checkpoint::new(11, B256::repeat_byte(11)),
            ..Default::default()
        }
    }

    #[rstest]
    #[case::current_epoch(11, 12, 0, true)]
    #[case::previous_epoch(10, 11, 10, true)]
    #[case::wrong_source_for_current(10, 12, 0, false)]
    #[case::too_old_target(9, 10, 0, false)]
    #[case::future_target(12, 13, 0, false)]
    #[case::slot_outside_target_epoch(11, 12, SLOTS_PER_EPOCH, false)]
    fn test_state_validator(
        #[case] source: u64,
        #[case] target: u64,
        #[case] slot_offset: u64,
        #[case] valid: bool,
    ) {
        let mut attestation = attestation(source, target, &[0]);
        attestation.data.slot += slot_offset;

        let state = state(compute_start_slot_at_epoch(12) + 5);
        assert_eq!(StateAttestationValidator.is_valid(&state, &attestation), valid);
    }

    #[test]
    fn test_inclusion_delay_window() {
        let attestation = attestation(11, 12, &[0]);
        let slot = attestation.data.slot;
        let state = |slot| BeaconState {
            previous_justified_checkpoint: attestation.data.source,
            current_justified_checkpoint: attestation.data.source,
            ..state(slot)
        };

        assert!(!StateAttestationValidator.is_valid(&state(slot), &attestation));
        assert!(StateAttestationValidator.is_valid(&state(slot + 1), &attestation));
        assert!(StateAttestationValidator.is_valid(&state(slot + SLOTS_PER_EPOCH), &attestation));
        assert!(
            !StateAttestationValidator.is_valid(&state(slot + SLOTS_PER_EPOCH + 1), &attestation)
        );
    }

    #[test]
    fn test_closure_validator() {
        let reject_all = |_: &BeaconState, _: &Attestation| false;
        assert!(!reject_all.is_valid(&state(0), &attestation(0, 1, &[0])));
    }
}
