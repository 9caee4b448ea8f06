use ream_bls::{BLSSignature, traits::Aggregatable};
use ream_consensus_misc::{attestation::Attestation, attestation_data::AttestationData};
use ssz_types::{BitList, typenum::U2048};
use tracing::debug;

/// An attestation being built up from votes on the same data with disjoint participants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationAggregate {
    data: AttestationData,
    aggregation_bits: BitList<U2048>,
    signature: BLSSignature,
}

impl AttestationAggregate {
    pub fn create(attestation: &Attestation) -> Self {
        Self {
            data: attestation.data.clone(),
            aggregation_bits: attestation.aggregation_bits.clone(),
            signature: attestation.signature.clone(),
        }
    }

    /// Folds `attestation` into the aggregate. Returns false, leaving the aggregate untouched,
    /// when the data differs, the committees differ in size, any participant is already
    /// included, or the signatures cannot be aggregated.
    pub fn add(&mut self, attestation: &Attestation) -> bool {
        if attestation.data != self.data {
            return false;
        }

        if attestation.aggregation_bits.len() != self.aggregation_bits.len() {
            return false;
        }

        if !self
            .aggregation_bits
            .intersection(&attestation.aggregation_bits)
            .is_zero()
        {
            return false;
        }

        let signature = match BLSSignature::aggregate(&[&self.signature, &attestation.signature])
        {
            Ok(signature) => signature,
            Err(err) => {
                debug!("Failed to aggregate attestation signature: {err:?}");
                return false;
            }
        };

        self.aggregation_bits = self.aggregation_bits.union(&attestation.aggregation_bits);
        self.signature = signature;
        true
    }

    pub fn data(&self) -> &AttestationData {
        &self.data
    }

    pub fn aggregation_bits(&self) -> &BitList<U2048> {
        &self.aggregation_bits
    }

    pub fn signature(&self) -> &BLSSignature {
        &self.signature
    }

    pub fn participants(&self) -> usize {
        self.aggregation_bits.num_set_bits()
    }

    pub fn into_attestation(self) -> Attestation {
        Attestation {
            aggregation_bits: self.aggregation_bits,
            data: self.data,
            signature: self.signature,
        }
    }
}

#[cfg(test)]
mod tests {
    use ream_bls::{PrivateKey, traits::Signable};
    use ssz_types::FixedVector;

    use super::*;
    use crate::test_utils::{attestation, bits};

    #[test]
    fn test_disjoint_bits_merge() {
        let mut aggregate = AttestationAggregate::create(&attestation(1, 2, &[0]));

        assert!(aggregate.add(&attestation(1, 2, &[1])));
        assert_eq!(aggregate.aggregation_bits(), &bits(8, &[0, 1]));
        assert_eq!(aggregate.participants(), 2);
    }

    #[test]
    fn test_overlapping_bits_are_refused() {
        let mut aggregate = AttestationAggregate::create(&attestation(1, 2, &[0, 1]));
        let before = aggregate.clone();

        assert!(!aggregate.add(&attestation(1, 2, &[1])));
        assert_eq!(aggregate, before);
    }

    #[test]
    fn test_different_data_is_refused() {
        let mut aggregate = AttestationAggregate::create(&attestation(1, 2, &[0]));

        assert!(!aggregate.add(&attestation(1, 3, &[1])));
        assert_eq!(aggregate.participants(), 1);
    }

    #[test]
    fn test_different_committee_size_is_refused() {
        let mut aggregate = AttestationAggregate::create(&attestation(1, 2, &[0]));
        let mut other = attestation(1, 2, &[]);
        other.aggregation_bits = bits(16, &[9]);

        assert!(!aggregate.add(&other));
    }

    #[test]
    fn test_signatures_are_aggregated() {
        let message = b"attestation data root";
        let first_signature = PrivateKey::key_gen(&[1; 32]).unwrap().sign(message).unwrap();
        let second_signature = PrivateKey::key_gen(&[2; 32]).unwrap().sign(message).unwrap();

        let mut first = attestation(1, 2, &[0]);
        first.signature = first_signature.clone();
        let mut second = attestation(1, 2, &[5]);
        second.signature = second_signature.clone();

        let mut aggregate = AttestationAggregate::create(&first);
        assert!(aggregate.add(&second));

        let attestation = aggregate.into_attestation();
        assert_eq!(
            attestation.signature,
            BLSSignature::aggregate(&[&first_signature, &second_signature]).unwrap()
        );
        assert_eq!(attestation.aggregation_bits, bits(8, &[0, 5]));
    }

    #[test]
    fn test_unaggregatable_signature_leaves_aggregate_untouched() {
        let mut bytes = vec![0x01; 96];
        bytes[0] = 0x81;
        let mut malformed = attestation(1, 2, &[1]);
        malformed.signature = BLSSignature {
            inner: FixedVector::from(bytes),
        };

        let mut aggregate = AttestationAggregate::create(&attestation(1, 2, &[0]));
        let before = aggregate.clone();

        assert!(!aggregate.add(&malformed));
        assert_eq!(aggregate, before);
    }
}
