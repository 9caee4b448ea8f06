use blst::min_pk::{AggregateSignature as BlstAggregateSignature, Signature as BlstSignature};
use ssz_types::FixedVector;

use crate::{errors::BLSError, signature::BLSSignature, traits::Aggregatable};

impl BLSSignature {
    pub fn to_blst_signature(&self) -> Result<BlstSignature, BLSError> {
        BlstSignature::from_bytes(self.to_bytes()).map_err(|err| BLSError::BlstError(err.into()))
    }
}

impl TryFrom<BlstSignature> for BLSSignature {
    type Error = BLSError;

    fn try_from(value: BlstSignature) -> Result<Self, Self::Error> {
        Ok(BLSSignature {
            inner: FixedVector::new(value.to_bytes().to_vec())
                .map_err(|_| BLSError::InvalidSignature)?,
        })
    }
}

impl Aggregatable<BLSSignature> for BLSSignature {
    type Error = BLSError;

    fn aggregate(signatures: &[&BLSSignature]) -> Result<BLSSignature, BLSError> {
        if signatures.is_empty() {
            return Err(BLSError::EmptyAggregate);
        }

        let signatures = signatures
            .iter()
            .map(|signature| signature.to_blst_signature())
            .collect::<Result<Vec<_>, _>>()?;
        let aggregate_signature =
            BlstAggregateSignature::aggregate(&signatures.iter().collect::<Vec<_>>(), true)
                .map_err(|err| BLSError::BlstError(err.into()))?;

        BLSSignature::try_from(aggregate_signature.to_signature())
    }
}
