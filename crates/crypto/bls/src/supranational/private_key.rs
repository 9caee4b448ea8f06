use alloy_primitives::B256;
use blst::min_pk::SecretKey as BlstSecretKey;

use crate::{
    PrivateKey,
    constants::DST,
    errors::BLSError,
    signature::BLSSignature,
    traits::Signable,
};

impl PrivateKey {
    /// Derives a key from input keying material (at least 32 bytes).
    pub fn key_gen(ikm: &[u8]) -> Result<Self, BLSError> {
        let secret_key =
            BlstSecretKey::key_gen(ikm, &[]).map_err(|err| BLSError::BlstError(err.into()))?;
        Ok(Self {
            inner: B256::from(secret_key.to_bytes()),
        })
    }

    pub fn to_blst_secret_key(&self) -> Result<BlstSecretKey, BLSError> {
        BlstSecretKey::from_bytes(self.inner.as_slice())
            .map_err(|err| BLSError::BlstError(err.into()))
    }
}

impl Signable for PrivateKey {
    type Error = BLSError;

    fn sign(&self, message: &[u8]) -> Result<BLSSignature, Self::Error> {
        let signature = self.to_blst_secret_key()?.sign(message, DST, &[]);
        BLSSignature::try_from(signature)
    }
}
