use std::str::FromStr;

use alloy_primitives::hex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ssz_derive::{Decode, Encode};
use ssz_types::{FixedVector, typenum::U96};
use tree_hash_derive::TreeHash;

use crate::{
    constants::{
        BLS_SIGNATURE_BYTES_LEN, COMPRESSION_FLAG, FIELD_MODULUS, INFINITY_FLAG, SORT_FLAG,
    },
    errors::BLSError,
};

/// A compressed G2 point as it travels on the wire.
#[derive(Debug, PartialEq, Clone, Encode, Decode, TreeHash, Default, Eq, Hash)]
pub struct BLSSignature {
    pub inner: FixedVector<u8, U96>,
}

impl BLSSignature {
    /// The compressed encoding of the point at infinity, the identity of signature aggregation.
    pub fn infinity() -> Self {
        let mut bytes = vec![0u8; BLS_SIGNATURE_BYTES_LEN];
        bytes[0] = COMPRESSION_FLAG | INFINITY_FLAG;
        Self {
            inner: FixedVector::from(bytes),
        }
    }

    pub fn to_bytes(&self) -> &[u8] {
        self.inner.iter().as_slice()
    }

    /// Checks that the bytes are a well-formed compressed G2 encoding without touching the
    /// curve: length, flag bits and both coordinates below the field modulus. Passing this
    /// check says nothing about whether the signature verifies.
    pub fn has_valid_encoding(&self) -> bool {
        let bytes = self.to_bytes();
        if bytes.len() != BLS_SIGNATURE_BYTES_LEN {
            return false;
        }

        let flags = bytes[0];
        if flags & COMPRESSION_FLAG == 0 {
            return false;
        }

        if flags & INFINITY_FLAG != 0 {
            return flags & SORT_FLAG == 0
                && flags & !(COMPRESSION_FLAG | INFINITY_FLAG) == 0
                && bytes[1..].iter().all(|byte| *byte == 0);
        }

        let mut x_c1 = [0u8; 48];
        x_c1.copy_from_slice(&bytes[..48]);
        x_c1[0] &= !(COMPRESSION_FLAG | INFINITY_FLAG | SORT_FLAG);

        x_c1 < FIELD_MODULUS && bytes[48..] < FIELD_MODULUS[..]
    }
}

impl Serialize for BLSSignature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("0x{}", hex::encode(self.to_bytes())))
    }
}

impl<'de> Deserialize<'de> for BLSSignature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let result: String = Deserialize::deserialize(deserializer)?;
        BLSSignature::from_str(&result).map_err(serde::de::Error::custom)
    }
}

impl FromStr for BLSSignature {
    type Err = BLSError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let clean_str = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(clean_str).map_err(|_| BLSError::InvalidHexString)?;

        if bytes.len() != BLS_SIGNATURE_BYTES_LEN {
            return Err(BLSError::InvalidByteLength);
        }

        Ok(BLSSignature {
            inner: FixedVector::from(bytes),
        })
    }
}
