use thiserror::Error;

#[cfg(feature = "supranational")]
use crate::supranational::errors::BlstError;

#[derive(Error, PartialEq, Eq, Debug)]
pub enum BLSError {
    #[cfg(feature = "supranational")]
    #[error("blst error: {0}")]
    BlstError(#[from] BlstError),
    #[error("invalid byte length")]
    InvalidByteLength,
    #[error("invalid hex string")]
    InvalidHexString,
    #[error("invalid private key")]
    InvalidPrivateKey,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("cannot aggregate an empty set of signatures")]
    EmptyAggregate,
}
