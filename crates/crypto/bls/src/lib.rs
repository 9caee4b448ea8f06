pub mod constants;
pub mod errors;
pub mod private_key;
pub mod signature;
#[cfg(feature = "supranational")]
pub mod supranational;
pub mod traits;

pub use private_key::PrivateKey;
pub use signature::BLSSignature;
