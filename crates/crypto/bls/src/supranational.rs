pub mod errors;
pub mod private_key;
pub mod signature;
