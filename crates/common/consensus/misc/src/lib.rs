#![warn(clippy::unwrap_used)]

pub mod attestation;
pub mod attestation_data;
pub mod beacon_block;
pub mod beacon_state;
pub mod checkpoint;
pub mod constants;
pub mod misc;
pub mod pending_attestation;
