pub const GENESIS_EPOCH: u64 = 0;
pub const GENESIS_SLOT: u64 = 0;
pub const MAX_ATTESTATIONS: u64 = 128;
pub const MAX_COMMITTEES_PER_SLOT: u64 = 64;
pub const MAX_VALIDATORS_PER_COMMITTEE: u64 = 2048;
pub const MIN_ATTESTATION_INCLUSION_DELAY: u64 = 1;
pub const SECONDS_PER_SLOT: u64 = 12;
pub const SLOTS_PER_EPOCH: u64 = 32;
