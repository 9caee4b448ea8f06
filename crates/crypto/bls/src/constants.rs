use alloy_primitives::hex;

pub const DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

pub const BLS_SIGNATURE_BYTES_LEN: usize = 96;

/// Flag bits carried in the most significant byte of a compressed point.
pub const COMPRESSION_FLAG: u8 = 0b1000_0000;
pub const INFINITY_FLAG: u8 = 0b0100_0000;
pub const SORT_FLAG: u8 = 0b0010_0000;

/// Base field modulus of BLS12-381, big-endian.
pub const FIELD_MODULUS: [u8; 48] = hex!(
    "1a0111ea397fe69a4b1ba7b6434bacd764774b84f38512bf6730d2a0f6b0f6241eabfffeb153ffffb9feffffffffaaab"
);
