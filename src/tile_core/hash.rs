//! Stateless coordinate hashing.
//!
//! Every "random" choice in the tile engine (material variant, border
//! variant) is derived from grid position alone, so any chunk can be
//! regenerated in isolation and still agree with its neighbours.

/// Default seed, the 32-bit golden ratio.
pub const DEFAULT_SEED: u32 = 0x9E37_79B9;

const MIX_X: u32 = 0x85EB_CA6B;
const MIX_Y: u32 = 0xC2B2_AE35;

/// Maps 0, -1, 1, -2, 2, ... to 0, 1, 2, 3, 4, ...
pub fn zigzag32(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

pub fn xorshift32(mut s: u32) -> u32 {
    s ^= s << 13;
    s ^= s >> 17;
    s ^= s << 5;
    s
}

pub fn hash2d(x: i32, y: i32, seed: u32) -> u32 {
    let state = seed
        .wrapping_add(MIX_X.wrapping_mul(zigzag32(x)))
        .wrapping_add(MIX_Y.wrapping_mul(zigzag32(y)));
    xorshift32(state)
}

/// Hash of `(x, y)` mapped to `[0, 1)`.
pub fn hash2d_unit(x: i32, y: i32, seed: u32) -> f64 {
    f64::from(hash2d(x, y, seed)) / 4_294_967_296.0
}

/// [`hash2d_unit`] with [`DEFAULT_SEED`].
pub fn coordinate_hash(x: i32, y: i32) -> f64 {
    hash2d_unit(x, y, DEFAULT_SEED)
}
