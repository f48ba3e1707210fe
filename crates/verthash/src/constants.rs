// Copyright 2025 Irreducible Inc.

//! Protocol constants. Every implementation must agree on these values to produce the same digests.

use hex_literal::hex;
use static_assertions::const_assert_eq;

/// Size of a serialized block header, the usual hash input.
pub const HEADER_SIZE: usize = 80;
/// Size of the digest and of every datafile read.
pub const HASH_OUT_SIZE: usize = 32;
/// Size of one SHA3-512 block of the `p0` scratchpad.
pub const P0_SIZE: usize = 64;
/// Number of SHA3-512 rounds filling `p0`.
pub const ITERATIONS: usize = 8;
/// Size of the `p0` scratchpad in bytes.
pub const SUBSET: usize = P0_SIZE * ITERATIONS;
/// Number of rotated copies of the `p0` words making up the seek indexes.
pub const ROTATIONS: usize = 32;
/// Number of datafile reads per hash.
pub const INDEXES: usize = 4096;
/// Alignment of every datafile read offset.
pub const BYTE_ALIGNMENT: usize = 16;

/// Smallest datafile the offset arithmetic supports.
pub const MIN_DATAFILE_SIZE: u64 = (HASH_OUT_SIZE + BYTE_ALIGNMENT) as u64;
/// Largest datafile whose length fits the 32-bit offset arithmetic.
pub const MAX_DATAFILE_SIZE: u64 = u32::MAX as u64;

/// The SHA3-256 preimage of the datafile generator seed.
pub const DATAFILE_SEED_PHRASE: &[u8] = b"Verthash Proof-of-Space Datafile";
/// Size parameter passed to the datafile generator.
pub const DATAFILE_SIZE_PARAMETER: u32 = 17;
/// SHA-256 digest of the reference datafile.
pub const DATAFILE_SHA256: [u8; 32] =
	hex!("a55531e843cd56b010114aaf6325b0d529ecf88f8ad47639b6ededafd721aa48");

const_assert_eq!(SUBSET, 512);
const_assert_eq!((SUBSET / 4) * ROTATIONS, INDEXES);
const_assert_eq!(HASH_OUT_SIZE % 4, 0);
