// Copyright 2025 Irreducible Inc.

//! FNV-1a mixing of two 32-bit words.

/// FNV-1a 32-bit offset basis.
pub const FNV_OFFSET_BASIS: u32 = 0x811c9dc5;
/// FNV-1a 32-bit prime.
pub const FNV_PRIME: u32 = 0x01000193;

/// One FNV-1a step applied to a whole 32-bit word instead of a single byte.
#[inline(always)]
pub const fn fnv1a(a: u32, b: u32) -> u32 {
	(a ^ b).wrapping_mul(FNV_PRIME)
}
