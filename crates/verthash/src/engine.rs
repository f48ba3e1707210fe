// Copyright 2025 Irreducible Inc.

use std::{array, path::Path};

use digest::Digest;
use rayon::prelude::*;
use sha3::{Sha3_256, Sha3_512};
use tracing::instrument;
use verthash_utils::ensure;

use crate::{
	constants::{
		BYTE_ALIGNMENT, HASH_OUT_SIZE, HEADER_SIZE, INDEXES, ITERATIONS, MAX_DATAFILE_SIZE,
		MIN_DATAFILE_SIZE, P0_SIZE, ROTATIONS, SUBSET,
	},
	error::{Error, Result},
	fnv::{fnv1a, FNV_OFFSET_BASIS},
	store::{Datafile, DatafileStore, OpenMode},
};

const P0_WORDS: usize = SUBSET / 4;
const OUT_WORDS: usize = HASH_OUT_SIZE / 4;

/// The Verthash hash engine bound to one datafile store.
///
/// The store is only read, so a single `Verthash` can serve any number of concurrent hash calls.
#[derive(Debug)]
pub struct Verthash<S = Datafile> {
	store: S,
	seek_divisor: u32,
}

impl Verthash<Datafile> {
	/// Opens the datafile at `path`. The file is expected to be verified already, see
	/// [`crate::DatafileManager::ensure`].
	pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> Result<Self> {
		Self::new(Datafile::open(path, mode)?)
	}
}

impl<S: DatafileStore> Verthash<S> {
	pub fn new(store: S) -> Result<Self> {
		let seek_divisor = seek_divisor(store.size())?;
		Ok(Self {
			store,
			seek_divisor,
		})
	}

	pub fn store(&self) -> &S {
		&self.store
	}

	pub fn into_store(self) -> S {
		self.store
	}

	/// Releases the underlying store.
	pub fn close(self) {
		drop(self.store)
	}

	pub fn hash(&self, input: &[u8]) -> Result<[u8; HASH_OUT_SIZE]> {
		Scratchpad::new(input).mix(&self.store, self.seek_divisor)
	}

	pub fn hash_header(&self, header: &[u8; HEADER_SIZE]) -> Result<[u8; HASH_OUT_SIZE]> {
		self.hash(header)
	}

	/// Hashes every input concurrently over the shared store. Fails with the first error any
	/// input hits.
	#[instrument(
		skip_all,
		fields(n_inputs = inputs.len()),
		name = "verthash::par_hash",
		level = "debug"
	)]
	pub fn par_hash<I>(&self, inputs: &[I]) -> Result<Vec<[u8; HASH_OUT_SIZE]>>
	where
		I: AsRef<[u8]> + Sync,
	{
		inputs
			.par_iter()
			.map(|input| self.hash(input.as_ref()))
			.collect()
	}
}

/// Computes the Verthash digest of `input` over `store`.
///
/// Unlike [`Verthash::hash`], this checks the store size on every call.
pub fn verthash<S>(input: &[u8], store: &S) -> Result<[u8; HASH_OUT_SIZE]>
where
	S: DatafileStore + ?Sized,
{
	let seek_divisor = seek_divisor(store.size())?;
	Scratchpad::new(input).mix(store, seek_divisor)
}

/// Number of [`BYTE_ALIGNMENT`]-aligned offsets at which a [`HASH_OUT_SIZE`] read stays inside a
/// datafile of `size` bytes.
pub(crate) fn seek_divisor(size: u64) -> Result<u32> {
	ensure!(
		size >= MIN_DATAFILE_SIZE,
		Error::DatafileTooSmall {
			size,
			min: MIN_DATAFILE_SIZE
		}
	);
	ensure!(size <= MAX_DATAFILE_SIZE, Error::DatafileTooLarge { size });

	let divisor = (size - HASH_OUT_SIZE as u64) / BYTE_ALIGNMENT as u64 + 1;
	Ok(divisor as u32)
}

#[inline(always)]
pub(crate) fn seek_offset(seek_index: u32, accumulator: u32, seek_divisor: u32) -> u64 {
	(fnv1a(seek_index, accumulator) % seek_divisor) as u64 * BYTE_ALIGNMENT as u64
}

/// Per-call working state, derived from the input before any datafile access.
pub(crate) struct Scratchpad {
	p1: [u8; HASH_OUT_SIZE],
	seek_indexes: [u32; INDEXES],
}

impl Scratchpad {
	pub(crate) fn new(input: &[u8]) -> Self {
		let p1 = Sha3_256::digest(input).into();
		let p0 = expand_p0(input);
		let seek_indexes = expand_seek_indexes(le_words(&p0));
		Self { p1, seek_indexes }
	}

	/// Folds [`INDEXES`] datafile reads into `p1`. Every read offset depends on all previous
	/// reads through the accumulator.
	pub(crate) fn mix<S: DatafileStore + ?Sized>(
		&self,
		store: &S,
		seek_divisor: u32,
	) -> Result<[u8; HASH_OUT_SIZE]> {
		let mut state: [u32; OUT_WORDS] = le_words(&self.p1);
		let mut accumulator = FNV_OFFSET_BASIS;
		let mut data = [0u8; HASH_OUT_SIZE];

		for &seek_index in &self.seek_indexes {
			let offset = seek_offset(seek_index, accumulator, seek_divisor);
			store.read_exact_at(offset, &mut data)?;

			let words: [u32; OUT_WORDS] = le_words(&data);
			for (word, value) in state.iter_mut().zip(words) {
				*word = fnv1a(*word, value);
				accumulator = fnv1a(accumulator, value);
			}
		}

		let mut out = [0u8; HASH_OUT_SIZE];
		for (chunk, word) in out.chunks_exact_mut(4).zip(state) {
			chunk.copy_from_slice(&word.to_le_bytes());
		}
		Ok(out)
	}
}

/// Fills the `p0` scratchpad with [`ITERATIONS`] SHA3-512 digests, incrementing the first input
/// byte (wrapping) before each one. An empty input is hashed unmodified every round.
pub(crate) fn expand_p0(input: &[u8]) -> [u8; SUBSET] {
	let mut input = input.to_vec();
	let mut p0 = [0u8; SUBSET];
	for block in p0.chunks_exact_mut(P0_SIZE) {
		if let Some(first) = input.first_mut() {
			*first = first.wrapping_add(1);
		}
		block.copy_from_slice(&Sha3_512::digest(&input));
	}
	debug_assert_eq!(p0.len() / P0_SIZE, ITERATIONS);
	p0
}

/// Lays out [`ROTATIONS`] copies of the `p0` words, copy `x` rotated left by `x` bits.
pub(crate) fn expand_seek_indexes(mut p0_index: [u32; P0_WORDS]) -> [u32; INDEXES] {
	let mut seek_indexes = [0u32; INDEXES];
	for block in seek_indexes.chunks_exact_mut(P0_WORDS) {
		block.copy_from_slice(&p0_index);
		for word in &mut p0_index {
			*word = word.rotate_left(1);
		}
	}
	debug_assert_eq!(seek_indexes.len() / P0_WORDS, ROTATIONS);
	seek_indexes
}

fn le_words<const N: usize>(bytes: &[u8]) -> [u32; N] {
	debug_assert_eq!(bytes.len(), N * 4);
	array::from_fn(|i| {
		u32::from_le_bytes([bytes[4 * i], bytes[4 * i + 1], bytes[4 * i + 2], bytes[4 * i + 3]])
	})
}
