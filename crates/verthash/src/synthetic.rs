// Copyright 2025 Irreducible Inc.

//! A small deterministic datafile generator for tests, benchmarks and demos.
//!
//! Its output has the right shape but not the reference content, so it never verifies against
//! [`crate::DATAFILE_SHA256`]. Pair it with [`Sha3CounterGenerator::params`].

use std::{
	fs::File,
	io::{self, BufWriter, Write},
	path::Path,
};

use digest::Digest;
use sha2::Sha256;
use sha3::Sha3_256;
use verthash_utils::ensure;

use crate::{
	constants::HASH_OUT_SIZE,
	datafile::{datafile_seed, DatafileGenerator, DatafileParams},
	error::{Error, Result},
};

/// SHA3-256 in counter mode: block `i` of the datafile is `SHA3-256(seed || le64(i))`, for
/// `2^size_parameter` blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha3CounterGenerator;

impl Sha3CounterGenerator {
	/// Keeps the output within the 32-bit offset range of the hash engine.
	pub const MAX_SIZE_PARAMETER: u32 = 26;

	pub fn datafile_size(size_parameter: u32) -> u64 {
		(HASH_OUT_SIZE as u64) << size_parameter
	}

	/// Parameters for verifying this generator's output, using the reference seed.
	pub fn params(size_parameter: u32) -> DatafileParams {
		let seed = datafile_seed();
		let mut hasher = Sha256::new();
		Self::expand(size_parameter, &seed, &mut hasher)
			.expect("writing into a hasher never fails");
		DatafileParams {
			size_parameter,
			seed,
			expected_digest: hasher.finalize().into(),
		}
	}

	/// Streams the datafile contents into `writer`.
	pub fn expand(size_parameter: u32, seed: &[u8; 32], mut writer: impl Write) -> io::Result<()> {
		for counter in 0..1u64 << size_parameter {
			let block = Sha3_256::new()
				.chain_update(seed)
				.chain_update(counter.to_le_bytes())
				.finalize();
			writer.write_all(&block)?;
		}
		Ok(())
	}
}

impl DatafileGenerator for Sha3CounterGenerator {
	fn generate(&self, size_parameter: u32, seed: &[u8; 32], path: &Path) -> Result<()> {
		ensure!(
			size_parameter <= Self::MAX_SIZE_PARAMETER,
			Error::Generator(
				format!(
					"size parameter {size_parameter} exceeds {}",
					Self::MAX_SIZE_PARAMETER
				)
				.into()
			)
		);

		let mut writer = BufWriter::new(File::create(path)?);
		Self::expand(size_parameter, seed, &mut writer)?;
		let file = writer.into_inner().map_err(|err| err.into_error())?;
		file.sync_all()?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use assert_matches::assert_matches;

	use super::*;

	#[test]
	fn test_output_size_and_blocks() {
		let seed = [7u8; 32];
		let mut out = Vec::new();
		Sha3CounterGenerator::expand(4, &seed, &mut out).unwrap();

		assert_eq!(out.len() as u64, Sha3CounterGenerator::datafile_size(4));
		let mut preimage = seed.to_vec();
		preimage.extend_from_slice(&3u64.to_le_bytes());
		assert_eq!(&out[3 * 32..4 * 32], Sha3_256::digest(&preimage).as_slice());
	}

	#[test]
	fn test_generate_is_deterministic() {
		let dir = tempfile::tempdir().unwrap();
		let a = dir.path().join("a.dat");
		let b = dir.path().join("b.dat");
		let seed = datafile_seed();

		Sha3CounterGenerator.generate(6, &seed, &a).unwrap();
		Sha3CounterGenerator.generate(6, &seed, &b).unwrap();
		assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
	}

	#[test]
	fn test_params_digest_matches_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("verthash.dat");
		let params = Sha3CounterGenerator::params(6);

		Sha3CounterGenerator
			.generate(params.size_parameter, &params.seed, &path)
			.unwrap();
		let digest: [u8; 32] = Sha256::digest(std::fs::read(&path).unwrap()).into();
		assert_eq!(digest, params.expected_digest);
	}

	#[test]
	fn test_rejects_oversized_parameter() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("verthash.dat");
		assert_matches!(
			Sha3CounterGenerator.generate(40, &[0; 32], &path),
			Err(Error::Generator(_))
		);
		assert!(!path.exists());
	}
}
