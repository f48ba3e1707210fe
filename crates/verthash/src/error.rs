// Copyright 2025 Irreducible Inc.

use std::io;

/// Errors from the datafile lifecycle, the datafile stores and the hash engine.
///
/// None of these is recoverable inside a hash call: a digest computed over a failed read is never
/// returned.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("datafile I/O error: {0}")]
	Io(#[from] io::Error),
	#[error(
		"datafile has wrong SHA-256 digest: {} vs expected {}",
		hex::encode(.actual),
		hex::encode(.expected)
	)]
	DigestMismatch {
		actual: [u8; 32],
		expected: [u8; 32],
	},
	#[error("datafile of {size} bytes is too small, need at least {min} bytes")]
	DatafileTooSmall { size: u64, min: u64 },
	#[error("datafile of {size} bytes exceeds the 32-bit offset range")]
	DatafileTooLarge { size: u64 },
	#[error("could not create or verify the datafile: {source}")]
	CannotProduceDatafile { source: Box<Error> },
	#[error("datafile generator failed: {0}")]
	Generator(Box<dyn std::error::Error + Send + Sync>),
	#[error("paged datafile handle was poisoned by a panicking reader")]
	StorePoisoned,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
