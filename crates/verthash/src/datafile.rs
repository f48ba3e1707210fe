// Copyright 2025 Irreducible Inc.

//! Datafile lifecycle: creation through an injected generator, SHA-256 verification, and the
//! regenerate-once recovery of [`DatafileManager::ensure`].

use std::{
	fs::{self, File},
	io::{self, BufReader},
	path::Path,
};

use auto_impl::auto_impl;
use digest::Digest;
use sha2::Sha256;
use sha3::Sha3_256;
use tracing::{info, instrument, warn};

use crate::{
	constants::{DATAFILE_SEED_PHRASE, DATAFILE_SHA256, DATAFILE_SIZE_PARAMETER},
	error::{Error, Result},
};

/// Produces the datafile contents.
///
/// Implementations must be deterministic: the same size parameter and seed always give
/// byte-identical files. Only a generator reproducing the reference construction yields files
/// matching [`DATAFILE_SHA256`].
#[auto_impl(&, Box, Arc)]
pub trait DatafileGenerator {
	/// Writes the datafile for `(size_parameter, seed)` to `path`, replacing any existing file.
	fn generate(&self, size_parameter: u32, seed: &[u8; 32], path: &Path) -> Result<()>;
}

/// The inputs of datafile generation and the digest its output must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatafileParams {
	pub size_parameter: u32,
	pub seed: [u8; 32],
	pub expected_digest: [u8; 32],
}

impl DatafileParams {
	/// The parameters every Verthash implementation uses.
	pub fn reference() -> Self {
		Self {
			size_parameter: DATAFILE_SIZE_PARAMETER,
			seed: datafile_seed(),
			expected_digest: DATAFILE_SHA256,
		}
	}
}

impl Default for DatafileParams {
	fn default() -> Self {
		Self::reference()
	}
}

/// SHA3-256 of [`DATAFILE_SEED_PHRASE`].
pub fn datafile_seed() -> [u8; 32] {
	Sha3_256::digest(DATAFILE_SEED_PHRASE).into()
}

/// Keeps a datafile present and valid.
///
/// Concurrent lifecycle operations on the same path, from this or another process, are not
/// coordinated and must be serialized by the caller.
#[derive(Debug, Clone)]
pub struct DatafileManager<G> {
	generator: G,
	params: DatafileParams,
}

impl<G: DatafileGenerator> DatafileManager<G> {
	pub fn new(generator: G) -> Self {
		Self::with_params(generator, DatafileParams::reference())
	}

	pub fn with_params(generator: G, params: DatafileParams) -> Self {
		Self { generator, params }
	}

	pub fn params(&self) -> &DatafileParams {
		&self.params
	}

	pub fn generator(&self) -> &G {
		&self.generator
	}

	/// Makes sure a verified datafile exists at `path`.
	///
	/// A missing file is generated. If verification then fails, the file is deleted, generated
	/// again and verified a second time; a second failure is returned as
	/// [`Error::CannotProduceDatafile`].
	#[instrument(skip_all, fields(path = %path.as_ref().display()), name = "datafile::ensure")]
	pub fn ensure(&self, path: impl AsRef<Path>) -> Result<()> {
		let path = path.as_ref();

		let err = match self.create_if_missing(path).and_then(|_| self.verify(path)) {
			Ok(()) => return Ok(()),
			Err(err) => err,
		};
		warn!(%err, "datafile is not valid, regenerating");

		self.regenerate(path)
			.map_err(|source| Error::CannotProduceDatafile {
				source: Box::new(source),
			})
	}

	fn regenerate(&self, path: &Path) -> Result<()> {
		remove_if_exists(path)?;
		self.create(path)?;
		self.verify(path)
	}

	/// Generates the datafile at `path` unless a file already exists there. Returns whether a
	/// file was generated. The existing file is not verified.
	pub fn create_if_missing(&self, path: impl AsRef<Path>) -> Result<bool> {
		let path = path.as_ref();
		if path.try_exists()? {
			return Ok(false);
		}
		self.create(path)?;
		Ok(true)
	}

	/// Generates the datafile at `path`, overwriting whatever is there.
	#[instrument(skip_all, fields(path = %path.as_ref().display()), name = "datafile::create")]
	pub fn create(&self, path: impl AsRef<Path>) -> Result<()> {
		let path = path.as_ref();
		info!(size_parameter = self.params.size_parameter, "generating datafile");
		self.generator
			.generate(self.params.size_parameter, &self.params.seed, path)
	}

	/// Checks the SHA-256 digest of the file at `path`.
	#[instrument(skip_all, fields(path = %path.as_ref().display()), name = "datafile::verify")]
	pub fn verify(&self, path: impl AsRef<Path>) -> Result<()> {
		let actual = file_sha256(path.as_ref())?;
		if actual != self.params.expected_digest {
			return Err(Error::DigestMismatch {
				actual,
				expected: self.params.expected_digest,
			});
		}
		info!("datafile verified");
		Ok(())
	}
}

/// Generates the reference datafile at `path`.
pub fn create_datafile(path: impl AsRef<Path>, generator: impl DatafileGenerator) -> Result<()> {
	DatafileManager::new(generator).create(path)
}

/// Checks the file at `path` against [`DATAFILE_SHA256`].
pub fn verify_datafile(path: impl AsRef<Path>) -> Result<()> {
	let actual = file_sha256(path.as_ref())?;
	if actual != DATAFILE_SHA256 {
		return Err(Error::DigestMismatch {
			actual,
			expected: DATAFILE_SHA256,
		});
	}
	Ok(())
}

/// Makes sure a verified reference datafile exists at `path`, see [`DatafileManager::ensure`].
pub fn ensure_datafile(path: impl AsRef<Path>, generator: impl DatafileGenerator) -> Result<()> {
	DatafileManager::new(generator).ensure(path)
}

fn file_sha256(path: &Path) -> Result<[u8; 32]> {
	let mut reader = BufReader::with_capacity(1 << 20, File::open(path)?);
	let mut hasher = Sha256::new();
	io::copy(&mut reader, &mut hasher)?;
	Ok(hasher.finalize().into())
}

fn remove_if_exists(path: &Path) -> Result<()> {
	match fs::remove_file(path) {
		Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err.into()),
		_ => Ok(()),
	}
}
