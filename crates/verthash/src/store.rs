// Copyright 2025 Irreducible Inc.

//! Random-access stores over a verified datafile.
//!
//! A store is opened once and shared read-only by every hash computed over it. The resident
//! backend owns the whole datafile in memory; the paged backend keeps an open file handle and
//! reads each 32-byte window from disk. Dropping a store releases its buffer or handle.

use std::{
	fs::{self, File},
	io::{Read, Seek, SeekFrom},
	path::Path,
	sync::Mutex,
};

use auto_impl::auto_impl;
use tracing::instrument;

use crate::error::{Error, Result};

/// Bounded reads from an immutable datafile.
#[auto_impl(&, Box, Arc)]
pub trait DatafileStore: Send + Sync {
	/// Length of the underlying datafile in bytes.
	fn size(&self) -> u64;

	/// Fills `buf` with the datafile bytes starting at `offset`.
	///
	/// The caller guarantees `offset + buf.len() <= self.size()`. Stores do not re-check this.
	fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()>;
}

/// How to open a [`Datafile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
	/// Load the whole datafile into memory.
	Resident,
	/// Read from the file on every access.
	Paged,
}

/// A datafile fully loaded into memory.
#[derive(Debug, Clone)]
pub struct ResidentStore {
	data: Vec<u8>,
}

impl ResidentStore {
	#[instrument(skip_all, fields(path = %path.as_ref().display()), level = "debug")]
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		Ok(Self::from_bytes(fs::read(path)?))
	}

	pub fn from_bytes(data: Vec<u8>) -> Self {
		Self { data }
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.data
	}
}

impl DatafileStore for ResidentStore {
	fn size(&self) -> u64 {
		self.data.len() as u64
	}

	#[inline]
	fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
		let start = offset as usize;
		buf.copy_from_slice(&self.data[start..start + buf.len()]);
		Ok(())
	}
}

/// A datafile read through an open file handle.
///
/// The handle is shared by all readers, so every seek and the read following it happen under one
/// lock.
#[derive(Debug)]
pub struct PagedStore {
	file: Mutex<File>,
	size: u64,
}

impl PagedStore {
	#[instrument(skip_all, fields(path = %path.as_ref().display()), level = "debug")]
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		Self::from_file(File::open(path)?)
	}

	pub fn from_file(file: File) -> Result<Self> {
		let size = file.metadata()?.len();
		Ok(Self {
			file: Mutex::new(file),
			size,
		})
	}
}

impl DatafileStore for PagedStore {
	fn size(&self) -> u64 {
		self.size
	}

	fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
		let mut file = self.file.lock().map_err(|_| Error::StorePoisoned)?;
		file.seek(SeekFrom::Start(offset))?;
		file.read_exact(buf)?;
		Ok(())
	}
}

/// A datafile store with its backend chosen at open time.
#[derive(Debug)]
pub enum Datafile {
	Resident(ResidentStore),
	Paged(PagedStore),
}

impl Datafile {
	pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> Result<Self> {
		match mode {
			OpenMode::Resident => ResidentStore::open(path).map(Self::Resident),
			OpenMode::Paged => PagedStore::open(path).map(Self::Paged),
		}
	}

	pub fn mode(&self) -> OpenMode {
		match self {
			Self::Resident(_) => OpenMode::Resident,
			Self::Paged(_) => OpenMode::Paged,
		}
	}

	/// Releases the buffer or file handle. The store cannot be used afterwards.
	pub fn close(self) {
		drop(self)
	}
}

impl DatafileStore for Datafile {
	fn size(&self) -> u64 {
		match self {
			Self::Resident(store) => store.size(),
			Self::Paged(store) => store.size(),
		}
	}

	#[inline]
	fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
		match self {
			Self::Resident(store) => store.read_exact_at(offset, buf),
			Self::Paged(store) => store.read_exact_at(offset, buf),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use assert_matches::assert_matches;
	use rand::{rngs::StdRng, RngCore, SeedableRng};
	use tempfile::NamedTempFile;

	use super::*;

	fn random_datafile(len: usize) -> (NamedTempFile, Vec<u8>) {
		let mut rng = StdRng::seed_from_u64(0);
		let mut data = vec![0u8; len];
		rng.fill_bytes(&mut data);

		let mut file = NamedTempFile::new().unwrap();
		file.write_all(&data).unwrap();
		file.flush().unwrap();
		(file, data)
	}

	#[test]
	fn test_backends_read_same_bytes() {
		let (file, data) = random_datafile(4096);
		let resident = Datafile::open(file.path(), OpenMode::Resident).unwrap();
		let paged = Datafile::open(file.path(), OpenMode::Paged).unwrap();

		assert_eq!(resident.mode(), OpenMode::Resident);
		assert_eq!(paged.mode(), OpenMode::Paged);
		assert_eq!(resident.size(), 4096);
		assert_eq!(paged.size(), 4096);

		for offset in [0u64, 16, 1000, 4096 - 32] {
			let mut a = [0u8; 32];
			let mut b = [0u8; 32];
			resident.read_exact_at(offset, &mut a).unwrap();
			paged.read_exact_at(offset, &mut b).unwrap();
			assert_eq!(a, b);
			assert_eq!(&a[..], &data[offset as usize..offset as usize + 32]);
		}

		resident.close();
		paged.close();
	}

	#[test]
	fn test_paged_read_past_end_fails() {
		let (file, _) = random_datafile(64);
		let paged = PagedStore::open(file.path()).unwrap();

		let mut buf = [0u8; 32];
		assert_matches!(paged.read_exact_at(48, &mut buf), Err(Error::Io(_)));
	}

	#[test]
	fn test_open_missing_file_fails() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("missing.dat");

		assert_matches!(Datafile::open(&path, OpenMode::Resident), Err(Error::Io(_)));
		assert_matches!(Datafile::open(&path, OpenMode::Paged), Err(Error::Io(_)));
	}

	#[test]
	fn test_store_through_reference() {
		let store = ResidentStore::from_bytes((0..=255).collect());
		let by_ref: &dyn DatafileStore = &&store;

		let mut buf = [0u8; 4];
		by_ref.read_exact_at(100, &mut buf).unwrap();
		assert_eq!(buf, [100, 101, 102, 103]);
		assert_eq!(by_ref.size(), 256);
	}
}
