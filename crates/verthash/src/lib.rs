// Copyright 2025 Irreducible Inc.

//! Verthash, a memory-hard proof-of-work hash over a large deterministic datafile.
//!
//! Every digest depends on [`INDEXES`] pseudo-random 32-byte reads from the datafile, so the cost
//! of a hash is dominated by memory latency rather than arithmetic. The crate provides
//!
//! - [`DatafileManager`], which makes sure a datafile exists and matches the known SHA-256
//!   digest, regenerating it through an injected [`DatafileGenerator`] when it does not,
//! - [`Datafile`], the store over a verified datafile, either resident in memory or paged from
//!   disk,
//! - [`Verthash`], the hash engine itself.
//!
//! ```no_run
//! use verthash::{OpenMode, Verthash};
//!
//! let verthash = Verthash::open("verthash.dat", OpenMode::Resident)?;
//! let digest = verthash.hash(b"block header bytes")?;
//! # Ok::<(), verthash::Error>(())
//! ```

pub mod constants;
pub mod datafile;
mod engine;
mod error;
pub mod fnv;
pub mod store;
pub mod synthetic;

pub use constants::*;
pub use datafile::{
	create_datafile, ensure_datafile, verify_datafile, DatafileGenerator, DatafileManager,
	DatafileParams,
};
pub use engine::{verthash, Verthash};
pub use error::*;
pub use store::{Datafile, DatafileStore, OpenMode, PagedStore, ResidentStore};
