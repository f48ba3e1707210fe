// Copyright 2025 Irreducible Inc.

//! Hashes hex-encoded inputs with Verthash.
//!
//! The reference datafile generator is not part of this workspace, so `--synthetic` swaps in the
//! SHA3 counter generator and its parameters. Digests over a synthetic datafile are only useful
//! for experimenting and do not match any other Verthash implementation.

use std::{path::PathBuf, time::Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use verthash::{
	synthetic::Sha3CounterGenerator, verify_datafile, DatafileManager, OpenMode, Verthash,
};
use verthash_utils::{env::boolean_env_flag_set, tracing::init_tracing};

#[derive(Debug, Parser)]
struct Args {
	/// Path of the datafile.
	#[arg(short, long, default_value = "verthash.dat")]
	datafile: PathBuf,
	/// Load the whole datafile into memory instead of reading it from disk per access.
	/// Defaults to the `VERTHASH_RESIDENT` environment flag.
	#[arg(short, long)]
	resident: bool,
	/// Generate a synthetic datafile of `32 << SIZE_PARAMETER` bytes if the datafile is missing
	/// or invalid.
	#[arg(long, value_name = "SIZE_PARAMETER", value_parser = clap::value_parser!(u32).range(1..=26))]
	synthetic: Option<u32>,
	/// Hex-encoded inputs, usually 80-byte block headers.
	#[arg(required = true)]
	inputs: Vec<String>,
}

fn main() -> Result<()> {
	init_tracing();

	let args = Args::parse();

	match args.synthetic {
		Some(size_parameter) => {
			DatafileManager::with_params(
				Sha3CounterGenerator,
				Sha3CounterGenerator::params(size_parameter),
			)
			.ensure(&args.datafile)?;
		}
		None => {
			if let Err(err) = verify_datafile(&args.datafile) {
				bail!(
					"{} is not the reference datafile ({err}); generate it first or pass --synthetic",
					args.datafile.display()
				);
			}
		}
	}

	let inputs = args
		.inputs
		.iter()
		.map(|input| hex::decode(input).with_context(|| format!("invalid hex input {input:?}")))
		.collect::<Result<Vec<_>>>()?;

	let mode = if args.resident || boolean_env_flag_set("VERTHASH_RESIDENT") {
		OpenMode::Resident
	} else {
		OpenMode::Paged
	};
	let start = Instant::now();
	let verthash = Verthash::open(&args.datafile, mode)?;
	info!(?mode, elapsed = ?start.elapsed(), "opened datafile");

	let start = Instant::now();
	let digests = verthash.par_hash(&inputs)?;
	info!(n_inputs = inputs.len(), elapsed = ?start.elapsed(), "hashed inputs");

	for (input, digest) in args.inputs.iter().zip(digests) {
		println!("{input} {}", hex::encode(digest));
	}

	verthash.close();
	Ok(())
}
