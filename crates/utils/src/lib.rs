// Copyright 2024-2025 Irreducible Inc.

//! Ambient helpers shared by the Verthash crates: environment flags, early-return error macros
//! and tracing setup.

pub mod env;
pub mod error_utils;
pub mod tracing;
