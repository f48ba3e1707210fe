// Copyright 2024-2025 Irreducible Inc.

use std::path::PathBuf;

/// Read boolean flag from the environment variable.
pub fn boolean_env_flag_set(flag: &str) -> bool {
	match std::env::var(flag) {
		Ok(val) => ["1", "on", "ON", "true", "TRUE", "yes", "YES"].contains(&val.as_str()),
		Err(_) => false,
	}
}

/// Read a filesystem path from the environment variable. Empty values count as unset.
pub fn env_path(var: &str) -> Option<PathBuf> {
	std::env::var_os(var)
		.filter(|val| !val.is_empty())
		.map(PathBuf::from)
}
