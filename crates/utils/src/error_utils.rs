// Copyright 2024-2025 Irreducible Inc.

/// Returns early with the given error, converted with `Into`.
///
/// With the `bail_panic` feature enabled the error panics instead, which keeps the backtrace of
/// the failing check when debugging.
#[cfg(feature = "bail_panic")]
#[macro_export]
macro_rules! bail {
	($err:expr) => {
		panic!("{}", $err);
	};
}

#[cfg(not(feature = "bail_panic"))]
#[macro_export]
macro_rules! bail {
	($err:expr) => {
		return Err($err.into());
	};
}

/// Returns early with the given error unless the condition holds.
#[macro_export]
macro_rules! ensure {
	($cond:expr, $err:expr) => {
		if !$cond {
			$crate::bail!($err);
		}
	};
}

#[cfg(all(test, not(feature = "bail_panic")))]
mod tests {
	#[derive(Debug, PartialEq, Eq, thiserror::Error)]
	enum Error {
		#[error("value {0} is odd")]
		Odd(u32),
	}

	fn halve(value: u32) -> Result<u32, Error> {
		ensure!(value % 2 == 0, Error::Odd(value));
		Ok(value / 2)
	}

	#[test]
	fn test_ensure_passes_through() {
		assert_eq!(halve(8), Ok(4));
	}

	#[test]
	fn test_ensure_returns_error() {
		assert_eq!(halve(7), Err(Error::Odd(7)));
	}
}
