//! Fixture file format definitions.
//!
//! Fixture files hold MongoDB Extended JSON (v2): a JSON array with one
//! entry per document. Extended JSON wraps the types plain JSON cannot carry
//! (dates, binary data, 64-bit and decimal numbers, object ids) in `$`-keyed
//! objects, so documents survive a write and read unchanged.
//!
//! # Example
//!
//! ```json
//! [
//!   {
//!     "_id": { "$oid": "65a1f0c2e4b0a1b2c3d4e5f6" },
//!     "user_name": "alan",
//!     "joined": { "$date": { "$numberLong": "1700000000000" } }
//!   }
//! ]
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File extension for fixture files.
pub const FIXTURE_EXTENSION: &str = "json";

/// Directory used when a fixture does not set a path.
pub const DEFAULT_FIXTURE_DIR: &str = "./test";

/// Extended JSON flavour used when writing fixture files.
///
/// Reading accepts either flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtJsonMode {
	/// Every value keeps its exact BSON type (default).
	#[default]
	Canonical,

	/// Numbers and recent dates are written as plain JSON where possible.
	///
	/// Integer width and double-vs-integer distinctions are not preserved.
	Relaxed,
}

impl ExtJsonMode {
	/// Parses a mode name (`canonical` or `relaxed`, case-insensitive).
	///
	/// # Example
	///
	/// ```
	/// # use fixtura_core::format::ExtJsonMode;
	/// assert_eq!(ExtJsonMode::from_name("Relaxed"), Some(ExtJsonMode::Relaxed));
	/// assert_eq!(ExtJsonMode::from_name("yaml"), None);
	/// ```
	pub fn from_name(name: &str) -> Option<Self> {
		match name.to_lowercase().as_str() {
			"canonical" => Some(Self::Canonical),
			"relaxed" => Some(Self::Relaxed),
			_ => None,
		}
	}

	/// Returns true if every BSON type round-trips exactly.
	pub fn is_lossless(&self) -> bool {
		matches!(self, Self::Canonical)
	}
}

impl fmt::Display for ExtJsonMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Canonical => write!(f, "canonical"),
			Self::Relaxed => write!(f, "relaxed"),
		}
	}
}

/// Computes the file backing a binding.
///
/// Returns `"{dir}/{binding}.json"`, where `dir` is `fixture_path` or
/// [`DEFAULT_FIXTURE_DIR`] when unset.
///
/// # Example
///
/// ```
/// # use fixtura_core::format::compute_file_path;
/// # use std::path::{Path, PathBuf};
/// assert_eq!(
///     compute_file_path(None, "users.accounts"),
///     PathBuf::from("./test/users.accounts.json")
/// );
/// assert_eq!(
///     compute_file_path(Some(Path::new("fixtures")), "users.accounts"),
///     PathBuf::from("fixtures/users.accounts.json")
/// );
/// ```
pub fn compute_file_path(fixture_path: Option<&Path>, binding_name: &str) -> PathBuf {
	let dir = fixture_path.unwrap_or_else(|| Path::new(DEFAULT_FIXTURE_DIR));
	// Binding names contain dots, so the extension is appended rather than
	// set with `with_extension`.
	dir.join(format!("{}.{}", binding_name, FIXTURE_EXTENSION))
}
