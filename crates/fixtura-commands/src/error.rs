//! Error types for the command-line interface.

use std::path::PathBuf;

use fixtura_core::{CollectionError, FixtureError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
	/// The settings file is malformed.
	#[error("Settings error in {}: {message}", .path.display())]
	Settings {
		/// Settings file being read.
		path: PathBuf,
		/// What went wrong.
		message: String,
	},

	/// The settings file could not be read.
	#[error("IO error on {}: {source}", .path.display())]
	Io {
		/// Settings file being read.
		path: PathBuf,
		/// Underlying error.
		#[source]
		source: std::io::Error,
	},

	/// The database client could not be created.
	#[error("Connection error: {0}")]
	Connection(#[from] CollectionError),

	/// A fixture failed to build, register or run.
	#[error(transparent)]
	Fixture(#[from] FixtureError),
}

/// Result type alias for command operations.
pub type CommandResult<T> = Result<T, CommandError>;
