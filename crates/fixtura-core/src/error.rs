//! Error types for fixture operations.
//!
//! [`FixtureError`] covers everything a fixture can fail with, from malformed
//! definitions at construction time to upstream failures while loading.
//! [`CollectionError`] is what a [`DocumentCollection`](crate::DocumentCollection)
//! implementation reports; it reaches callers wrapped in
//! [`FixtureError::Upstream`].

use std::path::PathBuf;

use thiserror::Error;

use crate::collection::Operation;

/// Errors reported by a collection capability.
#[derive(Debug, Error)]
pub enum CollectionError {
	/// Connection to the backing store failed.
	#[error("Connection error: {0}")]
	Connection(String),

	/// The store rejected or failed to execute a command.
	#[error("Execution error: {0}")]
	Execution(String),

	/// The handle does not support the requested operation.
	#[error("Unsupported operation: {0}")]
	Unsupported(Operation),

	/// A document could not be encoded or decoded by the store.
	#[error("Serialization error: {0}")]
	Serialization(String),
}

/// Result type alias for collection operations.
pub type CollectionResult<T> = Result<T, CollectionError>;

/// Errors that can occur while defining or running fixtures.
#[derive(Debug, Error)]
pub enum FixtureError {
	/// Malformed fixture definition.
	#[error("Configuration error: {0}")]
	Config(String),

	/// A bound collection lacks a required operation.
	#[error("Validation error: binding '{binding}' does not support '{operation}'")]
	Validation {
		/// Resolved name of the offending binding.
		binding: String,
		/// The missing operation.
		operation: Operation,
	},

	/// Fixture file does not exist.
	#[error("Fixture file not found: {}", .0.display())]
	FileNotFound(PathBuf),

	/// Reading or writing a fixture file failed.
	#[error("IO error on {}: {source}", .path.display())]
	Io {
		/// File being accessed.
		path: PathBuf,
		/// Underlying error.
		#[source]
		source: std::io::Error,
	},

	/// Fixture file content is not a valid document list.
	#[error("Parse error in {}: {message}", .path.display())]
	Parse {
		/// File being parsed.
		path: PathBuf,
		/// What went wrong.
		message: String,
	},

	/// Documents could not be rendered to the fixture format.
	#[error("Serialization error: {0}")]
	Serialization(String),

	/// The collection capability reported a failure.
	#[error("Upstream error in binding '{binding}': {source}")]
	Upstream {
		/// Resolved name of the binding whose collection failed.
		binding: String,
		/// Error reported by the collection.
		#[source]
		source: CollectionError,
	},

	/// Registry error, such as a duplicate fixture name.
	#[error("Registry error: {0}")]
	Registry(String),

	/// A spawned fixture task panicked or was aborted.
	#[error("Task error: {0}")]
	Task(String),
}

impl FixtureError {
	/// Wraps a collection error with the binding it came from.
	pub fn upstream(binding: impl Into<String>, source: CollectionError) -> Self {
		Self::Upstream {
			binding: binding.into(),
			source,
		}
	}

	pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		let path = path.into();
		if source.kind() == std::io::ErrorKind::NotFound {
			Self::FileNotFound(path)
		} else {
			Self::Io { path, source }
		}
	}
}

impl From<tokio::task::JoinError> for FixtureError {
	fn from(err: tokio::task::JoinError) -> Self {
		FixtureError::Task(err.to_string())
	}
}

/// Result type alias for fixture operations.
pub type FixtureResult<T> = Result<T, FixtureError>;
