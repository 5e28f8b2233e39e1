//! Document serialization for fixture output.
//!
//! Writes are plain overwrites. A failure halfway through can leave a
//! truncated file behind; the next `load` of that file then fails to parse.

use std::path::Path;

use bson::{Bson, Document};

use crate::error::{FixtureError, FixtureResult};
use crate::format::ExtJsonMode;

/// Fixture serializer for exporting documents.
#[derive(Debug, Clone)]
pub struct FixtureSerializer {
	/// Extended JSON flavour.
	mode: ExtJsonMode,

	/// Whether to pretty print the output.
	pretty: bool,
}

impl FixtureSerializer {
	/// Creates a serializer writing pretty printed canonical Extended JSON.
	pub fn new() -> Self {
		Self {
			mode: ExtJsonMode::Canonical,
			pretty: true,
		}
	}

	/// Sets the Extended JSON flavour.
	pub fn with_mode(mut self, mode: ExtJsonMode) -> Self {
		self.mode = mode;
		self
	}

	/// Sets whether to pretty print.
	pub fn with_pretty(mut self, pretty: bool) -> Self {
		self.pretty = pretty;
		self
	}

	/// Converts documents to Extended JSON values, keeping their order.
	pub fn to_values(&self, documents: &[Document]) -> Vec<serde_json::Value> {
		documents
			.iter()
			.cloned()
			.map(|document| match self.mode {
				ExtJsonMode::Canonical => Bson::Document(document).into_canonical_extjson(),
				ExtJsonMode::Relaxed => Bson::Document(document).into_relaxed_extjson(),
			})
			.collect()
	}

	/// Serializes documents to a string.
	pub fn serialize(&self, documents: &[Document]) -> FixtureResult<String> {
		let values = self.to_values(documents);
		let mut output = if self.pretty {
			serde_json::to_string_pretty(&values)
		} else {
			serde_json::to_string(&values)
		}
		.map_err(|e| FixtureError::Serialization(e.to_string()))?;

		output.push('\n');
		Ok(output)
	}

	/// Writes serialized documents to `path`, creating its directory.
	pub async fn write_to_file(&self, documents: &[Document], path: &Path) -> FixtureResult<()> {
		let content = self.serialize(documents)?;

		if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
			tokio::fs::create_dir_all(dir)
				.await
				.map_err(|e| FixtureError::io(dir, e))?;
		}

		tokio::fs::write(path, content)
			.await
			.map_err(|e| FixtureError::io(path, e))
	}

	/// Returns the configured Extended JSON flavour.
	pub fn mode(&self) -> ExtJsonMode {
		self.mode
	}
}

impl Default for FixtureSerializer {
	fn default() -> Self {
		Self::new()
	}
}
