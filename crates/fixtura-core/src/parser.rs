//! Fixture file parsing.
//!
//! Turns Extended JSON fixture files back into ordered document lists.

use std::path::Path;

use bson::{Bson, Document};

use crate::error::{FixtureError, FixtureResult};

/// Parser for fixture files.
///
/// Accepts both canonical and relaxed Extended JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureParser;

impl FixtureParser {
	/// Creates a new fixture parser.
	pub fn new() -> Self {
		Self
	}

	/// Reads and parses the fixture file at `path`.
	///
	/// # Errors
	///
	/// Returns an error if:
	/// - The file does not exist ([`FixtureError::FileNotFound`])
	/// - The file cannot be read ([`FixtureError::Io`])
	/// - The content is not an array of Extended JSON documents
	///   ([`FixtureError::Parse`])
	pub async fn parse_file(&self, path: &Path) -> FixtureResult<Vec<Document>> {
		let content = tokio::fs::read_to_string(path)
			.await
			.map_err(|e| FixtureError::io(path, e))?;

		self.parse_string(&content, path)
	}

	/// Parses fixture content; `source` is only used in error messages.
	pub fn parse_string(&self, content: &str, source: &Path) -> FixtureResult<Vec<Document>> {
		let parse_error = |message: String| FixtureError::Parse {
			path: source.to_path_buf(),
			message,
		};

		let value: serde_json::Value =
			serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?;

		let serde_json::Value::Array(items) = value else {
			return Err(parse_error("Expected an array of documents".to_string()));
		};

		let mut documents = Vec::with_capacity(items.len());
		for (idx, item) in items.into_iter().enumerate() {
			match Bson::try_from(item) {
				Ok(Bson::Document(document)) => documents.push(document),
				Ok(other) => {
					return Err(parse_error(format!(
						"Invalid document at index {}: expected a document, found {:?}",
						idx,
						other.element_type()
					)));
				}
				Err(e) => {
					return Err(parse_error(format!(
						"Invalid document at index {}: {}",
						idx, e
					)));
				}
			}
		}

		Ok(documents)
	}
}
