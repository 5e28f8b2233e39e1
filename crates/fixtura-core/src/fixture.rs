//! Fixture orchestration.
//!
//! A [`Fixture`] fans each operation out over its bindings, one spawned task
//! per binding (and, for `load`, one per document). Results are aggregated
//! as they complete. The first failure is returned immediately; tasks that
//! were already started keep running to completion, and nothing they did is
//! rolled back.

use std::path::{Path, PathBuf};

use bson::{Bson, Document};
use futures::stream::{FuturesUnordered, StreamExt};
use indexmap::map::Entry;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::collection::CollectionHandle;
use crate::definition::{Binding, CollectionSpec, FixtureDefinition, parse_bindings};
use crate::error::{FixtureError, FixtureResult};
use crate::format::{ExtJsonMode, compute_file_path};
use crate::parser::FixtureParser;
use crate::query::build_query;
use crate::serializer::FixtureSerializer;

/// A named set of bindings whose documents can be snapshotted, reloaded or
/// cleared.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = Fixture::builder("users")
///     .bind_all("user_name", [accounts, settings])
///     .keys(["alan", "neil"])
///     .path("fixtures")
///     .build()?;
///
/// let written = fixture.get().await?;
/// ```
#[derive(Debug)]
pub struct Fixture {
	name: String,
	bindings: Vec<Binding>,
	keys: Vec<Bson>,
	path: Option<PathBuf>,
	serializer: FixtureSerializer,
	parser: FixtureParser,
}

impl Fixture {
	/// Validates `definition` and builds its bindings.
	///
	/// # Errors
	///
	/// Returns [`FixtureError::Config`] for an empty name, or
	/// [`FixtureError::Validation`] if a collection lacks a required operation.
	pub fn new(definition: FixtureDefinition) -> FixtureResult<Self> {
		if definition.name.trim().is_empty() {
			return Err(FixtureError::Config(
				"fixture name must not be empty".to_string(),
			));
		}

		let bindings = parse_bindings(&definition.name, &definition.collections)?;
		debug!(
			fixture = %definition.name,
			bindings = bindings.len(),
			"Built fixture"
		);

		Ok(Self {
			name: definition.name,
			bindings,
			keys: definition.keys,
			path: definition.path,
			serializer: FixtureSerializer::new().with_mode(definition.mode),
			parser: FixtureParser::new(),
		})
	}

	/// Starts a typed definition.
	pub fn builder(name: impl Into<String>) -> FixtureBuilder {
		FixtureBuilder::new(name)
	}

	/// Fixture name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Bindings in definition order.
	pub fn bindings(&self) -> &[Binding] {
		&self.bindings
	}

	/// Key values matched by `get` and `clear`.
	pub fn keys(&self) -> &[Bson] {
		&self.keys
	}

	/// Directory override, if any.
	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}

	/// Extended JSON flavour used when writing.
	pub fn mode(&self) -> ExtJsonMode {
		self.serializer.mode()
	}

	/// File backing `binding`.
	pub fn file_path(&self, binding: &Binding) -> PathBuf {
		compute_file_path(self.path(), binding.name())
	}

	/// Files this fixture reads and writes, one per binding.
	pub fn binding_paths(&self) -> Vec<PathBuf> {
		self.bindings
			.iter()
			.map(|binding| self.file_path(binding))
			.collect()
	}

	/// Predicate selecting this fixture's documents in `binding`.
	pub fn query_for(&self, binding: &Binding) -> Document {
		build_query(binding.key(), &self.keys)
	}

	/// Saves every document from each binding's file into its collection.
	///
	/// Returns the number of acknowledged saves across all bindings.
	///
	/// # Errors
	///
	/// Returns the first file, parse or upstream error encountered.
	pub async fn load(&self) -> FixtureResult<u64> {
		let handles = self
			.bindings
			.iter()
			.map(|binding| {
				let name = binding.name().to_string();
				let collection = CollectionHandle::clone(binding.collection());
				let path = self.file_path(binding);
				let parser = self.parser;

				tokio::spawn(async move {
					let documents = parser.parse_file(&path).await?;
					let saves = documents
						.into_iter()
						.map(|document| {
							let collection = CollectionHandle::clone(&collection);
							let name = name.clone();
							tokio::spawn(async move {
								collection
									.save(document)
									.await
									.map_err(|e| FixtureError::upstream(name, e))
							})
						})
						.collect();

					let acks = join_first_error(saves).await?;
					let count = acks.iter().filter(|ack| is_acknowledged(ack)).count() as u64;
					debug!(binding = %name, path = %path.display(), count, "Loaded binding");
					Ok::<_, FixtureError>(count)
				})
			})
			.collect();

		let total = sum(join_first_error(handles).await?);
		info!(fixture = %self.name, count = total, "Loaded fixture");
		Ok(total)
	}

	/// Writes the documents matching the fixture keys to each binding's file.
	///
	/// Returns the number of documents written across all bindings.
	///
	/// # Errors
	///
	/// Returns the first upstream or file error encountered.
	pub async fn get(&self) -> FixtureResult<u64> {
		let handles = self
			.bindings
			.iter()
			.map(|binding| {
				let name = binding.name().to_string();
				let collection = CollectionHandle::clone(binding.collection());
				let path = self.file_path(binding);
				let query = self.query_for(binding);
				let serializer = self.serializer.clone();

				tokio::spawn(async move {
					let documents = collection
						.find(query)
						.await
						.map_err(|e| FixtureError::upstream(name.as_str(), e))?;
					serializer.write_to_file(&documents, &path).await?;

					let count = documents.len() as u64;
					debug!(binding = %name, path = %path.display(), count, "Wrote binding");
					Ok::<_, FixtureError>(count)
				})
			})
			.collect();

		let total = sum(join_first_error(handles).await?);
		info!(fixture = %self.name, count = total, "Wrote fixture");
		Ok(total)
	}

	/// Removes the documents matching the fixture keys from each collection.
	///
	/// Returns the sum of the removed counts reported by the collections.
	///
	/// # Errors
	///
	/// Returns the first upstream error encountered.
	pub async fn clear(&self) -> FixtureResult<u64> {
		let handles = self
			.bindings
			.iter()
			.map(|binding| {
				let name = binding.name().to_string();
				let collection = CollectionHandle::clone(binding.collection());
				let query = self.query_for(binding);

				tokio::spawn(async move {
					let outcome = collection
						.remove(query)
						.await
						.map_err(|e| FixtureError::upstream(name.as_str(), e))?;
					debug!(binding = %name, count = outcome.n, "Cleared binding");
					Ok::<_, FixtureError>(outcome.n)
				})
			})
			.collect();

		let total = sum(join_first_error(handles).await?);
		info!(fixture = %self.name, count = total, "Cleared fixture");
		Ok(total)
	}
}

/// Awaits `handles` in completion order and stops at the first error.
///
/// Dropping the remaining handles detaches their tasks rather than aborting
/// them.
async fn join_first_error<T>(handles: Vec<JoinHandle<FixtureResult<T>>>) -> FixtureResult<Vec<T>> {
	let mut pending: FuturesUnordered<_> = handles.into_iter().collect();
	let mut results = Vec::with_capacity(pending.len());

	while let Some(joined) = pending.next().await {
		results.push(joined??);
	}

	Ok(results)
}

/// A save counts only when the store returned a non-null id.
fn is_acknowledged(ack: &Option<Bson>) -> bool {
	!matches!(ack, None | Some(Bson::Null))
}

fn sum(counts: Vec<u64>) -> u64 {
	counts.into_iter().sum()
}

/// Typed builder for [`Fixture`].
#[derive(Debug)]
pub struct FixtureBuilder {
	definition: FixtureDefinition,
}

impl FixtureBuilder {
	/// Creates a builder for a fixture named `name`.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			definition: FixtureDefinition::new(name),
		}
	}

	/// Binds `collection` to `key`, after any collection already bound to it.
	pub fn bind(self, key: impl Into<String>, collection: CollectionHandle) -> Self {
		self.bind_all(key, [collection])
	}

	/// Binds each of `collections` to `key`, in order.
	pub fn bind_all<I>(mut self, key: impl Into<String>, collections: I) -> Self
	where
		I: IntoIterator<Item = CollectionHandle>,
	{
		let mut added: Vec<_> = collections.into_iter().collect();

		match self.definition.collections.entry(key.into()) {
			Entry::Occupied(mut entry) => {
				let mut handles = entry.get().handles();
				handles.append(&mut added);
				entry.insert(CollectionSpec::Many(handles));
			}
			Entry::Vacant(entry) => {
				let spec = if added.len() == 1 {
					CollectionSpec::One(added.remove(0))
				} else {
					CollectionSpec::Many(added)
				};
				entry.insert(spec);
			}
		}

		self
	}

	/// Replaces the key values.
	pub fn keys<I, V>(mut self, keys: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<Bson>,
	{
		self.definition.keys = keys.into_iter().map(Into::into).collect();
		self
	}

	/// Appends one key value.
	pub fn key(mut self, key: impl Into<Bson>) -> Self {
		self.definition.keys.push(key.into());
		self
	}

	/// Sets the directory holding the fixture files.
	pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
		self.definition.path = Some(path.into());
		self
	}

	/// Sets the Extended JSON flavour used when writing.
	pub fn mode(mut self, mode: ExtJsonMode) -> Self {
		self.definition.mode = mode;
		self
	}

	/// Validates the definition and builds the fixture.
	pub fn build(self) -> FixtureResult<Fixture> {
		Fixture::new(self.definition)
	}
}
