//! Fixture definitions and binding construction.
//!
//! A definition maps query keys to one or more collections. Parsing turns it
//! into an ordered list of [`Binding`]s: mapping order first, then list
//! order. Every structural check happens here, so a
//! [`Fixture`](crate::Fixture) that exists is usable.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use bson::Bson;
use indexmap::IndexMap;
use serde_json::Value;

use crate::collection::{CollectionHandle, Operation};
use crate::error::{FixtureError, FixtureResult};
use crate::format::ExtJsonMode;
use crate::naming::{fallback_name, resolve_name};

/// One collection or an ordered list of collections bound to a key.
#[derive(Clone)]
pub enum CollectionSpec {
	/// A single collection.
	One(CollectionHandle),
	/// Several collections, queried with the same key.
	Many(Vec<CollectionHandle>),
}

impl CollectionSpec {
	/// Normalizes to a list; a single handle becomes a one-element list.
	pub fn handles(&self) -> Vec<CollectionHandle> {
		match self {
			Self::One(handle) => vec![Arc::clone(handle)],
			Self::Many(handles) => handles.clone(),
		}
	}

	/// Number of collections in this spec.
	pub fn len(&self) -> usize {
		match self {
			Self::One(_) => 1,
			Self::Many(handles) => handles.len(),
		}
	}

	/// Returns true if this spec holds no collection.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl From<CollectionHandle> for CollectionSpec {
	fn from(handle: CollectionHandle) -> Self {
		Self::One(handle)
	}
}

impl From<Vec<CollectionHandle>> for CollectionSpec {
	fn from(handles: Vec<CollectionHandle>) -> Self {
		Self::Many(handles)
	}
}

impl fmt::Debug for CollectionSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "CollectionSpec({} collection(s))", self.len())
	}
}

/// Key name to collections, in definition order.
pub type CollectionMap = IndexMap<String, CollectionSpec>;

/// A query key bound to one collection.
#[derive(Clone)]
pub struct Binding {
	name: String,
	key: String,
	collection: CollectionHandle,
}

impl Binding {
	/// Fixture-scoped name, also used as the file stem.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Field queried with the fixture keys.
	pub fn key(&self) -> &str {
		&self.key
	}

	/// The bound collection.
	pub fn collection(&self) -> &CollectionHandle {
		&self.collection
	}
}

impl fmt::Debug for Binding {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Binding")
			.field("name", &self.name)
			.field("key", &self.key)
			.finish_non_exhaustive()
	}
}

/// Builds the bindings for fixture `fixture`.
///
/// Each collection gets a name from [`resolve_name`] and must support every
/// [`Operation::REQUIRED`] operation.
///
/// # Errors
///
/// Returns [`FixtureError::Validation`] for the first collection missing an
/// operation; no bindings are returned in that case.
pub fn parse_bindings(fixture: &str, collections: &CollectionMap) -> FixtureResult<Vec<Binding>> {
	let mut bindings = Vec::with_capacity(collections.values().map(CollectionSpec::len).sum());

	for (key, spec) in collections {
		for (index, collection) in spec.handles().into_iter().enumerate() {
			let fallback = fallback_name(fixture, key, index);
			let name = resolve_name(fixture, collection.as_ref(), &fallback);

			if let Some(operation) = Operation::REQUIRED
				.into_iter()
				.find(|operation| !collection.supports(*operation))
			{
				return Err(FixtureError::Validation {
					binding: name,
					operation,
				});
			}

			bindings.push(Binding {
				name,
				key: key.clone(),
				collection,
			});
		}
	}

	Ok(bindings)
}

/// Looks up collections by name for declarative definitions.
pub trait CollectionProvider: Send + Sync {
	/// Returns the collection called `name`, if known.
	fn collection(&self, name: &str) -> Option<CollectionHandle>;
}

impl CollectionProvider for IndexMap<String, CollectionHandle> {
	fn collection(&self, name: &str) -> Option<CollectionHandle> {
		self.get(name).cloned()
	}
}

/// Unvalidated description of a fixture.
#[derive(Debug, Clone)]
pub struct FixtureDefinition {
	/// Unique fixture name.
	pub name: String,

	/// Key name to collections.
	pub collections: CollectionMap,

	/// Values matched against each binding's key.
	pub keys: Vec<Bson>,

	/// Directory holding the fixture files.
	pub path: Option<PathBuf>,

	/// Extended JSON flavour for written files.
	pub mode: ExtJsonMode,
}

impl FixtureDefinition {
	/// Creates an empty definition named `name`.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			collections: CollectionMap::new(),
			keys: Vec::new(),
			path: None,
			mode: ExtJsonMode::default(),
		}
	}

	/// Parses a declarative definition.
	///
	/// Collections are referenced by name and looked up through `provider`.
	/// Keys may be any scalar, including Extended JSON wrappers such as
	/// `{"$oid": "..."}`.
	///
	/// # Example
	///
	/// ```json
	/// {
	///   "name": "users",
	///   "collections": { "user_name": ["users", "settings"] },
	///   "keys": ["alan", "neil"],
	///   "path": "fixtures"
	/// }
	/// ```
	///
	/// # Errors
	///
	/// Returns [`FixtureError::Config`] if `name` is not a string,
	/// `collections` is not a mapping of names or name lists, `keys` is not a
	/// list of scalars, or a collection name is unknown.
	pub fn from_value(value: &Value, provider: &dyn CollectionProvider) -> FixtureResult<Self> {
		let table = value
			.as_object()
			.ok_or_else(|| config("fixture definition must be a mapping"))?;

		let name = match table.get("name") {
			Some(Value::String(name)) => name.clone(),
			_ => return Err(config("fixture `name` must be a string")),
		};

		let collections = match table.get("collections") {
			Some(Value::Object(entries)) => {
				let mut collections = CollectionMap::with_capacity(entries.len());
				for (key, entry) in entries {
					let spec = parse_collection_entry(&name, key, entry, provider)?;
					collections.insert(key.clone(), spec);
				}
				collections
			}
			_ => {
				return Err(config(format!(
					"fixture '{}': `collections` must be a mapping",
					name
				)));
			}
		};

		let keys = match table.get("keys") {
			Some(Value::Array(items)) => items
				.iter()
				.enumerate()
				.map(|(idx, item)| parse_key(&name, idx, item))
				.collect::<FixtureResult<Vec<_>>>()?,
			_ => {
				return Err(config(format!(
					"fixture '{}': `keys` must be a list",
					name
				)));
			}
		};

		let path = match table.get("path") {
			None | Some(Value::Null) => None,
			Some(Value::String(path)) => Some(PathBuf::from(path)),
			Some(_) => {
				return Err(config(format!(
					"fixture '{}': `path` must be a string",
					name
				)));
			}
		};

		let mode = match table.get("mode") {
			None | Some(Value::Null) => ExtJsonMode::default(),
			Some(Value::String(mode)) => ExtJsonMode::from_name(mode).ok_or_else(|| {
				config(format!("fixture '{}': unknown mode '{}'", name, mode))
			})?,
			Some(_) => {
				return Err(config(format!(
					"fixture '{}': `mode` must be a string",
					name
				)));
			}
		};

		Ok(Self {
			name,
			collections,
			keys,
			path,
			mode,
		})
	}
}

fn config(message: impl Into<String>) -> FixtureError {
	FixtureError::Config(message.into())
}

fn lookup(
	fixture: &str,
	key: &str,
	collection: &str,
	provider: &dyn CollectionProvider,
) -> FixtureResult<CollectionHandle> {
	provider.collection(collection).ok_or_else(|| {
		config(format!(
			"fixture '{}': unknown collection '{}' for key '{}'",
			fixture, collection, key
		))
	})
}

fn parse_collection_entry(
	fixture: &str,
	key: &str,
	entry: &Value,
	provider: &dyn CollectionProvider,
) -> FixtureResult<CollectionSpec> {
	match entry {
		Value::String(collection) => lookup(fixture, key, collection, provider).map(CollectionSpec::One),
		Value::Array(items) => items
			.iter()
			.map(|item| match item {
				Value::String(collection) => lookup(fixture, key, collection, provider),
				_ => Err(config(format!(
					"fixture '{}': collections for key '{}' must be names",
					fixture, key
				))),
			})
			.collect::<FixtureResult<Vec<_>>>()
			.map(CollectionSpec::Many),
		_ => Err(config(format!(
			"fixture '{}': key '{}' must map to a collection name or a list of names",
			fixture, key
		))),
	}
}

fn parse_key(fixture: &str, index: usize, item: &Value) -> FixtureResult<Bson> {
	let invalid = |reason: String| {
		config(format!(
			"fixture '{}': key at index {} {}",
			fixture, index, reason
		))
	};

	match Bson::try_from(item.clone()) {
		Ok(Bson::Document(_)) | Ok(Bson::Array(_)) => Err(invalid("is not a scalar".to_string())),
		Ok(value) => Ok(value),
		Err(e) => Err(invalid(format!("is not valid Extended JSON: {}", e))),
	}
}
