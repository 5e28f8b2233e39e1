//! Collection capability trait
//!
//! A fixture never talks to a database directly. Each binding holds a
//! [`DocumentCollection`] handle which knows how to find, save and remove
//! documents; everything else (connections, pooling, timeouts) belongs to
//! the implementation.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bson::{Bson, Document};

use crate::error::CollectionResult;

/// Operations a fixture requires from a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Query documents with a filter.
	Find,
	/// Insert or replace a single document.
	Save,
	/// Delete every document matching a filter.
	Remove,
}

impl Operation {
	/// All operations a bound collection must support.
	pub const REQUIRED: [Operation; 3] = [Operation::Find, Operation::Save, Operation::Remove];

	/// Lowercase operation name.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Find => "find",
			Self::Save => "save",
			Self::Remove => "remove",
		}
	}
}

impl fmt::Display for Operation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Outcome of a `remove` call, as reported by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemoveOutcome {
	/// Number of documents the store reports as removed.
	pub n: u64,
}

impl RemoveOutcome {
	/// Creates an outcome reporting `n` removed documents.
	pub fn new(n: u64) -> Self {
		Self { n }
	}
}

/// Shared handle to a collection capability.
pub type CollectionHandle = Arc<dyn DocumentCollection>;

/// Trait for document collections usable by fixtures.
///
/// The three naming hooks feed the binding name resolver: a public
/// [`display_name`](Self::display_name) wins over the store-level
/// [`collection_name`](Self::collection_name), which wins over the
/// collection name of a wrapped [`inner`](Self::inner) handle.
///
/// # Example
///
/// ```rust,ignore
/// use fixtura_core::{DocumentCollection, RemoveOutcome};
///
/// struct Users { /* driver handle */ }
///
/// #[async_trait]
/// impl DocumentCollection for Users {
///     fn collection_name(&self) -> Option<&str> { Some("users") }
///     async fn find(&self, filter: Document) -> CollectionResult<Vec<Document>> { /* ... */ }
///     async fn save(&self, document: Document) -> CollectionResult<Option<Bson>> { /* ... */ }
///     async fn remove(&self, filter: Document) -> CollectionResult<RemoveOutcome> { /* ... */ }
/// }
/// ```
#[async_trait]
pub trait DocumentCollection: Send + Sync {
	/// Public, user-assigned descriptive name.
	fn display_name(&self) -> Option<&str> {
		None
	}

	/// Name the store itself uses for the collection.
	fn collection_name(&self) -> Option<&str> {
		None
	}

	/// Collection wrapped by this handle, if any.
	fn inner(&self) -> Option<&dyn DocumentCollection> {
		None
	}

	/// Returns true if this handle can perform `operation`.
	///
	/// Checked once when a fixture is built, never per call.
	fn supports(&self, _operation: Operation) -> bool {
		true
	}

	/// Finds every document matching `filter`.
	async fn find(&self, filter: Document) -> CollectionResult<Vec<Document>>;

	/// Saves a single document, returning its id when acknowledged.
	///
	/// `None` or `Some(Bson::Null)` means the store accepted the call without
	/// acknowledging a write; such saves are not counted by `load`.
	async fn save(&self, document: Document) -> CollectionResult<Option<Bson>>;

	/// Removes every document matching `filter`.
	async fn remove(&self, filter: Document) -> CollectionResult<RemoveOutcome>;
}

/// Attaches a display name to an existing collection handle.
///
/// The wrapped handle stays reachable through
/// [`DocumentCollection::inner`], and every operation is forwarded to it.
pub struct Named {
	name: String,
	inner: CollectionHandle,
}

impl Named {
	/// Wraps `inner` under the display name `name`.
	pub fn new(name: impl Into<String>, inner: CollectionHandle) -> Self {
		Self {
			name: name.into(),
			inner,
		}
	}

	/// Wraps `inner` and returns a shareable handle.
	pub fn handle(name: impl Into<String>, inner: CollectionHandle) -> CollectionHandle {
		Arc::new(Self::new(name, inner))
	}
}

impl fmt::Debug for Named {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Named").field("name", &self.name).finish()
	}
}

#[async_trait]
impl DocumentCollection for Named {
	fn display_name(&self) -> Option<&str> {
		Some(&self.name)
	}

	fn inner(&self) -> Option<&dyn DocumentCollection> {
		Some(self.inner.as_ref())
	}

	fn supports(&self, operation: Operation) -> bool {
		self.inner.supports(operation)
	}

	async fn find(&self, filter: Document) -> CollectionResult<Vec<Document>> {
		self.inner.find(filter).await
	}

	async fn save(&self, document: Document) -> CollectionResult<Option<Bson>> {
		self.inner.save(document).await
	}

	async fn remove(&self, filter: Document) -> CollectionResult<RemoveOutcome> {
		self.inner.remove(filter).await
	}
}
