//! MongoDB-backed [`DocumentCollection`].

use std::fmt;

use async_trait::async_trait;
use bson::{Bson, Document, doc};
use fixtura_core::{
	CollectionError, CollectionResult, DocumentCollection, Operation, RemoveOutcome,
};
use futures::stream::TryStreamExt;
use mongodb::Collection;
use mongodb::error::ErrorKind;
use tracing::trace;

/// A driver collection usable as a fixture binding.
///
/// `save` upserts by `_id` when the document carries one and inserts it
/// otherwise, so reloading a fixture over existing data replaces documents
/// instead of failing on duplicate keys.
#[derive(Clone)]
pub struct MongoCollection {
	inner: Collection<Document>,
	display_name: Option<String>,
	read_only: bool,
}

impl MongoCollection {
	/// Wraps a driver collection.
	pub fn new(inner: Collection<Document>) -> Self {
		Self {
			inner,
			display_name: None,
			read_only: false,
		}
	}

	/// Sets the name fixture files are named after.
	pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
		self.display_name = Some(name.into());
		self
	}

	/// Marks the handle read-only: only `find` is supported.
	///
	/// Binding a read-only handle fails fixture validation.
	pub fn read_only(mut self) -> Self {
		self.read_only = true;
		self
	}

	/// Returns true if this handle only supports `find`.
	pub fn is_read_only(&self) -> bool {
		self.read_only
	}

	/// The underlying driver collection.
	pub fn driver(&self) -> &Collection<Document> {
		&self.inner
	}

	fn ensure(&self, operation: Operation) -> CollectionResult<()> {
		if self.supports(operation) {
			Ok(())
		} else {
			Err(CollectionError::Unsupported(operation))
		}
	}
}

impl fmt::Debug for MongoCollection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MongoCollection")
			.field("namespace", &self.inner.namespace().to_string())
			.field("display_name", &self.display_name)
			.field("read_only", &self.read_only)
			.finish()
	}
}

/// Maps a driver error onto the collection error taxonomy.
pub fn collection_error(err: mongodb::error::Error) -> CollectionError {
	match *err.kind {
		ErrorKind::Authentication { .. } | ErrorKind::Io(_) | ErrorKind::ServerSelection { .. } => {
			CollectionError::Connection(err.to_string())
		}
		ErrorKind::BsonDeserialization(_) | ErrorKind::BsonSerialization(_) => {
			CollectionError::Serialization(err.to_string())
		}
		_ => CollectionError::Execution(err.to_string()),
	}
}

#[async_trait]
impl DocumentCollection for MongoCollection {
	fn display_name(&self) -> Option<&str> {
		self.display_name.as_deref()
	}

	fn collection_name(&self) -> Option<&str> {
		Some(self.inner.name())
	}

	fn supports(&self, operation: Operation) -> bool {
		!self.read_only || operation == Operation::Find
	}

	async fn find(&self, filter: Document) -> CollectionResult<Vec<Document>> {
		trace!(collection = %self.inner.name(), ?filter, "find");
		let cursor = self.inner.find(filter).await.map_err(collection_error)?;
		cursor.try_collect().await.map_err(collection_error)
	}

	async fn save(&self, document: Document) -> CollectionResult<Option<Bson>> {
		self.ensure(Operation::Save)?;

		match document.get("_id").cloned() {
			Some(id) => {
				self.inner
					.replace_one(doc! { "_id": id.clone() }, document)
					.upsert(true)
					.await
					.map_err(collection_error)?;
				Ok(Some(id))
			}
			None => {
				let result = self
					.inner
					.insert_one(document)
					.await
					.map_err(collection_error)?;
				Ok(Some(result.inserted_id))
			}
		}
	}

	async fn remove(&self, filter: Document) -> CollectionResult<RemoveOutcome> {
		self.ensure(Operation::Remove)?;
		trace!(collection = %self.inner.name(), ?filter, "remove");

		let result = self
			.inner
			.delete_many(filter)
			.await
			.map_err(collection_error)?;
		Ok(RemoveOutcome::new(result.deleted_count))
	}
}
