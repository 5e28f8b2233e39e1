//! In-memory collection double shared by the fixture scenarios.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use bson::oid::ObjectId;
use bson::{Bson, Document};
use fixtura_core::{
	CollectionError, CollectionHandle, CollectionResult, DocumentCollection, RemoveOutcome,
	async_trait, matches,
};
use parking_lot::Mutex;

/// Records every call and evaluates `$in` filters locally.
#[derive(Default)]
pub struct MemoryCollection {
	name: Option<String>,
	documents: Mutex<Vec<Document>>,
	finds: Mutex<Vec<Document>>,
	saves: Mutex<Vec<Document>>,
	removes: Mutex<Vec<Document>>,
	reported_removals: Option<u64>,
	unacknowledged: bool,
	null_acks: bool,
	failing: bool,
	save_delay: Option<Duration>,
}

impl MemoryCollection {
	pub fn new(name: &str) -> Self {
		Self {
			name: Some(name.to_string()),
			..Self::default()
		}
	}

	pub fn anonymous() -> Self {
		Self::default()
	}

	pub fn with_documents(self, documents: Vec<Document>) -> Self {
		*self.documents.lock() = documents;
		self
	}

	/// Reports `n` from every `remove`, whatever was actually removed.
	pub fn with_reported_removals(mut self, n: u64) -> Self {
		self.reported_removals = Some(n);
		self
	}

	/// Accepts saves without acknowledging them.
	pub fn unacknowledged(mut self) -> Self {
		self.unacknowledged = true;
		self
	}

	/// Acknowledges saves with a null id.
	pub fn with_null_acks(mut self) -> Self {
		self.null_acks = true;
		self
	}

	/// Fails every operation.
	pub fn failing(mut self) -> Self {
		self.failing = true;
		self
	}

	pub fn with_save_delay(mut self, delay: Duration) -> Self {
		self.save_delay = Some(delay);
		self
	}

	pub fn into_handle(self) -> Arc<Self> {
		Arc::new(self)
	}

	pub fn documents(&self) -> Vec<Document> {
		self.documents.lock().clone()
	}

	pub fn finds(&self) -> Vec<Document> {
		self.finds.lock().clone()
	}

	pub fn saves(&self) -> Vec<Document> {
		self.saves.lock().clone()
	}

	pub fn removes(&self) -> Vec<Document> {
		self.removes.lock().clone()
	}

	fn check(&self) -> CollectionResult<()> {
		if self.failing {
			Err(CollectionError::Execution("store unavailable".to_string()))
		} else {
			Ok(())
		}
	}
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
	fn collection_name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	async fn find(&self, filter: Document) -> CollectionResult<Vec<Document>> {
		self.finds.lock().push(filter.clone());
		self.check()?;
		Ok(self
			.documents
			.lock()
			.iter()
			.filter(|document| matches(&filter, document))
			.cloned()
			.collect())
	}

	async fn save(&self, mut document: Document) -> CollectionResult<Option<Bson>> {
		if let Some(delay) = self.save_delay {
			tokio::time::sleep(delay).await;
		}
		self.check()?;

		let id = match document.get("_id") {
			Some(id) => id.clone(),
			None => {
				let id = Bson::ObjectId(ObjectId::new());
				document.insert("_id", id.clone());
				id
			}
		};
		self.saves.lock().push(document.clone());

		let mut documents = self.documents.lock();
		documents.retain(|existing| existing.get("_id") != Some(&id));
		documents.push(document);

		if self.unacknowledged {
			Ok(None)
		} else if self.null_acks {
			Ok(Some(Bson::Null))
		} else {
			Ok(Some(id))
		}
	}

	async fn remove(&self, filter: Document) -> CollectionResult<RemoveOutcome> {
		self.removes.lock().push(filter.clone());
		self.check()?;

		let mut documents = self.documents.lock();
		let before = documents.len();
		documents.retain(|document| !matches(&filter, document));
		let removed = (before - documents.len()) as u64;

		Ok(RemoveOutcome::new(self.reported_removals.unwrap_or(removed)))
	}
}

/// Shares `collection` as a fixture handle while keeping it inspectable.
pub fn handle(collection: &Arc<MemoryCollection>) -> CollectionHandle {
	Arc::clone(collection) as CollectionHandle
}
