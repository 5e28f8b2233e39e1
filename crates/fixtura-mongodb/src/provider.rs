//! Collection lookup for declarative fixture definitions.

use std::collections::HashSet;
use std::sync::Arc;

use fixtura_core::{CollectionHandle, CollectionProvider};

use crate::connection::MongoConnection;

/// Resolves collection names against one database.
///
/// Any name resolves by default, since MongoDB creates collections on first
/// write. [`only`](Self::only) restricts lookups to a known set so typos in
/// a definition surface as configuration errors.
#[derive(Debug, Clone)]
pub struct MongoCollectionProvider {
	connection: MongoConnection,
	allowed: Option<HashSet<String>>,
	read_only: HashSet<String>,
}

impl MongoCollectionProvider {
	/// Creates a provider over `connection`.
	pub fn new(connection: MongoConnection) -> Self {
		Self {
			connection,
			allowed: None,
			read_only: HashSet::new(),
		}
	}

	/// Only resolves the given collection names.
	pub fn only<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.allowed = Some(names.into_iter().map(Into::into).collect());
		self
	}

	/// Hands out the given collections as read-only handles.
	pub fn read_only<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.read_only.extend(names.into_iter().map(Into::into));
		self
	}

	/// The connection collections are resolved against.
	pub fn connection(&self) -> &MongoConnection {
		&self.connection
	}
}

impl CollectionProvider for MongoCollectionProvider {
	fn collection(&self, name: &str) -> Option<CollectionHandle> {
		if name.is_empty() {
			return None;
		}
		if self
			.allowed
			.as_ref()
			.is_some_and(|allowed| !allowed.contains(name))
		{
			return None;
		}

		let collection = self.connection.collection(name);
		let collection = if self.read_only.contains(name) {
			collection.read_only()
		} else {
			collection
		};
		Some(Arc::new(collection))
	}
}
