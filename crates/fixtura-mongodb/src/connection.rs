//! MongoDB connection handling.
//!
//! A [`MongoConnection`] wraps one pooled driver client plus the name of the
//! database fixtures work in. Cloning is cheap and shares the pool.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use fixtura_core::{CollectionError, CollectionResult};
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use tracing::debug;

use crate::collection::MongoCollection;

/// Connection URL used when none is configured.
pub const DEFAULT_URL: &str = "mongodb://localhost:27017";

/// Database used when none is configured.
pub const DEFAULT_DATABASE: &str = "test";

/// Shared MongoDB client bound to one database.
///
/// # Example
///
/// ```rust,no_run
/// use fixtura_mongodb::MongoConnection;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let connection = MongoConnection::builder()
///     .url("mongodb://localhost:27017")
///     .database("app")
///     .max_pool_size(20)
///     .min_pool_size(2)
///     .build()
///     .await?;
/// let accounts = connection.collection("accounts");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MongoConnection {
	client: Arc<Client>,
	database_name: String,
}

impl MongoConnection {
	/// Connects with a connection string, using the default database.
	pub async fn connect(url: &str) -> CollectionResult<Self> {
		let client = Client::with_uri_str(url)
			.await
			.map_err(|e| CollectionError::Connection(e.to_string()))?;

		Ok(Self {
			client: Arc::new(client),
			database_name: DEFAULT_DATABASE.to_string(),
		})
	}

	/// Creates a builder for configuring the connection.
	pub fn builder() -> MongoConnectionBuilder {
		MongoConnectionBuilder::new()
	}

	/// Switches to another database on the same client.
	pub fn with_database(mut self, database_name: &str) -> Self {
		self.database_name = database_name.to_string();
		self
	}

	/// Name of the database in use.
	pub fn database_name(&self) -> &str {
		&self.database_name
	}

	/// Driver handle for the database in use.
	pub fn database(&self) -> Database {
		self.client.database(&self.database_name)
	}

	/// Collection `name` in the database in use.
	pub fn collection(&self, name: &str) -> MongoCollection {
		MongoCollection::new(self.database().collection(name))
	}
}

impl fmt::Debug for MongoConnection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MongoConnection")
			.field("database_name", &self.database_name)
			.finish_non_exhaustive()
	}
}

/// Builder for [`MongoConnection`].
#[derive(Debug, Clone)]
pub struct MongoConnectionBuilder {
	url: String,
	database: String,
	max_pool_size: Option<u32>,
	min_pool_size: Option<u32>,
	max_idle_time_secs: Option<u64>,
}

impl Default for MongoConnectionBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl MongoConnectionBuilder {
	/// Creates a builder for [`DEFAULT_URL`] and [`DEFAULT_DATABASE`].
	pub fn new() -> Self {
		Self {
			url: DEFAULT_URL.to_string(),
			database: DEFAULT_DATABASE.to_string(),
			max_pool_size: None,
			min_pool_size: None,
			max_idle_time_secs: None,
		}
	}

	/// Set the connection URL
	pub fn url(mut self, url: impl Into<String>) -> Self {
		self.url = url.into();
		self
	}

	/// Set the database name
	pub fn database(mut self, database: impl Into<String>) -> Self {
		self.database = database.into();
		self
	}

	/// Set the maximum connection pool size
	pub fn max_pool_size(mut self, size: u32) -> Self {
		self.max_pool_size = Some(size);
		self
	}

	/// Set the minimum connection pool size
	pub fn min_pool_size(mut self, size: u32) -> Self {
		self.min_pool_size = Some(size);
		self
	}

	/// Set the maximum idle time for pooled connections in seconds
	pub fn max_idle_time_secs(mut self, secs: u64) -> Self {
		self.max_idle_time_secs = Some(secs);
		self
	}

	/// Parses the options and creates the client.
	///
	/// No server round trip happens here; the driver connects lazily on the
	/// first operation.
	///
	/// # Errors
	///
	/// Returns [`CollectionError::Connection`] if the URL cannot be parsed or
	/// the options are rejected.
	pub async fn build(self) -> CollectionResult<MongoConnection> {
		let mut options = ClientOptions::parse(&self.url)
			.await
			.map_err(|e| CollectionError::Connection(e.to_string()))?;

		if let Some(max_size) = self.max_pool_size {
			options.max_pool_size = Some(max_size);
		}

		if let Some(min_size) = self.min_pool_size {
			options.min_pool_size = Some(min_size);
		}

		if let Some(idle_time) = self.max_idle_time_secs {
			options.max_idle_time = Some(Duration::from_secs(idle_time));
		}

		let client = Client::with_options(options)
			.map_err(|e| CollectionError::Connection(e.to_string()))?;
		debug!(database = %self.database, "Created MongoDB client");

		Ok(MongoConnection {
			client: Arc::new(client),
			database_name: self.database,
		})
	}
}
