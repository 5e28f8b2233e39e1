//! MongoDB support for fixtura.
//!
//! [`MongoCollection`] implements [`DocumentCollection`] over the official
//! driver, and [`MongoConnection`] owns the pooled client the collections
//! share.
//!
//! # Example
//!
//! ```rust,no_run
//! use fixtura_core::Fixture;
//! use fixtura_mongodb::MongoConnection;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let connection = MongoConnection::builder()
//!     .url("mongodb://localhost:27017")
//!     .database("app")
//!     .build()
//!     .await?;
//!
//! let fixture = Fixture::builder("users")
//!     .bind("user_name", Arc::new(connection.collection("accounts")))
//!     .keys(["alan", "neil"])
//!     .build()?;
//!
//! fixture.get().await?;
//! # Ok(())
//! # }
//! ```
//!
//! [`DocumentCollection`]: fixtura_core::DocumentCollection

pub mod collection;
pub mod connection;
pub mod provider;

pub use collection::MongoCollection;
pub use connection::{MongoConnection, MongoConnectionBuilder};
pub use provider::MongoCollectionProvider;
