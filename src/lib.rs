//! # Fixtura
//!
//! Snapshot, reload and clear document-database fixtures.
//!
//! A fixture is a named set of key values plus a list of bindings. Each
//! binding pairs a key field with a collection and owns one Extended JSON
//! file on disk:
//!
//! - `get` finds the documents whose key field holds one of the fixture keys
//!   and overwrites the binding's file with them
//! - `load` saves every document in the binding's file back into the
//!   collection
//! - `clear` removes the matching documents from the collection
//!
//! All bindings of a fixture run concurrently; each operation resolves to a
//! single count summed over the bindings.
//!
//! ## Feature Flags
//!
//! - `mongodb` (default) - MongoDB collections via [`mongodb`](crate::mongodb)
//! - `commands` (default) - the `fixtura` command-line tool
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use fixtura::prelude::*;
//! use fixtura::mongodb::MongoConnection;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let connection = MongoConnection::builder().database("app").build().await?;
//!
//! let users = Fixture::builder("users")
//!     .bind("user_name", Arc::new(connection.collection("accounts")))
//!     .bind("user_name", Arc::new(connection.collection("settings")))
//!     .keys(["alan", "grace"])
//!     .path("fixtures")
//!     .build()?;
//!
//! let written = users.get().await?;
//! let loaded = users.load().await?;
//! assert_eq!(written, loaded);
//! # Ok(())
//! # }
//! ```

pub use fixtura_core::*;

#[cfg(feature = "mongodb")]
pub use fixtura_mongodb as mongodb;

#[cfg(feature = "commands")]
pub use fixtura_commands as commands;
