//! Document-database fixtures.
//!
//! A fixture names a set of documents spread over one or more collections,
//! selected by matching a key field against a list of values. It can:
//!
//! - **get**: snapshot the matching documents into one file per collection
//! - **load**: save every document from those files back into the collections
//! - **clear**: remove the matching documents from the collections
//!
//! Files hold MongoDB Extended JSON, so dates, binary data and numeric types
//! survive the round trip. The store itself is reached only through the
//! [`DocumentCollection`] trait; `fixtura-mongodb` provides an implementation
//! over the official driver.
//!
//! # Quick Start
//!
//! ```ignore
//! use fixtura_core::prelude::*;
//!
//! let fixture = Fixture::builder("users")
//!     .bind_all("user_name", [accounts, settings])
//!     .keys(["alan", "neil"])
//!     .build()?;
//!
//! // Writes test/users.accounts.json and test/users.settings.json
//! let written = fixture.get().await?;
//!
//! // Later, in a fresh database
//! let saved = fixture.load().await?;
//! ```
//!
//! # Registry
//!
//! Fixtures registered with [`register_fixture`] (or a caller-owned
//! [`FixtureRegistry`]) can be run together with
//! [`FixtureRegistry::load_all`], [`FixtureRegistry::get_all`] and
//! [`FixtureRegistry::clear_all`]. Registration rejects duplicate names.

pub mod collection;
pub mod definition;
pub mod error;
pub mod fixture;
pub mod format;
pub mod naming;
pub mod parser;
pub mod prelude;
pub mod query;
pub mod registry;
pub mod serializer;

pub use collection::{CollectionHandle, DocumentCollection, Named, Operation, RemoveOutcome};
pub use definition::{
	Binding, CollectionMap, CollectionProvider, CollectionSpec, FixtureDefinition, parse_bindings,
};
pub use error::{CollectionError, CollectionResult, FixtureError, FixtureResult};
pub use fixture::{Fixture, FixtureBuilder};
pub use format::{DEFAULT_FIXTURE_DIR, ExtJsonMode, FIXTURE_EXTENSION, compute_file_path};
pub use naming::{discover_name, fallback_name, resolve_name};
pub use parser::FixtureParser;
pub use query::{build_query, matches};
pub use registry::{
	FixtureAction, FixtureRegistry, RunSummary, clear_registry, global_registry, register_fixture,
	registered_fixtures,
};
pub use serializer::FixtureSerializer;

// Re-exported so implementors need no direct dependency
pub use async_trait::async_trait;
pub use bson;
