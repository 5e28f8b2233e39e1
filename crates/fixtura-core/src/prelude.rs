//! Convenience re-exports for common usage.
//!
//! # Example
//!
//! ```ignore
//! use fixtura_core::prelude::*;
//! ```

// Error types
pub use crate::error::{CollectionError, CollectionResult, FixtureError, FixtureResult};

// Collection capability
pub use crate::collection::{CollectionHandle, DocumentCollection, Named, Operation, RemoveOutcome};

// Fixture types
pub use crate::definition::{CollectionProvider, FixtureDefinition};
pub use crate::fixture::{Fixture, FixtureBuilder};
pub use crate::format::ExtJsonMode;

// Registry
pub use crate::registry::{
	FixtureAction, FixtureRegistry, RunSummary, register_fixture, registered_fixtures,
};

pub use async_trait::async_trait;
pub use bson::{Bson, Document, doc};
