//! Fixture registry.
//!
//! Fixtures are registered explicitly, either into a [`FixtureRegistry`]
//! owned by the caller or into the process-wide default registry through
//! [`register_fixture`]. Names are unique; a duplicate is rejected when it is
//! registered, before any operation can run.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::{FixtureError, FixtureResult};
use crate::fixture::Fixture;

/// Operation run against every registered fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureAction {
	/// Save fixture files into their collections.
	Load,
	/// Snapshot collections into fixture files.
	Get,
	/// Remove fixture documents from their collections.
	Clear,
}

impl FixtureAction {
	/// Lowercase action name.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Load => "load",
			Self::Get => "get",
			Self::Clear => "clear",
		}
	}

	/// Runs this action against a single fixture.
	pub async fn run(&self, fixture: &Fixture) -> FixtureResult<u64> {
		match self {
			Self::Load => fixture.load().await,
			Self::Get => fixture.get().await,
			Self::Clear => fixture.clear().await,
		}
	}
}

impl fmt::Display for FixtureAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Per-fixture counts from a registry-wide run, in registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
	/// Action that was run.
	pub action: FixtureAction,
	/// Fixture name and the count it resolved to.
	pub counts: Vec<(String, u64)>,
}

impl RunSummary {
	/// Sum of all fixture counts.
	pub fn total(&self) -> u64 {
		self.counts.iter().map(|(_, count)| count).sum()
	}
}

/// Registry of fixtures, keyed by name in registration order.
#[derive(Default)]
pub struct FixtureRegistry {
	fixtures: RwLock<IndexMap<String, Arc<Fixture>>>,
}

impl FixtureRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `fixture`.
	///
	/// # Errors
	///
	/// Returns [`FixtureError::Registry`] if a fixture with the same name is
	/// already registered; the registry is left unchanged.
	pub fn register(&self, fixture: Fixture) -> FixtureResult<Arc<Fixture>> {
		let mut fixtures = self.fixtures.write();
		if fixtures.contains_key(fixture.name()) {
			return Err(duplicate(fixture.name()));
		}

		let fixture = Arc::new(fixture);
		fixtures.insert(fixture.name().to_string(), Arc::clone(&fixture));
		debug!(fixture = %fixture.name(), "Registered fixture");
		Ok(fixture)
	}

	/// Registers every fixture in `fixtures`, or none of them.
	///
	/// # Errors
	///
	/// Returns [`FixtureError::Registry`] if any name is already registered or
	/// appears twice in the batch.
	pub fn register_all<I>(&self, fixtures: I) -> FixtureResult<()>
	where
		I: IntoIterator<Item = Fixture>,
	{
		let batch: Vec<Fixture> = fixtures.into_iter().collect();
		let mut registered = self.fixtures.write();

		let mut seen = std::collections::HashSet::with_capacity(batch.len());
		for fixture in &batch {
			if registered.contains_key(fixture.name()) || !seen.insert(fixture.name()) {
				return Err(duplicate(fixture.name()));
			}
		}

		for fixture in batch {
			registered.insert(fixture.name().to_string(), Arc::new(fixture));
		}
		Ok(())
	}

	/// Returns the fixture called `name`.
	pub fn get(&self, name: &str) -> Option<Arc<Fixture>> {
		self.fixtures.read().get(name).cloned()
	}

	/// Checks if a fixture is registered under `name`.
	pub fn contains(&self, name: &str) -> bool {
		self.fixtures.read().contains_key(name)
	}

	/// Registered names in registration order.
	pub fn names(&self) -> Vec<String> {
		self.fixtures.read().keys().cloned().collect()
	}

	/// Registered fixtures in registration order.
	pub fn fixtures(&self) -> Vec<Arc<Fixture>> {
		self.fixtures.read().values().cloned().collect()
	}

	/// Returns the number of registered fixtures.
	pub fn len(&self) -> usize {
		self.fixtures.read().len()
	}

	/// Returns true if no fixtures are registered.
	pub fn is_empty(&self) -> bool {
		self.fixtures.read().is_empty()
	}

	/// Removes every fixture.
	pub fn clear(&self) {
		self.fixtures.write().clear();
	}

	/// Runs `action` against every fixture, one fixture at a time.
	///
	/// Stops at the first failing fixture.
	pub async fn run(&self, action: FixtureAction) -> FixtureResult<RunSummary> {
		// Snapshot so no lock is held across an await.
		let fixtures = self.fixtures();
		let mut counts = Vec::with_capacity(fixtures.len());

		for fixture in fixtures {
			let count = action.run(&fixture).await?;
			counts.push((fixture.name().to_string(), count));
		}

		let summary = RunSummary { action, counts };
		info!(
			action = %action,
			fixtures = summary.counts.len(),
			total = summary.total(),
			"Finished fixture run"
		);
		Ok(summary)
	}

	/// Loads every registered fixture.
	pub async fn load_all(&self) -> FixtureResult<RunSummary> {
		self.run(FixtureAction::Load).await
	}

	/// Snapshots every registered fixture.
	pub async fn get_all(&self) -> FixtureResult<RunSummary> {
		self.run(FixtureAction::Get).await
	}

	/// Clears every registered fixture.
	pub async fn clear_all(&self) -> FixtureResult<RunSummary> {
		self.run(FixtureAction::Clear).await
	}
}

impl fmt::Debug for FixtureRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FixtureRegistry")
			.field("fixtures", &self.names())
			.finish()
	}
}

fn duplicate(name: &str) -> FixtureError {
	FixtureError::Registry(format!("fixture '{}' is already registered", name))
}

/// Process-wide default registry.
static FIXTURE_REGISTRY: Lazy<FixtureRegistry> = Lazy::new(FixtureRegistry::new);

/// Returns the process-wide default registry.
pub fn global_registry() -> &'static FixtureRegistry {
	&FIXTURE_REGISTRY
}

/// Registers `fixture` in the default registry.
///
/// # Example
///
/// ```rust,ignore
/// register_fixture(
///     Fixture::builder("users")
///         .bind("user_name", accounts)
///         .keys(["alan"])
///         .build()?,
/// )?;
/// ```
pub fn register_fixture(fixture: Fixture) -> FixtureResult<Arc<Fixture>> {
	FIXTURE_REGISTRY.register(fixture)
}

/// Fixtures in the default registry, in registration order.
pub fn registered_fixtures() -> Vec<Arc<Fixture>> {
	FIXTURE_REGISTRY.fixtures()
}

/// Empties the default registry.
///
/// This is primarily useful for testing.
pub fn clear_registry() {
	FIXTURE_REGISTRY.clear();
}
