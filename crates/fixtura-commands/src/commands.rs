//! The `load` and `get` commands.
//!
//! Each command runs one [`FixtureAction`] against every fixture in a
//! registry, in registration order, and stops at the first failure.

use async_trait::async_trait;
use fixtura_core::{FixtureAction, FixtureRegistry, RunSummary};
use tracing::warn;

use crate::error::CommandResult;

/// Options shared by the fixture commands.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
	/// Verbosity level.
	pub verbosity: u8,
}

impl CommandOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets verbosity level.
	pub fn with_verbosity(mut self, level: u8) -> Self {
		self.verbosity = level;
		self
	}
}

/// A command that runs one action over every registered fixture.
#[async_trait]
pub trait FixtureCommand: Send + Sync {
	/// Action run against each fixture.
	const ACTION: FixtureAction;

	/// Returns the command name.
	fn name(&self) -> &str;

	/// Returns the command description.
	fn description(&self) -> &str;

	/// Returns the command help text.
	fn help(&self) -> &str;

	/// Past-tense verb used in the summary.
	fn verb(&self) -> &str;

	/// Runs the command against every fixture in `registry`.
	async fn execute(
		&self,
		registry: &FixtureRegistry,
		options: &CommandOptions,
	) -> CommandResult<RunSummary> {
		if registry.is_empty() {
			warn!(command = %self.name(), "No fixtures registered");
		}

		let summary = registry.run(Self::ACTION).await?;
		self.print_result(&summary, options);
		Ok(summary)
	}

	/// Prints the run summary.
	fn print_result(&self, summary: &RunSummary, options: &CommandOptions) {
		if options.verbosity > 0 {
			for (fixture, count) in &summary.counts {
				println!("  {}: {} document(s)", fixture, count);
			}
		}
		println!(
			"{} {} document(s) across {} fixture(s)",
			self.verb(),
			summary.total(),
			summary.counts.len()
		);
	}
}

/// Saves every fixture file into its collections.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoadCommand;

impl LoadCommand {
	/// Creates a new load command.
	pub fn new() -> Self {
		Self
	}
}

#[async_trait]
impl FixtureCommand for LoadCommand {
	const ACTION: FixtureAction = FixtureAction::Load;

	fn name(&self) -> &str {
		"load"
	}

	fn description(&self) -> &str {
		"Saves fixture files into their collections"
	}

	fn help(&self) -> &str {
		r#"
Usage: fixtura load [options]

Reads each binding's fixture file and saves every document into the bound
collection. Documents with an _id replace any stored document with that id.

Options:
  --config PATH       Settings file (default: fixtura.toml)
  --uri URI           MongoDB connection string
  --database NAME     Database name
  -v, --verbosity     Increase log output (repeatable)
"#
	}

	fn verb(&self) -> &str {
		"Loaded"
	}
}

/// Snapshots the matching documents of every fixture into files.
#[derive(Debug, Default, Clone, Copy)]
pub struct GetCommand;

impl GetCommand {
	/// Creates a new get command.
	pub fn new() -> Self {
		Self
	}
}

#[async_trait]
impl FixtureCommand for GetCommand {
	const ACTION: FixtureAction = FixtureAction::Get;

	fn name(&self) -> &str {
		"get"
	}

	fn description(&self) -> &str {
		"Writes matching documents to fixture files"
	}

	fn help(&self) -> &str {
		r#"
Usage: fixtura get [options]

Finds the documents whose key field matches one of the fixture keys in each
bound collection and overwrites the binding's fixture file with them.

Options:
  --config PATH       Settings file (default: fixtura.toml)
  --uri URI           MongoDB connection string
  --database NAME     Database name
  -v, --verbosity     Increase log output (repeatable)
"#
	}

	fn verb(&self) -> &str {
		"Wrote"
	}
}
