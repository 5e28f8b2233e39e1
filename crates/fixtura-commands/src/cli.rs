//! CLI runner for the `fixtura` command.
//!
//! Parses arguments, loads settings, connects to the database, registers the
//! fixtures declared in the settings file and runs the requested command
//! against every registered fixture.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fixtura_core::{FixtureRegistry, RunSummary, global_registry};
use fixtura_mongodb::{MongoCollectionProvider, MongoConnection};
use tracing::info;

use crate::commands::{CommandOptions, FixtureCommand, GetCommand, LoadCommand};
use crate::error::CommandResult;
use crate::logging::init_logging;
use crate::settings::FixturaSettings;

/// Fixture management CLI
///
/// This is the CLI parser used by `execute_from_command_line()`.
/// Can also be used directly for testing CLI parsing behavior.
#[derive(Debug, Parser)]
#[command(name = "fixtura")]
#[command(about = "Snapshot and reload document-database fixtures", long_about = None)]
#[command(version)]
pub struct Cli {
	/// Subcommand to execute
	#[command(subcommand)]
	pub command: Commands,

	/// Settings file (default: fixtura.toml)
	#[arg(short, long, global = true, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// MongoDB connection string
	#[arg(long, global = true, value_name = "URI")]
	pub uri: Option<String>,

	/// Database name
	#[arg(long, global = true, value_name = "NAME")]
	pub database: Option<String>,

	/// Verbosity level (can be repeated for more output)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbosity: u8,
}

/// Fixture commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Commands {
	/// Save fixture files into their collections
	Load,

	/// Write matching documents to fixture files
	Get,
}

/// Execute commands from command-line arguments
///
/// Applications with fixtures defined in code register them with
/// [`register_fixture`](fixtura_core::register_fixture) before calling this;
/// fixtures declared in the settings file are registered alongside them.
///
/// # Examples
///
/// ```rust,no_run
/// use fixtura_commands::execute_from_command_line;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = execute_from_command_line().await {
///         eprintln!("Error: {}", e);
///         std::process::exit(1);
///     }
/// }
/// ```
pub async fn execute_from_command_line() -> CommandResult<RunSummary> {
	let cli = Cli::parse();
	init_logging(cli.verbosity);

	let settings = FixturaSettings::load(cli.config.as_deref())?
		.with_env()
		.with_cli(cli.uri, cli.database);

	let connection = connect(&settings).await?;
	let provider = MongoCollectionProvider::new(connection);
	let registry = global_registry();
	registry.register_all(settings.build_fixtures(&provider)?)?;

	run_command(cli.command, registry, cli.verbosity).await
}

/// Creates the database client described by `settings`.
pub async fn connect(settings: &FixturaSettings) -> CommandResult<MongoConnection> {
	let mut builder = MongoConnection::builder()
		.url(&settings.database.uri)
		.database(&settings.database.name);

	if let Some(size) = settings.database.max_pool_size {
		builder = builder.max_pool_size(size);
	}
	if let Some(size) = settings.database.min_pool_size {
		builder = builder.min_pool_size(size);
	}

	let connection = builder.build().await?;
	info!(database = %connection.database_name(), "Connected");
	Ok(connection)
}

/// Execute a command with the given verbosity level
///
/// For most use cases, prefer using `execute_from_command_line()` instead.
pub async fn run_command(
	command: Commands,
	registry: &FixtureRegistry,
	verbosity: u8,
) -> CommandResult<RunSummary> {
	let options = CommandOptions::new().with_verbosity(verbosity);

	match command {
		Commands::Load => LoadCommand::new().execute(registry, &options).await,
		Commands::Get => GetCommand::new().execute(registry, &options).await,
	}
}
