//! # Fixtura Commands
//!
//! Command-line interface for fixtura.
//!
//! ## Usage
//!
//! ```bash
//! fixtura load --config fixtura.toml
//! fixtura get --database app -v
//! ```
//!
//! Fixtures come from the `[[fixtures]]` tables of the settings file and from
//! anything registered in the process-wide registry before
//! [`execute_from_command_line`] runs.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod settings;

pub use cli::{Cli, Commands, connect, execute_from_command_line, run_command};
pub use commands::{CommandOptions, FixtureCommand, GetCommand, LoadCommand};
pub use error::{CommandError, CommandResult};
pub use logging::init_logging;
pub use settings::{DatabaseSettings, FixturaSettings, OutputSettings};
