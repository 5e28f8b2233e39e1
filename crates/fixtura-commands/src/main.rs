//! Fixtura CLI
//!
//! Loads fixture files into MongoDB collections and snapshots them back.
//!
//! ## Usage
//!
//! ```bash
//! fixtura load
//! fixtura get --config ci.toml -vv
//! ```

use std::process;

use fixtura_commands::execute_from_command_line;

#[tokio::main]
async fn main() {
	if let Err(e) = execute_from_command_line().await {
		tracing::error!(error = %e, "Command failed");
		eprintln!("Error: {}", e);
		process::exit(1);
	}
}
