//! Log output for the `fixtura` command.

use tracing_subscriber::EnvFilter;

/// Default log level for a `-v` count.
pub fn level_for(verbosity: u8) -> &'static str {
	match verbosity {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	}
}

/// Installs a stderr subscriber; `RUST_LOG` overrides the `-v` level.
///
/// Returns false if a global subscriber was already installed.
pub fn init_logging(verbosity: u8) -> bool {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_writer(std::io::stderr)
		.try_init()
		.is_ok()
}
