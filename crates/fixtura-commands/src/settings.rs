//! Settings for the `fixtura` command.
//!
//! Settings come from a TOML file, then environment variables, then
//! command-line flags, each overriding the previous source.
//!
//! # Example
//!
//! ```toml
//! [database]
//! uri = "mongodb://localhost:27017"
//! name = "app"
//!
//! [output]
//! mode = "canonical"
//!
//! [[fixtures]]
//! name = "users"
//! keys = ["alan", "neil"]
//! path = "fixtures"
//!
//! [fixtures.collections]
//! user_name = ["accounts", "settings"]
//! ```

use std::path::{Path, PathBuf};

use fixtura_core::{CollectionProvider, ExtJsonMode, Fixture, FixtureDefinition};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{CommandError, CommandResult};

/// Settings file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "fixtura.toml";

/// Overrides `database.uri`.
pub const ENV_DATABASE_URI: &str = "FIXTURA_DATABASE_URI";

/// Overrides `database.name`.
pub const ENV_DATABASE_NAME: &str = "FIXTURA_DATABASE_NAME";

/// Top-level settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixturaSettings {
	/// Database connection.
	pub database: DatabaseSettings,

	/// Fixture file output.
	pub output: OutputSettings,

	/// Declarative fixture definitions, validated when built.
	pub fixtures: Vec<Value>,
}

/// `[database]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseSettings {
	/// Connection string.
	pub uri: String,

	/// Database holding the fixture collections.
	pub name: String,

	/// Maximum connection pool size.
	pub max_pool_size: Option<u32>,

	/// Minimum connection pool size.
	pub min_pool_size: Option<u32>,
}

impl Default for DatabaseSettings {
	fn default() -> Self {
		Self {
			uri: fixtura_mongodb::connection::DEFAULT_URL.to_string(),
			name: fixtura_mongodb::connection::DEFAULT_DATABASE.to_string(),
			max_pool_size: None,
			min_pool_size: None,
		}
	}
}

/// `[output]` section.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
	/// Extended JSON flavour for fixtures that do not set their own.
	pub mode: ExtJsonMode,
}

impl FixturaSettings {
	/// Loads settings from `path`, or from [`DEFAULT_CONFIG_FILE`].
	///
	/// A missing default file yields the defaults; a missing explicit file is
	/// an error.
	pub fn load(path: Option<&Path>) -> CommandResult<Self> {
		Self::load_file(&Self::config_path(path), path.is_some())
	}

	pub(crate) fn load_file(path: &Path, required: bool) -> CommandResult<Self> {
		match std::fs::read_to_string(path) {
			Ok(content) => {
				debug!(path = %path.display(), "Read settings");
				Self::from_toml_str(&content, path)
			}
			Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
				debug!(path = %path.display(), "No settings file, using defaults");
				Ok(Self::default())
			}
			Err(e) => Err(CommandError::Io {
				path: path.to_path_buf(),
				source: e,
			}),
		}
	}

	/// Parses settings; `source` is only used in error messages.
	pub fn from_toml_str(content: &str, source: &Path) -> CommandResult<Self> {
		toml::from_str(content).map_err(|e| CommandError::Settings {
			path: source.to_path_buf(),
			message: e.to_string(),
		})
	}

	/// Applies [`ENV_DATABASE_URI`] and [`ENV_DATABASE_NAME`].
	pub fn with_env(self) -> Self {
		self.with_overrides(|name| std::env::var(name).ok())
	}

	/// Applies overrides looked up by environment variable name.
	pub fn with_overrides<F>(mut self, lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		if let Some(uri) = lookup(ENV_DATABASE_URI).filter(|uri| !uri.is_empty()) {
			self.database.uri = uri;
		}
		if let Some(name) = lookup(ENV_DATABASE_NAME).filter(|name| !name.is_empty()) {
			self.database.name = name;
		}
		self
	}

	/// Applies command-line overrides.
	pub fn with_cli(mut self, uri: Option<String>, database: Option<String>) -> Self {
		if let Some(uri) = uri {
			self.database.uri = uri;
		}
		if let Some(database) = database {
			self.database.name = database;
		}
		self
	}

	/// Builds every declarative fixture, resolving collections via `provider`.
	///
	/// Fixtures without a `mode` use `output.mode`.
	pub fn build_fixtures(&self, provider: &dyn CollectionProvider) -> CommandResult<Vec<Fixture>> {
		self.fixtures
			.iter()
			.map(|definition| {
				let mut definition = definition.clone();
				if let Some(table) = definition.as_object_mut() {
					table
						.entry("mode")
						.or_insert_with(|| Value::String(self.output.mode.to_string()));
				}

				let definition = FixtureDefinition::from_value(&definition, provider)?;
				Ok(Fixture::new(definition)?)
			})
			.collect()
	}

	/// Settings file that [`load`](Self::load) would read for `path`.
	pub fn config_path(path: Option<&Path>) -> PathBuf {
		path.map(Path::to_path_buf)
			.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
	}
}
