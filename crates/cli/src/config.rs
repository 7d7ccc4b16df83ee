//! Config file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use dbs_protocol::DatabaseConfig;
use tracing::debug;

use crate::error::{CliError, Result};

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "DBS_CONFIG";
/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "dbs.json";

/// Where the effective config came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
	Flag(PathBuf),
	Env(PathBuf),
	Local(PathBuf),
	User(PathBuf),
	/// No file found; an empty config is used.
	Default,
}

impl ConfigSource {
	pub fn path(&self) -> Option<&Path> {
		match self {
			ConfigSource::Flag(p) | ConfigSource::Env(p) | ConfigSource::Local(p) | ConfigSource::User(p) => Some(p),
			ConfigSource::Default => None,
		}
	}
}

/// Resolves the config file: `--config`, then `$DBS_CONFIG`, then `./dbs.json`,
/// then `<config dir>/dbs/config.json`.
///
/// Explicit paths (flag or env) are returned even if missing so loading reports them.
pub fn resolve_config_source(flag: Option<&Path>, env: Option<&str>, cwd: &Path) -> ConfigSource {
	if let Some(path) = flag {
		return ConfigSource::Flag(path.to_path_buf());
	}
	if let Some(path) = env.filter(|p| !p.is_empty()) {
		return ConfigSource::Env(PathBuf::from(path));
	}
	let local = cwd.join(LOCAL_CONFIG_FILE);
	if local.is_file() {
		return ConfigSource::Local(local);
	}
	if let Some(user) = user_config_path().filter(|p| p.is_file()) {
		return ConfigSource::User(user);
	}
	ConfigSource::Default
}

fn user_config_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("dbs").join("config.json"))
}

/// Reads and parses the config named by `source`.
pub fn load_config(source: &ConfigSource) -> Result<DatabaseConfig> {
	let Some(path) = source.path() else {
		debug!(target = "dbs.cli", "no config file found; using empty config");
		return Ok(DatabaseConfig::default());
	};

	let content = fs::read_to_string(path).map_err(|err| CliError::Config {
		path: path.to_path_buf(),
		message: err.to_string(),
	})?;
	let config = DatabaseConfig::parse(&content).map_err(|err| CliError::Config {
		path: path.to_path_buf(),
		message: err.to_string(),
	})?;

	debug!(target = "dbs.cli", path = %path.display(), apps = config.apps.len(), "loaded config");
	Ok(config)
}
