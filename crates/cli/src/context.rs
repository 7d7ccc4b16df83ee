use std::path::{Path, PathBuf};
use std::sync::Arc;

use dbs::store::{self, JsonStoreBackend, JsonStoreDelegate};
use dbs::{DatabaseConfig, SessionConfig, SessionedCrudDelegate};

use crate::config::{CONFIG_ENV, ConfigSource, load_config, resolve_config_source};
use crate::error::{CliError, Result};
use crate::output::CommandInputs;

/// Global flags and the loaded config shared by every command.
#[derive(Debug)]
pub struct CommandContext {
	config: DatabaseConfig,
	source: ConfigSource,
	app: String,
	profile: Option<String>,
	server: Option<String>,
}

impl CommandContext {
	/// Resolves and loads the config for this process.
	pub fn load(config_flag: Option<&Path>, app: String, profile: Option<String>, server: Option<String>) -> Result<Self> {
		let env = std::env::var(CONFIG_ENV).ok();
		let cwd = std::env::current_dir()?;
		let source = resolve_config_source(config_flag, env.as_deref(), &cwd);
		let config = load_config(&source)?;
		Ok(Self::new(config, source, app, profile, server))
	}

	pub fn new(config: DatabaseConfig, source: ConfigSource, app: String, profile: Option<String>, server: Option<String>) -> Self {
		Self {
			config,
			source,
			app,
			profile,
			server,
		}
	}

	pub fn config(&self) -> &DatabaseConfig {
		&self.config
	}

	pub fn config_path(&self) -> Option<PathBuf> {
		self.source.path().map(Path::to_path_buf)
	}

	pub fn app(&self) -> &str {
		&self.app
	}

	pub fn server(&self) -> Option<&str> {
		self.server.as_deref()
	}

	/// Profile to activate: the requested one, then `--profile`, then the app default.
	pub fn resolve_profile(&self, requested: Option<&str>) -> Result<String> {
		if let Some(name) = requested.or(self.profile.as_deref()) {
			return Ok(name.to_string());
		}
		if let Some(name) = self.config.default_profile(&self.app) {
			return Ok(name.to_string());
		}
		Err(CliError::InvalidInput(format!(
			"no profile selected for app '{}'; pass --profile or set defaultProfile",
			self.app
		)))
	}

	/// Builds a disconnected delegate over the JSON store drivers.
	pub fn delegate(&self) -> JsonStoreDelegate {
		let session = SessionConfig::from_config(&self.config, &self.app).with_target_server(self.server.clone());
		SessionedCrudDelegate::new(session, JsonStoreBackend).with_manager(Arc::new(store::manager(self.config.clone())))
	}

	/// Base inputs echoed in every result.
	pub fn inputs(&self) -> CommandInputs {
		CommandInputs {
			app: Some(self.app.clone()),
			profile: self.profile.clone(),
			..Default::default()
		}
	}
}

#[cfg(test)]
mod tests {
	use dbs::DatabaseProfile;

	use super::*;

	fn context(profile: Option<&str>) -> CommandContext {
		let mut config = DatabaseConfig::default();
		config.insert_profile("shop", DatabaseProfile::new("qa", "memory"));
		config.insert_profile("shop", DatabaseProfile::new("staging", "memory"));
		config.insert_profile("solo", DatabaseProfile::new("only", "memory"));
		CommandContext::new(config, ConfigSource::Default, "shop".into(), profile.map(String::from), None)
	}

	#[test]
	fn requested_profile_wins() {
		let ctx = context(Some("qa"));
		assert_eq!(ctx.resolve_profile(Some("staging")).unwrap(), "staging");
		assert_eq!(ctx.resolve_profile(None).unwrap(), "qa");
	}

	#[test]
	fn ambiguous_app_without_default_is_input_error() {
		let ctx = context(None);
		assert!(matches!(ctx.resolve_profile(None), Err(CliError::InvalidInput(_))));
	}

	#[test]
	fn single_profile_app_resolves_implicitly() {
		let mut ctx = context(None);
		ctx.app = "solo".into();
		assert_eq!(ctx.resolve_profile(None).unwrap(), "only");
	}

	#[test]
	fn delegate_uses_app_expiry() {
		let mut ctx = context(None);
		ctx.config.apps.get_mut("shop").unwrap().session_expiry_secs = Some(42);
		let db = ctx.delegate();
		assert_eq!(db.app_name(), "shop");
		assert_eq!(db.session_expiry().as_secs(), 42);
		assert!(!db.is_connected());
	}
}
