use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::profile::DatabaseProfile;

/// Current schema version for config files.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Idle duration after which a session is re-authenticated, unless overridden.
pub const DEFAULT_SESSION_EXPIRY_SECS: u64 = 300;

fn default_schema() -> u32 {
	CONFIG_SCHEMA_VERSION
}

fn default_session_expiry_secs() -> u64 {
	DEFAULT_SESSION_EXPIRY_SECS
}

/// On-disk format for a database config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConfig {
	#[serde(default = "default_schema")]
	pub schema: u32,
	#[serde(default = "default_session_expiry_secs")]
	pub session_expiry_secs: u64,
	#[serde(default)]
	pub apps: BTreeMap<String, AppConfig>,
}

/// Profiles and session policy for one application under test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
	/// Overrides [`DatabaseConfig::session_expiry_secs`] for this app.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session_expiry_secs: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub default_profile: Option<String>,
	#[serde(default)]
	pub profiles: BTreeMap<String, DatabaseProfile>,
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		Self {
			schema: CONFIG_SCHEMA_VERSION,
			session_expiry_secs: DEFAULT_SESSION_EXPIRY_SECS,
			apps: BTreeMap::new(),
		}
	}
}

impl DatabaseConfig {
	/// Parses a config document and fills profile names from their map keys.
	pub fn parse(content: &str) -> serde_json::Result<Self> {
		let mut config: Self = serde_json::from_str(content)?;
		config.normalize();
		Ok(config)
	}

	/// Copies map keys into [`DatabaseProfile::name`] and upgrades a zero schema.
	pub fn normalize(&mut self) {
		if self.schema == 0 {
			self.schema = CONFIG_SCHEMA_VERSION;
		}
		for app in self.apps.values_mut() {
			for (name, profile) in app.profiles.iter_mut() {
				profile.name = name.clone();
			}
		}
	}

	/// Adds or replaces a profile, creating the app entry if needed.
	pub fn insert_profile(&mut self, app: &str, profile: DatabaseProfile) {
		self.apps.entry(app.to_string()).or_default().profiles.insert(profile.name.clone(), profile);
	}

	pub fn app(&self, app: &str) -> Option<&AppConfig> {
		self.apps.get(app)
	}

	pub fn profile(&self, app: &str, name: &str) -> Option<&DatabaseProfile> {
		self.app(app).and_then(|a| a.profiles.get(name))
	}

	/// Effective session expiry for `app`, in seconds.
	pub fn session_expiry_secs(&self, app: &str) -> u64 {
		self.app(app).and_then(|a| a.session_expiry_secs).unwrap_or(self.session_expiry_secs)
	}

	/// The profile used when none is requested: the app default, or its only profile.
	pub fn default_profile(&self, app: &str) -> Option<&str> {
		let app = self.app(app)?;
		if let Some(name) = app.default_profile.as_deref() {
			return Some(name);
		}
		if app.profiles.len() == 1 {
			return app.profiles.keys().next().map(String::as_str);
		}
		None
	}
}
