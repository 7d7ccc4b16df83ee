//! Session configuration used when constructing a delegate.

use std::time::Duration;

use dbs_protocol::DatabaseConfig;

/// App identity and expiry policy for a [`SessionedCrudDelegate`](super::SessionedCrudDelegate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
	/// Application whose profiles are resolved through the manager.
	pub app_name: String,
	/// Target server passed to the manager when looking up providers.
	pub target_server: Option<String>,
	/// Idle duration after which the next call re-authenticates. Compared in whole seconds.
	pub session_expiry: Duration,
}

impl SessionConfig {
	pub fn new(app_name: impl Into<String>, session_expiry: Duration) -> Self {
		Self {
			app_name: app_name.into(),
			target_server: None,
			session_expiry,
		}
	}

	/// Builds a config for `app_name` using the expiry resolved from `config`.
	pub fn from_config(config: &DatabaseConfig, app_name: &str) -> Self {
		Self::new(app_name, Duration::from_secs(config.session_expiry_secs(app_name)))
	}

	pub fn with_target_server(mut self, server: Option<String>) -> Self {
		self.target_server = server;
		self
	}
}
