//! Profile resolution and connection-provider lookup.

use std::collections::HashMap;
use std::sync::Arc;

use dbs_protocol::{DatabaseConfig, DatabaseProfile};
use tracing::debug;

use crate::connection::ConnectionProvider;
use crate::error::{Error, Result};

/// Resolves named profiles and the providers that authenticate them.
pub trait DatabaseManager<H>: Send + Sync {
	/// Looks up the profile `profile` configured for `app`.
	fn database_profile(&self, app: &str, profile: &str) -> Result<DatabaseProfile>;

	/// Returns the provider that opens connections for `profile` on `target_server`.
	fn connection_provider(&self, app: &str, target_server: Option<&str>, profile: &str) -> Result<Arc<dyn ConnectionProvider<H>>>;
}

/// [`DatabaseManager`] backed by a [`DatabaseConfig`] and a driver registry.
pub struct ProfileManager<H> {
	config: DatabaseConfig,
	providers: HashMap<String, Arc<dyn ConnectionProvider<H>>>,
}

impl<H> ProfileManager<H> {
	pub fn new(config: DatabaseConfig) -> Self {
		Self {
			config,
			providers: HashMap::new(),
		}
	}

	/// Registers `provider` for profiles whose `driver` equals `driver`.
	pub fn with_provider(mut self, driver: impl Into<String>, provider: Arc<dyn ConnectionProvider<H>>) -> Self {
		self.register_provider(driver, provider);
		self
	}

	pub fn register_provider(&mut self, driver: impl Into<String>, provider: Arc<dyn ConnectionProvider<H>>) {
		self.providers.insert(driver.into(), provider);
	}

	/// Registered driver names, sorted.
	pub fn drivers(&self) -> Vec<&str> {
		let mut drivers: Vec<&str> = self.providers.keys().map(String::as_str).collect();
		drivers.sort_unstable();
		drivers
	}

	fn lookup(&self, app: &str, profile: &str) -> Result<&DatabaseProfile> {
		let Some(app_config) = self.config.app(app) else {
			return Err(Error::UnknownApp(app.to_string()));
		};
		app_config.profiles.get(profile).ok_or_else(|| Error::UnknownProfile {
			app: app.to_string(),
			profile: profile.to_string(),
		})
	}
}

impl<H> DatabaseManager<H> for ProfileManager<H> {
	fn database_profile(&self, app: &str, profile: &str) -> Result<DatabaseProfile> {
		let mut found = self.lookup(app, profile)?.clone();
		if found.name.is_empty() {
			found.name = profile.to_string();
		}
		Ok(found)
	}

	fn connection_provider(&self, app: &str, target_server: Option<&str>, profile: &str) -> Result<Arc<dyn ConnectionProvider<H>>> {
		let found = self.lookup(app, profile)?;
		if !found.allows_server(target_server) {
			return Err(Error::TargetServerNotAllowed {
				profile: profile.to_string(),
				server: target_server.unwrap_or_default().to_string(),
			});
		}

		debug!(
			target = "dbs.manager",
			app,
			profile,
			driver = %found.driver,
			server = ?target_server,
			"resolved connection provider"
		);

		self.providers.get(&found.driver).cloned().ok_or_else(|| {
			debug!(target = "dbs.manager", driver = %found.driver, registered = ?self.drivers(), "no provider for driver");
			Error::UnknownDriver(found.driver.clone())
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct NullProvider;

	impl ConnectionProvider<()> for NullProvider {
		fn connect(&self, _profile: &DatabaseProfile) -> Result<()> {
			Ok(())
		}

		fn disconnect(&self, _handle: ()) -> Result<()> {
			Ok(())
		}
	}

	fn manager() -> ProfileManager<()> {
		let mut config = DatabaseConfig::default();
		config.insert_profile("shop", DatabaseProfile::new("qa", "null"));
		config.insert_profile("shop", DatabaseProfile::new("eu", "null").with_target_server("db-eu"));
		config.insert_profile("shop", DatabaseProfile::new("legacy", "oracle"));
		ProfileManager::new(config).with_provider("null", Arc::new(NullProvider))
	}

	#[test]
	fn resolves_profile_by_app_and_name() {
		let profile = manager().database_profile("shop", "qa").unwrap();
		assert_eq!(profile.name, "qa");
		assert_eq!(profile.driver, "null");
	}

	#[test]
	fn unknown_app_and_profile_are_distinct_errors() {
		let manager = manager();
		assert!(matches!(manager.database_profile("bank", "qa"), Err(Error::UnknownApp(app)) if app == "bank"));
		assert!(matches!(
			manager.database_profile("shop", "prod"),
			Err(Error::UnknownProfile { profile, .. }) if profile == "prod"
		));
	}

	#[test]
	fn provider_requires_registered_driver() {
		let err = manager().connection_provider("shop", None, "legacy").err().unwrap();
		assert!(matches!(err, Error::UnknownDriver(driver) if driver == "oracle"));
	}

	#[test]
	fn provider_honors_target_server_allow_list() {
		let manager = manager();
		assert!(manager.connection_provider("shop", Some("db-eu"), "eu").is_ok());
		assert!(manager.connection_provider("shop", None, "eu").is_ok());
		let err = manager.connection_provider("shop", Some("db-us"), "eu").err().unwrap();
		assert!(matches!(err, Error::TargetServerNotAllowed { server, .. } if server == "db-us"));
	}

	#[test]
	fn drivers_are_sorted() {
		let manager = manager().with_provider("memory", Arc::new(NullProvider));
		assert_eq!(manager.drivers(), vec!["memory", "null"]);
	}
}
