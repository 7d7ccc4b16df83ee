use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Placeholder written in place of secrets when a profile is displayed.
pub const REDACTED: &str = "********";

/// Named configuration describing how to reach a database target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseProfile {
	/// Profile name. Filled from the enclosing map key when loaded from a config file.
	#[serde(default)]
	pub name: String,
	/// Provider registry key, e.g. `memory` or `json-file`.
	pub driver: String,
	/// Driver-specific location (file path, URL, or store key).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub username: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub password: Option<String>,
	/// Target servers this profile may be used against. Empty means any.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub target_servers: Vec<String>,
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub properties: BTreeMap<String, String>,
}

impl DatabaseProfile {
	pub fn new(name: impl Into<String>, driver: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			driver: driver.into(),
			..Default::default()
		}
	}

	pub fn with_location(mut self, location: impl Into<String>) -> Self {
		self.location = Some(location.into());
		self
	}

	pub fn with_target_server(mut self, server: impl Into<String>) -> Self {
		self.target_servers.push(server.into());
		self
	}

	/// Returns true if the profile may be used against `server`.
	///
	/// A missing server always passes, as does a profile without a server allow-list.
	pub fn allows_server(&self, server: Option<&str>) -> bool {
		match server {
			None => true,
			Some(server) => self.target_servers.is_empty() || self.target_servers.iter().any(|s| s == server),
		}
	}

	/// Returns a copy with the password masked.
	pub fn redacted(&self) -> Self {
		Self {
			password: self.password.as_ref().map(|_| REDACTED.to_string()),
			..self.clone()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn allows_any_server_without_allow_list() {
		let profile = DatabaseProfile::new("qa", "memory");
		assert!(profile.allows_server(None));
		assert!(profile.allows_server(Some("db-eu-1")));
	}

	#[test]
	fn allow_list_restricts_servers() {
		let profile = DatabaseProfile::new("qa", "memory").with_target_server("db-eu-1");
		assert!(profile.allows_server(Some("db-eu-1")));
		assert!(!profile.allows_server(Some("db-us-1")));
		assert!(profile.allows_server(None));
	}

	#[test]
	fn redacted_masks_password_only() {
		let mut profile = DatabaseProfile::new("qa", "json-file").with_location("/tmp/qa.json");
		profile.username = Some("tester".into());
		profile.password = Some("hunter2".into());

		let shown = profile.redacted();
		assert_eq!(shown.password.as_deref(), Some(REDACTED));
		assert_eq!(shown.username.as_deref(), Some("tester"));
		assert_eq!(shown.location, profile.location);
	}

	#[test]
	fn deserializes_camel_case() {
		let profile: DatabaseProfile = serde_json::from_str(r#"{"driver":"memory","targetServers":["a"],"properties":{"k":"v"}}"#).unwrap();
		assert_eq!(profile.driver, "memory");
		assert_eq!(profile.target_servers, vec!["a".to_string()]);
		assert_eq!(profile.properties.get("k").map(String::as_str), Some("v"));
		assert!(profile.name.is_empty());
	}
}
