//! Payload types carried in the `data` field of command results.

use std::path::PathBuf;

use dbs::{DatabaseProfile, SessionStats};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rows returned by `search`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchData {
	pub entity: String,
	pub count: usize,
	pub rows: Value,
}

/// A single value read from a search result with `--pointer`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerData {
	pub entity: String,
	pub pointer: String,
	pub value: Value,
}

/// Row counts for insert, update and delete.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationData {
	pub entity: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub inserted: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub updated: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub deleted: Option<u64>,
}

impl MutationData {
	pub fn inserted(entity: &str, count: u64) -> Self {
		Self {
			entity: entity.to_string(),
			inserted: Some(count),
			updated: None,
			deleted: None,
		}
	}

	pub fn updated(entity: &str, count: u64) -> Self {
		Self {
			entity: entity.to_string(),
			inserted: None,
			updated: Some(count),
			deleted: None,
		}
	}

	pub fn deleted(entity: &str, count: u64) -> Self {
		Self {
			entity: entity.to_string(),
			inserted: None,
			updated: None,
			deleted: Some(count),
		}
	}
}

/// Outcome of `create` or `drop`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityData {
	pub entity: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub created: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub dropped: Option<bool>,
}

/// Session and configuration state reported by `status`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusData {
	pub app: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub config_path: Option<PathBuf>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub target_server: Option<String>,
	pub session_expiry_secs: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub default_profile: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub active_profile: Option<String>,
	pub connected: bool,
	pub expired: bool,
	pub drivers: Vec<String>,
	/// Entities in the active store, when connected.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub entities: Option<Vec<String>>,
	pub stats: SessionStats,
}

/// Profile summary in `profile list`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
	pub name: String,
	pub driver: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub target_servers: Vec<String>,
	pub is_default: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileListData {
	pub app: String,
	pub profiles: Vec<ProfileSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileShowData {
	pub app: String,
	pub is_default: bool,
	pub profile: DatabaseProfile,
}
