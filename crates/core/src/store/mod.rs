//! JSON document store backend.
//!
//! Every entity is an array of JSON objects. Two drivers share one provider:
//! `memory` keeps stores in process (shared across reconnects of the same
//! location), and `json-file` persists a store to a JSON file, writing
//! through on every mutation.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use dbs_protocol::DatabaseConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::manager::ProfileManager;
use crate::session::SessionedCrudDelegate;

mod driver;
mod statement;


pub use driver::{JSON_FILE_DRIVER, JsonStoreBackend, JsonStoreConnection, JsonStoreProvider, MEMORY_DRIVER};

/// Driver names registered by [`manager`].
pub const DRIVERS: [&str; 2] = [JSON_FILE_DRIVER, MEMORY_DRIVER];

/// Current schema version for store files.
pub const STORE_SCHEMA_VERSION: u32 = 1;

/// Session delegate over the JSON store backend.
pub type JsonStoreDelegate = SessionedCrudDelegate<JsonStoreBackend>;

/// Builds a [`ProfileManager`] with the `memory` and `json-file` drivers registered.
pub fn manager(config: DatabaseConfig) -> ProfileManager<JsonStoreConnection> {
	let provider = Arc::new(JsonStoreProvider::default());
	ProfileManager::new(config)
		.with_provider(MEMORY_DRIVER, provider.clone())
		.with_provider(JSON_FILE_DRIVER, provider)
}

fn default_schema() -> u32 {
	STORE_SCHEMA_VERSION
}

/// On-disk format for a store file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityStore {
	#[serde(default = "default_schema")]
	pub schema: u32,
	#[serde(default)]
	pub entities: BTreeMap<String, Vec<Value>>,
}

impl Default for EntityStore {
	fn default() -> Self {
		Self {
			schema: STORE_SCHEMA_VERSION,
			entities: BTreeMap::new(),
		}
	}
}

impl EntityStore {
	/// Loads a store file. A missing file yields an empty store.
	pub fn load(path: &Path) -> Result<Self> {
		match fs::read_to_string(path) {
			Ok(content) => Ok(serde_json::from_str(&content)?),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
			Err(err) => Err(err.into()),
		}
	}

	/// Writes the store to a sibling temp file and renames it over `path`.
	pub fn save(&self, path: &Path) -> Result<()> {
		let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
		fs::create_dir_all(dir)?;
		let mut tmp = NamedTempFile::new_in(dir)?;
		serde_json::to_writer_pretty(tmp.as_file_mut(), self)?;
		tmp.as_file_mut().flush()?;
		tmp.persist(path).map_err(|err| err.error)?;
		Ok(())
	}

	pub fn entity_names(&self) -> Vec<&str> {
		self.entities.keys().map(String::as_str).collect()
	}

	pub fn contains(&self, entity: &str) -> bool {
		self.entities.contains_key(entity)
	}

	pub fn rows(&self, entity: &str) -> Result<&[Value]> {
		self.entities
			.get(entity)
			.map(Vec::as_slice)
			.ok_or_else(|| Error::EntityNotFound(entity.to_string()))
	}

	pub fn rows_mut(&mut self, entity: &str) -> Result<&mut Vec<Value>> {
		self.entities.get_mut(entity).ok_or_else(|| Error::EntityNotFound(entity.to_string()))
	}

	/// Creates an empty entity. Returns false if it existed and `if_not_exists` is set.
	pub fn create_entity(&mut self, entity: &str, if_not_exists: bool) -> Result<bool> {
		if self.contains(entity) {
			if if_not_exists {
				return Ok(false);
			}
			return Err(Error::EntityExists(entity.to_string()));
		}
		self.entities.insert(entity.to_string(), Vec::new());
		Ok(true)
	}

	/// Removes an entity and its rows. Returns false if it was absent and `if_exists` is set.
	pub fn drop_entity(&mut self, entity: &str, if_exists: bool) -> Result<bool> {
		if self.entities.remove(entity).is_some() {
			return Ok(true);
		}
		if if_exists { Ok(false) } else { Err(Error::EntityNotFound(entity.to_string())) }
	}
}
