use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dbs_protocol::{CreateStatement, DatabaseProfile, DropStatement};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use super::EntityStore;
use super::statement::{apply_set, matches, parse_filter, parse_optional, parse_row, parse_update};
use crate::backend::DatabaseBackend;
use crate::connection::{ConnectionProvider, DatabaseConnection};
use crate::error::{Error, Result};

/// Driver name for process-local stores.
pub const MEMORY_DRIVER: &str = "memory";
/// Driver name for stores persisted to a JSON file.
pub const JSON_FILE_DRIVER: &str = "json-file";

/// Open handle to a JSON store.
#[derive(Debug)]
pub struct JsonStoreConnection {
	store: Arc<Mutex<EntityStore>>,
	path: Option<PathBuf>,
}

impl JsonStoreConnection {
	/// Backing file, if the store is persisted.
	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}

	pub fn entity_names(&self) -> Vec<String> {
		self.store.lock().entity_names().into_iter().map(String::from).collect()
	}

	fn read<T>(&self, op: impl FnOnce(&EntityStore) -> Result<T>) -> Result<T> {
		op(&self.store.lock())
	}

	/// Applies `op` to a copy of the store and commits it once it is written through.
	///
	/// The shared store is left untouched if either `op` or the save fails.
	fn write<T>(&mut self, op: impl FnOnce(&mut EntityStore) -> Result<T>) -> Result<T> {
		let mut store = self.store.lock();
		let mut next = store.clone();
		let out = op(&mut next)?;
		if let Some(path) = &self.path {
			next.save(path)?;
		}
		*store = next;
		Ok(out)
	}
}

/// Opens `memory` and `json-file` connections.
#[derive(Debug, Default)]
pub struct JsonStoreProvider {
	memory: Mutex<HashMap<String, Arc<Mutex<EntityStore>>>>,
}

impl JsonStoreProvider {
	fn memory_store(&self, key: &str) -> Arc<Mutex<EntityStore>> {
		self.memory.lock().entry(key.to_string()).or_default().clone()
	}
}

impl ConnectionProvider<JsonStoreConnection> for JsonStoreProvider {
	fn connect(&self, profile: &DatabaseProfile) -> Result<JsonStoreConnection> {
		match profile.driver.as_str() {
			MEMORY_DRIVER => {
				let key = profile.location.as_deref().unwrap_or(&profile.name);
				debug!(target = "dbs.store", profile = %profile.name, key, "opening memory store");
				Ok(JsonStoreConnection {
					store: self.memory_store(key),
					path: None,
				})
			}
			JSON_FILE_DRIVER => {
				let Some(location) = profile.location.as_deref() else {
					return Err(Error::Connection {
						profile: profile.name.clone(),
						message: "json-file profiles require a location".to_string(),
					});
				};
				let path = PathBuf::from(location);
				let store = EntityStore::load(&path).map_err(|err| Error::Connection {
					profile: profile.name.clone(),
					message: format!("cannot open {}: {err}", path.display()),
				})?;
				debug!(
					target = "dbs.store",
					profile = %profile.name,
					path = %path.display(),
					entities = store.entities.len(),
					"opened json-file store"
				);
				Ok(JsonStoreConnection {
					store: Arc::new(Mutex::new(store)),
					path: Some(path),
				})
			}
			other => Err(Error::UnknownDriver(other.to_string())),
		}
	}

	fn disconnect(&self, handle: JsonStoreConnection) -> Result<()> {
		release(handle);
		Ok(())
	}
}

fn release(handle: JsonStoreConnection) {
	match handle.path() {
		Some(path) => debug!(target = "dbs.store", path = %path.display(), "closed json-file store"),
		None => debug!(target = "dbs.store", "closed memory store"),
	}
}

/// [`DatabaseBackend`] executing JSON statements against a [`JsonStoreConnection`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStoreBackend;

impl DatabaseBackend for JsonStoreBackend {
	type Handle = JsonStoreConnection;

	fn fresh(&self) -> Self {
		JsonStoreBackend
	}

	fn disconnect(&self, connection: DatabaseConnection<JsonStoreConnection>) -> Result<()> {
		release(connection.into_handle());
		Ok(())
	}

	fn read_as_json(&self, connection: &mut DatabaseConnection<JsonStoreConnection>, entity: &str, statement: &str) -> Result<String> {
		let filter = parse_filter(entity, statement)?;
		connection.handle().read(|store| {
			let rows: Vec<&Value> = store.rows(entity)?.iter().filter(|row| matches(row, &filter)).collect();
			Ok(serde_json::to_string(&rows)?)
		})
	}

	fn update(&self, connection: &mut DatabaseConnection<JsonStoreConnection>, entity: &str, statement: &str) -> Result<u64> {
		let update = parse_update(entity, statement)?;
		connection.handle_mut().write(|store| {
			let mut count = 0;
			for row in store.rows_mut(entity)?.iter_mut().filter(|row| matches(row, &update.filter)) {
				if apply_set(row, &update.set) {
					count += 1;
				}
			}
			Ok(count)
		})
	}

	fn delete(&self, connection: &mut DatabaseConnection<JsonStoreConnection>, entity: &str, statement: &str) -> Result<u64> {
		let filter = parse_filter(entity, statement)?;
		connection.handle_mut().write(|store| {
			let rows = store.rows_mut(entity)?;
			let before = rows.len();
			rows.retain(|row| !matches(row, &filter));
			Ok((before - rows.len()) as u64)
		})
	}

	fn insert(&self, connection: &mut DatabaseConnection<JsonStoreConnection>, entity: &str, statement: &str) -> Result<()> {
		let row = parse_row(entity, statement)?;
		connection.handle_mut().write(|store| {
			store.rows_mut(entity)?.push(Value::Object(row));
			Ok(())
		})
	}

	fn insert_batch(&self, connection: &mut DatabaseConnection<JsonStoreConnection>, entity: &str, statements: &[String]) -> Result<u64> {
		let rows = statements.iter().map(|s| parse_row(entity, s)).collect::<Result<Vec<_>>>()?;
		connection.handle_mut().write(|store| {
			let target = store.rows_mut(entity)?;
			let count = rows.len() as u64;
			target.extend(rows.into_iter().map(Value::Object));
			Ok(count)
		})
	}

	fn create(&self, connection: &mut DatabaseConnection<JsonStoreConnection>, entity: &str, statement: &str) -> Result<()> {
		let stmt: CreateStatement = parse_optional(entity, statement)?;
		connection.handle_mut().write(|store| store.create_entity(entity, stmt.if_not_exists).map(|_| ()))
	}

	fn drop(&self, connection: &mut DatabaseConnection<JsonStoreConnection>, entity: &str, statement: &str) -> Result<()> {
		let stmt: DropStatement = parse_optional(entity, statement)?;
		connection.handle_mut().write(|store| store.drop_entity(entity, stmt.if_exists).map(|_| ()))
	}
}
