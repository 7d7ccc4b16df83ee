//! Per-backend capability interface.

use crate::connection::DatabaseConnection;
use crate::error::Result;

/// Operations a database backend performs on an authenticated connection.
///
/// Statements are free-form strings interpreted by the backend; entity names
/// address a table, collection, or similar unit. The session layer never
/// inspects either.
pub trait DatabaseBackend {
	/// Handle produced by the backend's [`ConnectionProvider`](crate::ConnectionProvider).
	type Handle: Send + 'static;

	/// Creates a new backend instance with the same configuration and no shared state.
	fn fresh(&self) -> Self
	where
		Self: Sized;

	/// Releases a connection. Called before a replacement connection is opened.
	fn disconnect(&self, connection: DatabaseConnection<Self::Handle>) -> Result<()>;

	/// Runs a search statement and returns the matching data as a JSON string.
	fn read_as_json(&self, connection: &mut DatabaseConnection<Self::Handle>, entity: &str, statement: &str) -> Result<String>;

	/// Returns the number of affected records.
	fn update(&self, connection: &mut DatabaseConnection<Self::Handle>, entity: &str, statement: &str) -> Result<u64>;

	/// Returns the number of removed records.
	fn delete(&self, connection: &mut DatabaseConnection<Self::Handle>, entity: &str, statement: &str) -> Result<u64>;

	fn insert(&self, connection: &mut DatabaseConnection<Self::Handle>, entity: &str, statement: &str) -> Result<()>;

	/// Returns the number of inserted records.
	fn insert_batch(&self, connection: &mut DatabaseConnection<Self::Handle>, entity: &str, statements: &[String]) -> Result<u64>;

	fn create(&self, connection: &mut DatabaseConnection<Self::Handle>, entity: &str, statement: &str) -> Result<()>;

	fn drop(&self, connection: &mut DatabaseConnection<Self::Handle>, entity: &str, statement: &str) -> Result<()>;
}
