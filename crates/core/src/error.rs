//! Error types for session-managed database actions.

use thiserror::Error;

/// Result type alias for dbs operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the session layer, managers, and backends.
#[derive(Debug, Error)]
pub enum Error {
	/// No [`DatabaseManager`](crate::DatabaseManager) was injected before authenticating.
	#[error("no database manager configured for app '{app}'")]
	ManagerNotConfigured { app: String },

	/// A CRUD call was made before any profile was activated.
	#[error("no active database profile; activate one before issuing statements")]
	NoActiveProfile,

	#[error("database profile name must not be empty")]
	EmptyProfileName,

	#[error("unknown app '{0}'")]
	UnknownApp(String),

	#[error("unknown database profile '{profile}' for app '{app}'")]
	UnknownProfile { app: String, profile: String },

	/// No connection provider is registered for the profile's driver.
	#[error("no connection provider registered for driver '{0}'")]
	UnknownDriver(String),

	#[error("profile '{profile}' is not allowed on target server '{server}'")]
	TargetServerNotAllowed { profile: String, server: String },

	/// Authentication or connection setup failed.
	#[error("failed to connect profile '{profile}': {message}")]
	Connection { profile: String, message: String },

	#[error("entity not found: {0}")]
	EntityNotFound(String),

	#[error("entity already exists: {0}")]
	EntityExists(String),

	#[error("invalid statement for '{entity}': {message}")]
	InvalidStatement { entity: String, message: String },

	/// A JSON pointer did not resolve inside a document.
	#[error("no value at JSON pointer '{0}'")]
	PointerNotFound(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl Error {
	pub(crate) fn invalid_statement(entity: &str, message: impl Into<String>) -> Self {
		Error::InvalidStatement {
			entity: entity.to_string(),
			message: message.into(),
		}
	}

	/// Returns true for errors raised while resolving or authenticating a profile.
	pub fn is_auth_error(&self) -> bool {
		matches!(
			self,
			Error::UnknownApp(_)
				| Error::UnknownProfile { .. }
				| Error::UnknownDriver(_)
				| Error::TargetServerNotAllowed { .. }
				| Error::Connection { .. }
		)
	}
}
