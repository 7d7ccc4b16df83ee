use std::path::PathBuf;

use serde_json::json;
use thiserror::Error;

use crate::output::{CommandError, ErrorCode};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	/// Command failed but its error envelope has already been printed.
	/// Used to signal exit code 1 without additional output.
	#[error("")]
	OutputAlreadyPrinted,

	#[error("config error in {path}: {message}")]
	Config { path: PathBuf, message: String },

	#[error("invalid input: {0}")]
	InvalidInput(String),

	#[error(transparent)]
	Database(#[from] dbs::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl CliError {
	/// Check if this error indicates output has already been printed.
	pub fn is_output_already_printed(&self) -> bool {
		matches!(self, CliError::OutputAlreadyPrinted)
	}

	/// Convert this error to a CommandError for structured output
	pub fn to_command_error(&self) -> CommandError {
		let (code, details) = match self {
			CliError::OutputAlreadyPrinted => (ErrorCode::InternalError, None),
			CliError::Config { path, .. } => (ErrorCode::ConfigError, Some(json!({ "path": path }))),
			CliError::InvalidInput(_) => (ErrorCode::InvalidInput, None),
			CliError::Database(err) => classify_database_error(err),
			CliError::Io(_) => (ErrorCode::IoError, None),
			CliError::Json(_) => (ErrorCode::InternalError, None),
		};

		CommandError {
			code,
			message: self.to_string(),
			details,
		}
	}
}

fn classify_database_error(err: &dbs::Error) -> (ErrorCode, Option<serde_json::Value>) {
	use dbs::Error;

	match err {
		Error::ManagerNotConfigured { app } => (ErrorCode::ConfigError, Some(json!({ "app": app }))),
		Error::NoActiveProfile | Error::EmptyProfileName => (ErrorCode::SessionError, None),
		Error::UnknownProfile { app, profile } => (ErrorCode::AuthError, Some(json!({ "app": app, "profile": profile }))),
		Error::TargetServerNotAllowed { profile, server } => (ErrorCode::AuthError, Some(json!({ "profile": profile, "server": server }))),
		err if err.is_auth_error() => (ErrorCode::AuthError, None),
		Error::EntityNotFound(entity) => (ErrorCode::EntityNotFound, Some(json!({ "entity": entity }))),
		Error::EntityExists(entity) => (ErrorCode::StatementError, Some(json!({ "entity": entity }))),
		Error::InvalidStatement { entity, .. } => (ErrorCode::StatementError, Some(json!({ "entity": entity }))),
		Error::PointerNotFound(pointer) => (ErrorCode::StatementError, Some(json!({ "pointer": pointer }))),
		Error::Io(_) => (ErrorCode::IoError, None),
		_ => (ErrorCode::InternalError, None),
	}
}
