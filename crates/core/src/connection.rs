//! Connection handles and the providers that open them.

use dbs_protocol::DatabaseProfile;

use crate::error::Result;

/// Opens and releases backend handles for a profile.
///
/// `connect` is the authentication step: a failure here is surfaced to the
/// caller unchanged, without retries.
pub trait ConnectionProvider<H>: Send + Sync {
	fn connect(&self, profile: &DatabaseProfile) -> Result<H>;

	fn disconnect(&self, handle: H) -> Result<()>;
}

/// An authenticated handle together with the profile it was opened for.
#[derive(Debug)]
pub struct DatabaseConnection<H> {
	profile_name: String,
	opened_at_ms: u64,
	handle: H,
}

impl<H> DatabaseConnection<H> {
	pub fn new(profile_name: impl Into<String>, opened_at_ms: u64, handle: H) -> Self {
		Self {
			profile_name: profile_name.into(),
			opened_at_ms,
			handle,
		}
	}

	pub fn profile_name(&self) -> &str {
		&self.profile_name
	}

	pub fn opened_at_ms(&self) -> u64 {
		self.opened_at_ms
	}

	pub fn handle(&self) -> &H {
		&self.handle
	}

	pub fn handle_mut(&mut self) -> &mut H {
		&mut self.handle
	}

	/// Consumes the connection, returning the raw handle for release.
	pub fn into_handle(self) -> H {
		self.handle
	}
}
