use dbs_protocol::DatabaseProfile;
use serde::Serialize;

use crate::connection::DatabaseConnection;

/// Counters describing what a delegate has done over its lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
	/// Successful profile authentications, including re-authentications.
	pub authentications: u64,
	/// Connections released.
	pub disconnects: u64,
	/// Re-authentications triggered by an expired session.
	pub expirations: u64,
}

/// A connection is held iff a profile is active.
pub(crate) enum SessionState<H> {
	Disconnected,
	Connected(ActiveSession<H>),
}

pub(crate) struct ActiveSession<H> {
	pub(crate) profile: DatabaseProfile,
	pub(crate) connection: DatabaseConnection<H>,
	pub(crate) last_access_ms: u64,
}

impl<H> SessionState<H> {
	pub(crate) fn active(&self) -> Option<&ActiveSession<H>> {
		match self {
			SessionState::Connected(active) => Some(active),
			SessionState::Disconnected => None,
		}
	}

	pub(crate) fn profile_name(&self) -> Option<&str> {
		self.active().map(|a| a.connection.profile_name())
	}

	pub(crate) fn connection_mut(&mut self) -> Option<&mut DatabaseConnection<H>> {
		match self {
			SessionState::Connected(active) => Some(&mut active.connection),
			SessionState::Disconnected => None,
		}
	}

	/// Moves the active session out, leaving the state disconnected.
	pub(crate) fn take(&mut self) -> Option<ActiveSession<H>> {
		match std::mem::replace(self, SessionState::Disconnected) {
			SessionState::Connected(active) => Some(active),
			SessionState::Disconnected => None,
		}
	}
}
