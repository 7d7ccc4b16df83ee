//! Session-checked CRUD forwarding.

use std::sync::Arc;
use std::time::Duration;

use dbs_protocol::DatabaseProfile;
use tracing::{debug, info};

use super::config::SessionConfig;
use super::state::{ActiveSession, SessionState, SessionStats};
use crate::backend::DatabaseBackend;
use crate::clock::{Clock, SystemClock};
use crate::connection::DatabaseConnection;
use crate::document::JsonDocument;
use crate::error::{Error, Result};
use crate::manager::DatabaseManager;

/// Forwards CRUD statements to a backend while keeping the profile session fresh.
///
/// Every CRUD entry point first checks how long the session has been idle.
/// Once the idle time reaches the configured expiry the current connection
/// is released and the active profile is authenticated again; otherwise the
/// last-access time is refreshed.
pub struct SessionedCrudDelegate<B: DatabaseBackend> {
	config: SessionConfig,
	backend: B,
	manager: Option<Arc<dyn DatabaseManager<B::Handle>>>,
	clock: Arc<dyn Clock>,
	state: SessionState<B::Handle>,
	stats: SessionStats,
}

impl<B: DatabaseBackend> SessionedCrudDelegate<B> {
	/// Creates a disconnected delegate. A manager must be injected before a profile is activated.
	pub fn new(config: SessionConfig, backend: B) -> Self {
		Self {
			config,
			backend,
			manager: None,
			clock: Arc::new(SystemClock),
			state: SessionState::Disconnected,
			stats: SessionStats::default(),
		}
	}

	pub fn with_manager(mut self, manager: Arc<dyn DatabaseManager<B::Handle>>) -> Self {
		self.manager = Some(manager);
		self
	}

	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;
		self
	}

	/// Sets the target server used for subsequent authentications.
	pub fn set_target_server(&mut self, server: Option<String>) {
		self.config.target_server = server;
	}

	pub fn app_name(&self) -> &str {
		&self.config.app_name
	}

	pub fn target_server(&self) -> Option<&str> {
		self.config.target_server.as_deref()
	}

	pub fn session_expiry(&self) -> Duration {
		self.config.session_expiry
	}

	pub fn stats(&self) -> SessionStats {
		self.stats
	}

	pub fn is_connected(&self) -> bool {
		self.state.active().is_some()
	}

	pub fn active_profile_name(&self) -> Option<&str> {
		self.state.profile_name()
	}

	pub fn active_profile(&self) -> Option<&DatabaseProfile> {
		self.state.active().map(|a| &a.profile)
	}

	/// The open connection, without checking expiry or refreshing the access time.
	pub fn connection(&self) -> Option<&DatabaseConnection<B::Handle>> {
		self.state.active().map(|a| &a.connection)
	}

	/// Returns a disconnected delegate with the same configuration, manager, and clock.
	///
	/// The backend is rebuilt through [`DatabaseBackend::fresh`].
	pub fn fresh(&self) -> Self {
		Self {
			config: self.config.clone(),
			backend: self.backend.fresh(),
			manager: self.manager.clone(),
			clock: Arc::clone(&self.clock),
			state: SessionState::Disconnected,
			stats: SessionStats::default(),
		}
	}

	/// Activates `profile_name`, authenticating unless it is already active.
	///
	/// Switching from another profile releases that profile's connection first.
	pub fn set_active_profile(&mut self, profile_name: &str) -> Result<&mut DatabaseConnection<B::Handle>> {
		if profile_name.is_empty() {
			return Err(Error::EmptyProfileName);
		}

		if self.active_profile_name() != Some(profile_name) {
			if let Some(previous) = self.active_profile_name() {
				debug!(
					target = "dbs.session",
					app = %self.config.app_name,
					from = previous,
					to = profile_name,
					"switching database profile"
				);
			}
			self.release()?;
			self.authenticate(profile_name)?;
		}

		self.state.connection_mut().ok_or(Error::NoActiveProfile)
	}

	/// Returns true once the idle time reaches the expiry. Always false while disconnected.
	pub fn is_session_expired(&self) -> bool {
		self.state
			.active()
			.is_some_and(|active| self.is_expired_at(active.last_access_ms, self.clock.now_ms()))
	}

	/// Re-authenticates an expired session, otherwise records the access time.
	pub fn ensure_fresh(&mut self) -> Result<&mut DatabaseConnection<B::Handle>> {
		let now = self.clock.now_ms();
		let expiry = self.config.session_expiry.as_secs();
		let SessionState::Connected(active) = &mut self.state else {
			return Err(Error::NoActiveProfile);
		};

		if idle_secs(active.last_access_ms, now) >= expiry {
			let profile_name = active.connection.profile_name().to_string();
			info!(
				target = "dbs.session",
				app = %self.config.app_name,
				profile = %profile_name,
				expiry_secs = expiry,
				"database session expired; re-authenticating"
			);
			self.release()?;
			self.authenticate(&profile_name)?;
			self.stats.expirations += 1;
		} else {
			active.last_access_ms = now;
		}

		self.state.connection_mut().ok_or(Error::NoActiveProfile)
	}

	/// Releases the current connection. No-op while disconnected.
	pub fn disconnect(&mut self) -> Result<()> {
		self.release()
	}

	/// Runs a search statement and returns the backend's JSON string.
	pub fn read_as_json(&mut self, entity: &str, statement: &str) -> Result<String> {
		self.with_fresh_connection(|backend, conn| backend.read_as_json(conn, entity, statement))
	}

	/// Runs a search statement and parses the result into a navigable document.
	pub fn read_as_document(&mut self, entity: &str, statement: &str) -> Result<JsonDocument> {
		let json = self.read_as_json(entity, statement)?;
		JsonDocument::parse(&json)
	}

	pub fn update(&mut self, entity: &str, statement: &str) -> Result<u64> {
		self.with_fresh_connection(|backend, conn| backend.update(conn, entity, statement))
	}

	pub fn delete(&mut self, entity: &str, statement: &str) -> Result<u64> {
		self.with_fresh_connection(|backend, conn| backend.delete(conn, entity, statement))
	}

	pub fn insert(&mut self, entity: &str, statement: &str) -> Result<()> {
		self.with_fresh_connection(|backend, conn| backend.insert(conn, entity, statement))
	}

	pub fn insert_batch(&mut self, entity: &str, statements: &[String]) -> Result<u64> {
		self.with_fresh_connection(|backend, conn| backend.insert_batch(conn, entity, statements))
	}

	pub fn create(&mut self, entity: &str, statement: &str) -> Result<()> {
		self.with_fresh_connection(|backend, conn| backend.create(conn, entity, statement))
	}

	pub fn drop(&mut self, entity: &str, statement: &str) -> Result<()> {
		self.with_fresh_connection(|backend, conn| backend.drop(conn, entity, statement))
	}

	fn with_fresh_connection<T>(&mut self, op: impl FnOnce(&B, &mut DatabaseConnection<B::Handle>) -> Result<T>) -> Result<T> {
		self.ensure_fresh()?;
		let Self { backend, state, .. } = self;
		let connection = state.connection_mut().ok_or(Error::NoActiveProfile)?;
		op(backend, connection)
	}

	fn is_expired_at(&self, last_access_ms: u64, now_ms: u64) -> bool {
		idle_secs(last_access_ms, now_ms) >= self.config.session_expiry.as_secs()
	}

	fn authenticate(&mut self, profile_name: &str) -> Result<()> {
		let Some(manager) = self.manager.as_ref() else {
			return Err(Error::ManagerNotConfigured {
				app: self.config.app_name.clone(),
			});
		};

		let profile = manager.database_profile(&self.config.app_name, profile_name)?;
		let provider = manager.connection_provider(&self.config.app_name, self.config.target_server.as_deref(), profile_name)?;
		let handle = provider.connect(&profile)?;

		let now = self.clock.now_ms();
		info!(
			target = "dbs.session",
			app = %self.config.app_name,
			profile = profile_name,
			driver = %profile.driver,
			server = ?self.config.target_server,
			"authenticated database profile"
		);

		self.state = SessionState::Connected(ActiveSession {
			profile,
			connection: DatabaseConnection::new(profile_name, now, handle),
			last_access_ms: now,
		});
		self.stats.authentications += 1;
		Ok(())
	}

	fn release(&mut self) -> Result<()> {
		let Some(active) = self.state.take() else {
			return Ok(());
		};

		debug!(
			target = "dbs.session",
			app = %self.config.app_name,
			profile = active.connection.profile_name(),
			"releasing database connection"
		);
		self.stats.disconnects += 1;
		self.backend.disconnect(active.connection)
	}
}

fn idle_secs(last_access_ms: u64, now_ms: u64) -> u64 {
	now_ms.saturating_sub(last_access_ms) / 1000
}
