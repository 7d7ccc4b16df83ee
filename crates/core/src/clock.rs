//! Time sources for session expiry checks.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Millisecond clock consulted on every session access.
pub trait Clock: Send + Sync {
	/// Milliseconds since the Unix epoch.
	fn now_ms(&self) -> u64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now_ms(&self) -> u64 {
		SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
	}
}

/// Manually driven clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
	now_ms: Arc<AtomicU64>,
}

impl ManualClock {
	pub fn new(start_ms: u64) -> Self {
		Self {
			now_ms: Arc::new(AtomicU64::new(start_ms)),
		}
	}

	pub fn set_ms(&self, now_ms: u64) {
		self.now_ms.store(now_ms, Ordering::SeqCst);
	}

	pub fn advance(&self, by: Duration) {
		self.now_ms.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
	}
}

impl Clock for ManualClock {
	fn now_ms(&self) -> u64 {
		self.now_ms.load(Ordering::SeqCst)
	}
}
