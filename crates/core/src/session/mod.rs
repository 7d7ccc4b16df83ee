//! Session lifecycle for database actions.
//!
//! A [`SessionedCrudDelegate`] keeps one authenticated connection per active
//! profile, re-authenticates after an idle period, and forwards every CRUD
//! statement to a [`DatabaseBackend`](crate::DatabaseBackend).

pub mod config;
pub mod delegate;
/// Connected/disconnected session state.
mod state;


pub use config::SessionConfig;
pub use delegate::SessionedCrudDelegate;
pub use state::SessionStats;
