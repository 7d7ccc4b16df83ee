//! Session-managed database actions for UI test automation.
//!
//! A [`SessionedCrudDelegate`] owns one authenticated connection for the
//! active database profile. Before every search, insert, update, delete,
//! create, or drop it checks how long the session has been idle and
//! re-authenticates once the configured expiry is reached, then forwards
//! the statement to a [`DatabaseBackend`].
//!
//! Profiles and connection providers are resolved through an injected
//! [`DatabaseManager`]; [`ProfileManager`] implements it over a
//! [`DatabaseConfig`] file. The [`store`] module ships a JSON document store
//! backend with `memory` and `json-file` drivers.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use dbs::{DatabaseConfig, SessionConfig, SessionedCrudDelegate, store};
//!
//! let config = DatabaseConfig::parse(&std::fs::read_to_string("dbs.json")?)?;
//! let session = SessionConfig::from_config(&config, "shop");
//! let mut db = SessionedCrudDelegate::new(session, store::JsonStoreBackend)
//!     .with_manager(Arc::new(store::manager(config)));
//!
//! db.set_active_profile("qa")?;
//! db.insert("users", r#"{"id":1,"name":"Ada"}"#)?;
//! let doc = db.read_as_document("users", r#"{"id":1}"#)?;
//! assert_eq!(doc.read::<String>("/0/name")?, "Ada");
//! ```

pub mod backend;
pub mod clock;
pub mod connection;
pub mod document;
pub mod error;
pub mod manager;
pub mod session;
pub mod store;

pub use backend::DatabaseBackend;
pub use clock::{Clock, ManualClock, SystemClock};
pub use connection::{ConnectionProvider, DatabaseConnection};
pub use dbs_protocol::{AppConfig, DEFAULT_SESSION_EXPIRY_SECS, DatabaseConfig, DatabaseProfile};
pub use document::JsonDocument;
pub use error::{Error, Result};
pub use manager::{DatabaseManager, ProfileManager};
pub use session::{SessionConfig, SessionStats, SessionedCrudDelegate};
