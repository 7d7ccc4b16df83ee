//! Wire types for dbs.
//!
//! This crate contains the serde-serializable types read from configuration
//! files and statement strings. These types represent the "protocol layer":
//! the shapes of data as they appear on disk or in a statement.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond serialization and simple lookups
//! * camelCase on the wire
//! * Stable: Changes only when the file or statement format changes
//!
//! Session handling and backends are built on top of these types in `dbs-rs`.

pub mod config;
pub mod profile;
pub mod statement;

pub use config::*;
pub use profile::*;
pub use statement::*;
