//! Statement shapes understood by the JSON document store.
//!
//! Search, delete and insert statements are plain JSON objects (a filter or a
//! row), so only the structured statements have dedicated types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Filter object: every key (field name or JSON pointer) must equal its value.
pub type Filter = Map<String, Value>;

/// `{"filter": {...}, "set": {...}}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateStatement {
	#[serde(default)]
	pub filter: Filter,
	pub set: Map<String, Value>,
}

/// `{"ifNotExists": true}`; an empty statement means `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateStatement {
	#[serde(default)]
	pub if_not_exists: bool,
}

/// `{"ifExists": true}`; an empty statement means `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DropStatement {
	#[serde(default)]
	pub if_exists: bool,
}
