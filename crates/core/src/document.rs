//! Navigable JSON documents returned by search statements.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// Parsed search result addressed with JSON pointers (RFC 6901).
#[derive(Debug, Clone, PartialEq)]
pub struct JsonDocument {
	root: Value,
}

impl JsonDocument {
	pub fn parse(json: &str) -> Result<Self> {
		Ok(Self {
			root: serde_json::from_str(json)?,
		})
	}

	pub fn root(&self) -> &Value {
		&self.root
	}

	pub fn into_value(self) -> Value {
		self.root
	}

	/// Returns the value at `pointer`; an empty pointer addresses the root.
	pub fn get(&self, pointer: &str) -> Option<&Value> {
		self.root.pointer(pointer)
	}

	/// Deserializes the value at `pointer`.
	pub fn read<T: DeserializeOwned>(&self, pointer: &str) -> Result<T> {
		let value = self.get(pointer).ok_or_else(|| Error::PointerNotFound(pointer.to_string()))?;
		Ok(T::deserialize(value)?)
	}

	/// Number of rows when the root is an array, otherwise 1 for any non-null value.
	pub fn len(&self) -> usize {
		match &self.root {
			Value::Array(rows) => rows.len(),
			Value::Null => 0,
			_ => 1,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
