//! Statement parsing and row matching for the JSON store.

use dbs_protocol::{Filter, UpdateStatement};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Parses a statement that may be empty, in which case `T::default()` is used.
pub(crate) fn parse_optional<T: DeserializeOwned + Default>(entity: &str, statement: &str) -> Result<T> {
	if statement.trim().is_empty() {
		return Ok(T::default());
	}
	serde_json::from_str(statement).map_err(|err| Error::invalid_statement(entity, err.to_string()))
}

/// Parses a search/delete filter. Empty text matches every row.
pub(crate) fn parse_filter(entity: &str, statement: &str) -> Result<Filter> {
	if statement.trim().is_empty() {
		return Ok(Filter::new());
	}
	match serde_json::from_str::<Value>(statement) {
		Ok(Value::Object(filter)) => Ok(filter),
		Ok(other) => Err(Error::invalid_statement(entity, format!("filter must be a JSON object, got {}", kind(&other)))),
		Err(err) => Err(Error::invalid_statement(entity, err.to_string())),
	}
}

/// Parses one row to insert. Rows must be JSON objects.
pub(crate) fn parse_row(entity: &str, statement: &str) -> Result<Map<String, Value>> {
	match serde_json::from_str::<Value>(statement) {
		Ok(Value::Object(row)) => Ok(row),
		Ok(other) => Err(Error::invalid_statement(entity, format!("row must be a JSON object, got {}", kind(&other)))),
		Err(err) => Err(Error::invalid_statement(entity, err.to_string())),
	}
}

pub(crate) fn parse_update(entity: &str, statement: &str) -> Result<UpdateStatement> {
	let update: UpdateStatement = serde_json::from_str(statement).map_err(|err| Error::invalid_statement(entity, err.to_string()))?;
	if update.set.is_empty() {
		return Err(Error::invalid_statement(entity, "update must set at least one field"));
	}
	Ok(update)
}

/// True if every filter entry equals the row's value. Keys starting with `/` are JSON pointers.
pub(crate) fn matches(row: &Value, filter: &Filter) -> bool {
	filter.iter().all(|(key, expected)| {
		let actual = if key.starts_with('/') { row.pointer(key) } else { row.get(key) };
		actual == Some(expected)
	})
}

/// Merges `set` into an object row. Non-object rows are left untouched.
pub(crate) fn apply_set(row: &mut Value, set: &Map<String, Value>) -> bool {
	let Value::Object(fields) = row else {
		return false;
	};
	for (key, value) in set {
		fields.insert(key.clone(), value.clone());
	}
	true
}

fn kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn empty_filter_matches_everything() {
		let filter = parse_filter("users", "  ").unwrap();
		assert!(matches(&json!({"id": 1}), &filter));
		assert!(matches(&json!("scalar"), &filter));
	}

	#[test]
	fn filter_supports_fields_and_pointers() {
		let filter = parse_filter("users", r#"{"role":"admin","/address/city":"Oslo"}"#).unwrap();
		assert!(matches(&json!({"role":"admin","address":{"city":"Oslo"}}), &filter));
		assert!(!matches(&json!({"role":"admin","address":{"city":"Bergen"}}), &filter));
		assert!(!matches(&json!({"address":{"city":"Oslo"}}), &filter));
	}

	#[test]
	fn filter_must_be_object() {
		let err = parse_filter("users", "[1,2]").unwrap_err();
		assert!(matches!(err, Error::InvalidStatement { message, .. } if message.contains("an array")));
	}

	#[test]
	fn malformed_json_is_invalid_statement() {
		assert!(matches!(parse_row("users", "{"), Err(Error::InvalidStatement { .. })));
		assert!(matches!(parse_filter("users", "{"), Err(Error::InvalidStatement { .. })));
	}

	#[test]
	fn update_requires_fields_to_set() {
		assert!(parse_update("users", r#"{"filter":{},"set":{}}"#).is_err());
		let update = parse_update("users", r#"{"filter":{"id":1},"set":{"name":"Ada"}}"#).unwrap();
		assert_eq!(update.filter["id"], json!(1));
	}

	#[test]
	fn apply_set_merges_top_level_fields() {
		let mut row = json!({"id": 1, "name": "Ada"});
		let set = parse_row("users", r#"{"name":"Grace","active":true}"#).unwrap();
		assert!(apply_set(&mut row, &set));
		assert_eq!(row, json!({"id": 1, "name": "Grace", "active": true}));

		let mut scalar = json!(5);
		assert!(!apply_set(&mut scalar, &set));
	}
}
