//! Batch mode: NDJSON requests on stdin, one response line each, one session.
//!
//! Every request runs on the same [`SessionedCrudDelegate`](dbs::SessionedCrudDelegate),
//! so the idle-expiry policy applies between lines exactly as it would inside a
//! long-running test.
//!
//! # Request Format
//!
//! | Field | Type | Description |
//! |-------|------|-------------|
//! | `id` | `string?` | Echoed in the response |
//! | `op` | `string` | `search`, `insert`, `insert-batch`, `update`, `delete`, `create`, `drop`, `use`, `status`, `quit` |
//! | `entity` | `string?` | Target entity (required for statement ops) |
//! | `statement` | `string?` | Statement text |
//! | `statements` | `string[]?` | Rows for `insert-batch` |
//! | `profile` | `string?` | Profile to activate before running the op |
//! | `pointer` | `string?` | JSON pointer applied to `search` results |
//!
//! ```text
//! $ dbs -a shop batch
//! {"id":"1","op":"use","profile":"qa"}
//! {"schemaVersion":1,"id":"1","ok":true,"command":"use","data":{"profile":"qa","connected":true},...}
//! {"id":"2","op":"search","entity":"users","statement":"{\"role\":\"admin\"}"}
//! {"schemaVersion":1,"id":"2","ok":true,"command":"search","data":{"entity":"users","count":1,"rows":[...]},...}
//! {"op":"quit"}
//! ```

use std::io::{BufRead, Write};
use std::time::Instant;

use dbs::store::JsonStoreDelegate;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::crud::{self, CrudOp};
use super::status::status;
use crate::context::CommandContext;
use crate::error::{CliError, Result};
use crate::output::{CommandResult, ErrorCode, ResultBuilder};

/// A batch request parsed from one input line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
	#[serde(default)]
	pub id: Option<String>,
	pub op: String,
	#[serde(default)]
	pub entity: Option<String>,
	#[serde(default)]
	pub statement: String,
	#[serde(default)]
	pub statements: Vec<String>,
	#[serde(default)]
	pub profile: Option<String>,
	#[serde(default)]
	pub pointer: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
enum BatchAction {
	Crud(CrudOp),
	Use,
	Status,
	Quit,
}

impl BatchRequest {
	fn action(&self) -> Result<BatchAction> {
		let entity = || {
			self.entity
				.clone()
				.filter(|e| !e.is_empty())
				.ok_or_else(|| CliError::InvalidInput(format!("op '{}' requires an entity", self.op)))
		};
		let statement = self.statement.clone();

		let action = match self.op.as_str() {
			"use" => BatchAction::Use,
			"status" => BatchAction::Status,
			"quit" | "exit" => BatchAction::Quit,
			"search" => BatchAction::Crud(CrudOp::Search {
				entity: entity()?,
				statement,
				pointer: self.pointer.clone(),
			}),
			"insert" => BatchAction::Crud(CrudOp::Insert { entity: entity()?, statement }),
			"insert-batch" => {
				if self.statements.is_empty() {
					return Err(CliError::InvalidInput("insert-batch requires statements".into()));
				}
				BatchAction::Crud(CrudOp::InsertBatch {
					entity: entity()?,
					statements: self.statements.clone(),
				})
			}
			"update" => BatchAction::Crud(CrudOp::Update { entity: entity()?, statement }),
			"delete" => BatchAction::Crud(CrudOp::Delete { entity: entity()?, statement }),
			"create" => BatchAction::Crud(CrudOp::Create { entity: entity()?, statement }),
			"drop" => BatchAction::Crud(CrudOp::Drop { entity: entity()?, statement }),
			other => return Err(CliError::InvalidInput(format!("unknown op: {other}"))),
		};
		Ok(action)
	}
}

/// Reads requests from `input` until EOF or `quit`, writing one NDJSON response per request.
///
/// Individual request failures are reported in the response stream, not returned.
pub fn execute(ctx: &CommandContext, input: impl BufRead, out: &mut impl Write) -> Result<()> {
	let mut db = ctx.delegate();
	let mut handled = 0usize;

	for line in input.lines() {
		let line = line?;
		let line = line.trim();
		if line.is_empty() {
			continue;
		}

		let start = Instant::now();
		let request: BatchRequest = match serde_json::from_str(line) {
			Ok(request) => request,
			Err(err) => {
				let response: CommandResult<Value> = ResultBuilder::new("unknown")
					.error(ErrorCode::InvalidInput, format!("invalid request: {err}"))
					.build();
				write_response(out, &response)?;
				continue;
			}
		};

		handled += 1;
		let mut inputs = ctx.inputs();
		if request.profile.is_some() {
			inputs.profile = request.profile.clone();
		}
		let builder = ResultBuilder::new(request.op.as_str()).started_at(start).id(request.id.clone());

		let action = match request.action() {
			Ok(action) => action,
			Err(err) => {
				write_response(out, &builder.inputs(inputs).command_error(err.to_command_error()).build())?;
				continue;
			}
		};
		if let BatchAction::Crud(op) = &action {
			inputs = op.describe(inputs);
		}

		if action == BatchAction::Quit {
			write_response(out, &builder.inputs(inputs).build())?;
			break;
		}

		let response = match run_action(ctx, &mut db, &request, &action) {
			Ok(data) => builder.inputs(inputs).data(data).build(),
			Err(err) => {
				debug!(target = "dbs.cli", op = %request.op, error = %err, "batch request failed");
				builder.inputs(inputs).command_error(err.to_command_error()).build()
			}
		};
		write_response(out, &response)?;
	}

	if let Err(err) = db.disconnect() {
		warn!(target = "dbs.cli", error = %err, "failed to release batch session");
	}
	debug!(target = "dbs.cli", requests = handled, stats = ?db.stats(), "batch finished");
	Ok(())
}

fn run_action(ctx: &CommandContext, db: &mut JsonStoreDelegate, request: &BatchRequest, action: &BatchAction) -> Result<Value> {
	match action {
		BatchAction::Use => {
			let name = ctx.resolve_profile(request.profile.as_deref())?;
			db.set_active_profile(&name)?;
			Ok(json!({ "profile": name, "connected": db.is_connected() }))
		}
		BatchAction::Status => Ok(serde_json::to_value(status(ctx, db))?),
		BatchAction::Crud(op) => {
			activate(ctx, db, request.profile.as_deref())?;
			crud::run(db, op)
		}
		BatchAction::Quit => Ok(Value::Null),
	}
}

/// Activates the requested profile, or the default one if nothing is active yet.
fn activate(ctx: &CommandContext, db: &mut JsonStoreDelegate, requested: Option<&str>) -> Result<()> {
	if requested.is_none() && db.is_connected() {
		return Ok(());
	}
	let name = ctx.resolve_profile(requested)?;
	db.set_active_profile(&name)?;
	Ok(())
}

fn write_response(out: &mut impl Write, response: &CommandResult<Value>) -> Result<()> {
	let json = serde_json::to_string(response)?;
	writeln!(out, "{json}")?;
	out.flush()?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use dbs::{DatabaseConfig, DatabaseProfile};

	use super::*;
	use crate::config::ConfigSource;

	fn context(expiry_secs: u64) -> CommandContext {
		let mut config = DatabaseConfig {
			session_expiry_secs: expiry_secs,
			..DatabaseConfig::default()
		};
		config.insert_profile("shop", DatabaseProfile::new("qa", "memory"));
		config.insert_profile("shop", DatabaseProfile::new("staging", "memory"));
		CommandContext::new(config, ConfigSource::Default, "shop".into(), Some("qa".into()), None)
	}

	fn run_lines(ctx: &CommandContext, lines: &[&str]) -> Vec<Value> {
		let input = lines.join("\n");
		let mut out = Vec::new();
		execute(ctx, input.as_bytes(), &mut out).unwrap();
		String::from_utf8(out)
			.unwrap()
			.lines()
			.map(|line| serde_json::from_str(line).unwrap())
			.collect()
	}

	#[test]
	fn requests_share_one_session() {
		let ctx = context(300);
		let responses = run_lines(
			&ctx,
			&[
				r#"{"id":"1","op":"create","entity":"users"}"#,
				r#"{"id":"2","op":"insert","entity":"users","statement":"{\"id\":1}"}"#,
				r#"{"id":"3","op":"search","entity":"users"}"#,
				r#"{"id":"4","op":"status"}"#,
			],
		);

		assert_eq!(responses.len(), 4);
		assert!(responses.iter().all(|r| r["ok"] == true));
		assert_eq!(responses[2]["data"]["count"], 1);
		assert_eq!(responses[3]["id"], "4");
		assert_eq!(responses[3]["data"]["activeProfile"], "qa");
		assert_eq!(responses[3]["data"]["stats"]["authentications"], 1);
	}

	#[test]
	fn errors_do_not_stop_the_stream() {
		let ctx = context(300);
		let responses = run_lines(
			&ctx,
			&[
				"not json",
				r#"{"id":"a","op":"search"}"#,
				r#"{"id":"b","op":"teleport"}"#,
				r#"{"id":"c","op":"search","entity":"missing"}"#,
				r#"{"id":"d","op":"use","profile":"prod"}"#,
				r#"{"id":"e","op":"quit"}"#,
				r#"{"id":"f","op":"status"}"#,
			],
		);

		let codes: Vec<_> = responses.iter().map(|r| r["error"]["code"].clone()).collect();
		assert_eq!(
			codes,
			vec![
				json!("INVALID_INPUT"),
				json!("INVALID_INPUT"),
				json!("INVALID_INPUT"),
				json!("ENTITY_NOT_FOUND"),
				json!("AUTH_ERROR"),
				Value::Null,
			]
		);
		assert_eq!(responses[5]["command"], "quit");
		assert_eq!(responses[5]["ok"], true);
	}

	#[test]
	fn zero_expiry_reauthenticates_every_request() {
		let ctx = context(0);
		let responses = run_lines(
			&ctx,
			&[
				r#"{"op":"use"}"#,
				r#"{"op":"create","entity":"users"}"#,
				r#"{"op":"insert","entity":"users","statement":"{\"id\":1}"}"#,
				r#"{"op":"search","entity":"users"}"#,
				r#"{"op":"status"}"#,
			],
		);

		assert_eq!(responses[3]["data"]["count"], 1);
		let stats = &responses[4]["data"]["stats"];
		assert_eq!(stats["authentications"], 4);
		assert_eq!(stats["expirations"], 3);
	}

	#[test]
	fn request_profile_switches_session() {
		let ctx = context(300);
		let responses = run_lines(
			&ctx,
			&[
				r#"{"op":"create","entity":"users"}"#,
				r#"{"op":"search","entity":"users","profile":"staging"}"#,
				r#"{"op":"search","entity":"users","profile":"qa"}"#,
			],
		);

		assert_eq!(responses[1]["error"]["code"], "ENTITY_NOT_FOUND");
		assert_eq!(responses[1]["inputs"]["profile"], "staging");
		assert_eq!(responses[2]["ok"], true);
	}
}
