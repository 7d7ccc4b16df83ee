//! Statement operations shared by single commands and batch mode.

use dbs::store::JsonStoreDelegate;
use serde_json::Value;

use crate::error::Result;
use crate::output::{CommandInputs, EntityData, MutationData, PointerData, SearchData};

/// One statement against an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrudOp {
	Search { entity: String, statement: String, pointer: Option<String> },
	Insert { entity: String, statement: String },
	InsertBatch { entity: String, statements: Vec<String> },
	Update { entity: String, statement: String },
	Delete { entity: String, statement: String },
	Create { entity: String, statement: String },
	Drop { entity: String, statement: String },
}

impl CrudOp {
	/// Command name used in result envelopes.
	pub fn name(&self) -> &'static str {
		match self {
			CrudOp::Search { .. } => "search",
			CrudOp::Insert { .. } => "insert",
			CrudOp::InsertBatch { .. } => "insert-batch",
			CrudOp::Update { .. } => "update",
			CrudOp::Delete { .. } => "delete",
			CrudOp::Create { .. } => "create",
			CrudOp::Drop { .. } => "drop",
		}
	}

	pub fn entity(&self) -> &str {
		match self {
			CrudOp::Search { entity, .. }
			| CrudOp::Insert { entity, .. }
			| CrudOp::InsertBatch { entity, .. }
			| CrudOp::Update { entity, .. }
			| CrudOp::Delete { entity, .. }
			| CrudOp::Create { entity, .. }
			| CrudOp::Drop { entity, .. } => entity,
		}
	}

	/// Adds the entity, statement and pointer to `inputs`.
	pub fn describe(&self, mut inputs: CommandInputs) -> CommandInputs {
		inputs.entity = Some(self.entity().to_string());
		match self {
			CrudOp::Search { statement, pointer, .. } => {
				inputs.statement = Some(statement.clone()).filter(|s| !s.is_empty());
				inputs.pointer = pointer.clone();
			}
			CrudOp::InsertBatch { statements, .. } => {
				inputs.extra = Some(serde_json::json!({ "statementCount": statements.len() }));
			}
			CrudOp::Insert { statement, .. }
			| CrudOp::Update { statement, .. }
			| CrudOp::Delete { statement, .. }
			| CrudOp::Create { statement, .. }
			| CrudOp::Drop { statement, .. } => {
				inputs.statement = Some(statement.clone()).filter(|s| !s.is_empty());
			}
		}
		inputs
	}
}

/// Runs `op` on the delegate's active session and returns the result payload.
pub fn run(db: &mut JsonStoreDelegate, op: &CrudOp) -> Result<Value> {
	let data = match op {
		CrudOp::Search { entity, statement, pointer } => {
			let doc = db.read_as_document(entity, statement)?;
			match pointer {
				Some(pointer) => {
					let value = doc.read::<Value>(pointer)?;
					serde_json::to_value(PointerData {
						entity: entity.clone(),
						pointer: pointer.clone(),
						value,
					})?
				}
				None => serde_json::to_value(SearchData {
					entity: entity.clone(),
					count: doc.len(),
					rows: doc.into_value(),
				})?,
			}
		}
		CrudOp::Insert { entity, statement } => {
			db.insert(entity, statement)?;
			serde_json::to_value(MutationData::inserted(entity, 1))?
		}
		CrudOp::InsertBatch { entity, statements } => {
			let count = db.insert_batch(entity, statements)?;
			serde_json::to_value(MutationData::inserted(entity, count))?
		}
		CrudOp::Update { entity, statement } => {
			let count = db.update(entity, statement)?;
			serde_json::to_value(MutationData::updated(entity, count))?
		}
		CrudOp::Delete { entity, statement } => {
			let count = db.delete(entity, statement)?;
			serde_json::to_value(MutationData::deleted(entity, count))?
		}
		CrudOp::Create { entity, statement } => {
			db.create(entity, statement)?;
			serde_json::to_value(EntityData {
				entity: entity.clone(),
				created: Some(true),
				dropped: None,
			})?
		}
		CrudOp::Drop { entity, statement } => {
			db.drop(entity, statement)?;
			serde_json::to_value(EntityData {
				entity: entity.clone(),
				created: None,
				dropped: Some(true),
			})?
		}
	};
	Ok(data)
}
