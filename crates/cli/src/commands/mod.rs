pub mod batch;
pub mod crud;
pub mod profile;
pub mod status;

use std::io;
use std::time::Instant;

use serde_json::Value;
use tracing::debug;

use crate::cli::{Cli, Commands, ProfileAction};
use crate::context::CommandContext;
use crate::error::{CliError, Result};
use crate::output::{self, CommandInputs, CommandResult, DiagnosticLevel, OutputFormat, ResultBuilder};
use crud::CrudOp;

/// A parsed command, detached from clap.
#[derive(Debug)]
enum Request {
	ProfileList,
	ProfileShow(String),
	Crud(CrudOp),
	Status,
	Batch,
}

impl Request {
	fn name(&self) -> &'static str {
		match self {
			Request::ProfileList => "profile.list",
			Request::ProfileShow(_) => "profile.show",
			Request::Crud(op) => op.name(),
			Request::Status => "status",
			Request::Batch => "batch",
		}
	}
}

impl From<Commands> for Request {
	fn from(command: Commands) -> Self {
		match command {
			Commands::Profile { action: ProfileAction::List } => Request::ProfileList,
			Commands::Profile {
				action: ProfileAction::Show { name },
			} => Request::ProfileShow(name),
			Commands::Search { entity, statement, pointer } => Request::Crud(CrudOp::Search { entity, statement, pointer }),
			Commands::Insert { entity, statement } => Request::Crud(CrudOp::Insert { entity, statement }),
			Commands::InsertBatch { entity, statements } => Request::Crud(CrudOp::InsertBatch { entity, statements }),
			Commands::Update { entity, statement } => Request::Crud(CrudOp::Update { entity, statement }),
			Commands::Delete { entity, statement } => Request::Crud(CrudOp::Delete { entity, statement }),
			Commands::Create { entity, statement } => Request::Crud(CrudOp::Create { entity, statement }),
			Commands::Drop { entity, statement } => Request::Crud(CrudOp::Drop { entity, statement }),
			Commands::Status => Request::Status,
			Commands::Batch => Request::Batch,
		}
	}
}

/// Runs one CLI invocation and prints its result envelope.
///
/// Failures are printed here and reported as [`CliError::OutputAlreadyPrinted`].
pub fn dispatch(cli: Cli) -> Result<()> {
	let start = Instant::now();
	let format = cli.format;
	let request = Request::from(cli.command);
	let name = request.name();

	let mut inputs = CommandInputs {
		app: Some(cli.app.clone()),
		profile: cli.profile.clone(),
		..Default::default()
	};
	if let Request::Crud(op) = &request {
		inputs = op.describe(inputs);
	}

	debug!(target = "dbs.cli", command = name, app = %cli.app, "dispatching command");

	let outcome = CommandContext::load(cli.config.as_deref(), cli.app, cli.profile, cli.server).and_then(|ctx| {
		inputs.config_path = ctx.config_path();
		if matches!(request, Request::Crud(_)) {
			inputs.profile = ctx.resolve_profile(None).ok();
		}
		run(&ctx, request)
	});

	match outcome {
		Ok(None) => Ok(()),
		Ok(Some(out)) => {
			let mut builder = ResultBuilder::new(name).started_at(start).inputs(inputs).data(out.data);
			if let Some(warning) = out.warning {
				builder = builder.diagnostic_with_source(DiagnosticLevel::Warning, warning, "config");
			}
			output::print_result(&builder.build(), format);
			Ok(())
		}
		Err(err) => {
			print_failure(name, inputs, &err, start, format);
			Err(CliError::OutputAlreadyPrinted)
		}
	}
}

struct CommandOutput {
	data: Value,
	warning: Option<String>,
}

impl CommandOutput {
	fn data(data: Value) -> Self {
		Self { data, warning: None }
	}
}

fn run(ctx: &CommandContext, request: Request) -> Result<Option<CommandOutput>> {
	let out = match request {
		Request::ProfileList => CommandOutput::data(serde_json::to_value(profile::list(ctx)?)?),
		Request::ProfileShow(name) => CommandOutput::data(serde_json::to_value(profile::show(ctx, &name)?)?),
		Request::Status => {
			let db = ctx.delegate();
			CommandOutput {
				data: serde_json::to_value(status::status(ctx, &db))?,
				warning: ctx.config_path().is_none().then(|| "no config file found; using an empty config".to_string()),
			}
		}
		Request::Crud(op) => {
			let mut db = ctx.delegate();
			db.set_active_profile(&ctx.resolve_profile(None)?)?;
			let data = crud::run(&mut db, &op)?;
			db.disconnect()?;
			CommandOutput::data(data)
		}
		Request::Batch => {
			let stdin = io::stdin();
			let mut stdout = io::stdout();
			batch::execute(ctx, stdin.lock(), &mut stdout)?;
			return Ok(None);
		}
	};
	Ok(Some(out))
}

fn print_failure(name: &str, inputs: CommandInputs, err: &CliError, start: Instant, format: OutputFormat) {
	let cmd_error = err.to_command_error();
	output::print_error_stderr(&cmd_error);

	if format != OutputFormat::Text {
		let result: CommandResult<()> = ResultBuilder::new(name).started_at(start).inputs(inputs).command_error(cmd_error).build();
		output::print_result(&result, format);
	}
}
