use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use crate::styles::cli_styles;

#[derive(Parser, Debug)]
#[command(name = "dbs")]
#[command(about = "Session-managed database actions for UI test automation")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format
	#[arg(short, long, global = true, value_enum, default_value = "json")]
	pub format: OutputFormat,

	/// Config file (defaults to $DBS_CONFIG, ./dbs.json, then the user config dir)
	#[arg(short, long, global = true, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Application whose profiles are used
	#[arg(short, long, global = true, default_value = "default")]
	pub app: String,

	/// Database profile to activate (defaults to the app's default profile)
	#[arg(short, long, global = true)]
	pub profile: Option<String>,

	/// Target server the profile must allow
	#[arg(long, global = true, value_name = "NAME")]
	pub server: Option<String>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Inspect configured database profiles
	Profile {
		#[command(subcommand)]
		action: ProfileAction,
	},

	/// Search an entity and print matching rows
	#[command(alias = "find")]
	Search {
		entity: String,
		/// Filter statement (JSON object; empty matches everything)
		#[arg(default_value = "")]
		statement: String,
		/// Print only the value at this JSON pointer of the result
		#[arg(long, value_name = "PTR")]
		pointer: Option<String>,
	},

	/// Insert one row
	Insert { entity: String, statement: String },

	/// Insert several rows at once
	InsertBatch {
		entity: String,
		#[arg(required = true)]
		statements: Vec<String>,
	},

	/// Update rows matching a filter
	Update { entity: String, statement: String },

	/// Delete rows matching a filter
	Delete {
		entity: String,
		#[arg(default_value = "")]
		statement: String,
	},

	/// Create an entity
	Create {
		entity: String,
		#[arg(default_value = "")]
		statement: String,
	},

	/// Drop an entity and its rows
	Drop {
		entity: String,
		#[arg(default_value = "")]
		statement: String,
	},

	/// Show the resolved app, profile and session settings
	Status,

	/// Read NDJSON requests from stdin and run them on one session
	Batch,
}

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
	/// List profiles configured for the app
	#[command(alias = "ls")]
	List,

	/// Show one profile (password redacted)
	Show { name: String },
}
