mod cookies;
mod open;
mod settings;

use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use crate::output::{OutputFormat, ResultBuilder, print_result};

pub use cookies::{CookiesOutput, JarUpdate};
pub use open::OpenOutput;

/// Stable name of a command, as reported in the output envelope.
pub fn command_name(command: &Commands) -> String {
	match command {
		Commands::Cookies(args) => format!("cookies {}", cookies::action_name(&args.action)),
		Commands::Settings(_) => "settings".to_string(),
		Commands::Open(_) => "open".to_string(),
	}
}

pub async fn dispatch(cli: Cli, format: OutputFormat) -> Result<()> {
	let name = command_name(&cli.command);
	tracing::info!(command = %name, "run");

	match cli.command {
		Commands::Cookies(args) => emit(&name, cookies::run(args)?, format),
		Commands::Settings(args) => emit(&name, settings::run(&args)?, format),
		Commands::Open(args) => emit(&name, open::run(args).await?, format),
	}
	Ok(())
}

fn emit<T: Serialize>(name: &str, data: T, format: OutputFormat) {
	let result = ResultBuilder::new(name).data(data).build();
	print_result(&result, format);
}

/// Reads a JSON options file. A missing path means "no overrides".
pub(crate) fn read_options(path: Option<&Path>) -> Result<Value> {
	let Some(path) = path else {
		return Ok(Value::Object(Default::default()));
	};
	let text = std::fs::read_to_string(path).map_err(|source| CliError::ReadFile {
		path: path.to_path_buf(),
		source,
	})?;
	serde_json::from_str(&text).map_err(|source| CliError::ConfigParse {
		path: path.to_path_buf(),
		source,
	})
}
