use clap::Parser;
use webpage_cli::{
	cli::Cli,
	commands,
	error::CliError,
	logging,
	output::{self, OutputFormat, ResultBuilder},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let format = cli.format;
	let name = commands::command_name(&cli.command);

	if let Err(err) = commands::dispatch(cli, format).await {
		handle_error(&name, err, format);
		std::process::exit(1);
	}
	Ok(())
}

fn handle_error(command: &str, err: CliError, format: OutputFormat) {
	let cmd_error = err.to_command_error();

	// Always print to stderr for humans
	output::print_error_stderr(&cmd_error);

	if format == OutputFormat::Json {
		let result: output::CommandResult<()> = ResultBuilder::new(command)
			.error(cmd_error.code, cmd_error.message)
			.build();
		output::print_result(&result, format);
	}
}
