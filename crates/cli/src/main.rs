use clap::Parser;
use rn_debug_cli::cli::Cli;
use rn_debug_cli::commands;
use rn_debug_cli::error::CliError;
use rn_debug_cli::logging;
use rn_debug_cli::output::{self, OutputFormat, ResultBuilder};

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let format = cli.format;
	let command = cli.command.name();

	if let Err(err) = commands::dispatch(cli).await {
		handle_error(command, err, format);
		std::process::exit(1);
	}
}

fn handle_error(command: &str, err: CliError, format: OutputFormat) {
	let cmd_error = err.to_command_error();

	output::print_error_stderr(&cmd_error);

	// JSON consumers still get an envelope on stdout
	if format == OutputFormat::Json {
		let result: output::CommandResult<()> = ResultBuilder::new(command).error(cmd_error.code, &cmd_error.message).build();
		output::print_result(&result, format);
	}
}
