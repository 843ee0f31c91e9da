use std::path::PathBuf;

use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{Parser, Subcommand};
use rn_debug_protocol::Platform;

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "rn-debug")]
#[command(about = "Inspect React Native projects the way the debug adapter sees them")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format
	#[arg(short = 'f', long, global = true, value_enum, default_value = "text")]
	pub format: OutputFormat,

	/// JSON-RPC endpoint of the remote extension (overrides RN_DEBUG_REMOTE_ENDPOINT)
	#[arg(long, global = true, value_name = "URL")]
	pub remote_endpoint: Option<String>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Resolve and validate the project root for a debug configuration's cwd
	Project {
		#[arg(default_value = ".")]
		cwd: PathBuf,
	},

	/// Report the React Native versions a session would send with telemetry
	Versions {
		#[arg(default_value = ".")]
		cwd: PathBuf,

		/// Target platform; desktop hosts also report the host package version
		#[arg(short, long)]
		platform: Option<Platform>,
	},

	/// Ask the remote extension which port the packager listens on
	Port {
		#[arg(default_value = ".")]
		cwd: PathBuf,
	},

	/// Drop native frames from a `Debugger.paused` notification (file or stdin)
	Frames {
		/// JSON file holding the notification; reads stdin when omitted
		#[arg(value_name = "FILE")]
		input: Option<PathBuf>,
	},
}

impl Commands {
	/// Name used in result envelopes.
	pub fn name(&self) -> &'static str {
		match self {
			Commands::Project { .. } => "project",
			Commands::Versions { .. } => "versions",
			Commands::Port { .. } => "port",
			Commands::Frames { .. } => "frames",
		}
	}
}

/// Help colors in cargo's palette.
pub fn cli_styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Green.on_default().bold())
		.usage(AnsiColor::Green.on_default().bold())
		.literal(AnsiColor::Cyan.on_default())
		.placeholder(AnsiColor::Cyan.on_default())
}
