use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use rn_debug_protocol::TraceLevel;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use crate::error::Result;

/// Default filter directive for a request's `trace` level.
pub fn filter_for(level: TraceLevel) -> &'static str {
	// Log is the IDE default: our own info lines, warnings from dependencies.
	match level {
		TraceLevel::Off => "off",
		TraceLevel::Error => "error",
		TraceLevel::Warn => "warn",
		TraceLevel::Log => "warn,rn_debug=info",
		TraceLevel::Verbose => "debug,rn_debug=trace",
	}
}

/// Installs the global subscriber.
///
/// Logs go to `log_file` when given, stderr otherwise. `RUST_LOG` overrides the
/// level. Returns `false` if a subscriber was already installed, which is the case
/// when a second session runs in the same process.
pub fn init_logging(level: TraceLevel, log_file: Option<&Path>) -> Result<bool> {
	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_for(level)));

	let installed = match log_file {
		Some(path) => {
			if let Some(parent) = path.parent() {
				fs::create_dir_all(parent)?;
			}
			let file = OpenOptions::new().create(true).append(true).open(path)?;
			tracing_subscriber::fmt()
				.with_env_filter(env_filter)
				.with_writer(Mutex::new(file))
				.with_ansi(false)
				.with_target(true)
				.with_level(true)
				.try_init()
				.is_ok()
		}
		None => {
			let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);
			tracing_subscriber::fmt()
				.with_env_filter(env_filter)
				.with_writer(stderr)
				.with_target(true)
				.with_level(true)
				.compact()
				.try_init()
				.is_ok()
		}
	};

	Ok(installed)
}
