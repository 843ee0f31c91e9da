//! Result envelopes and their rendering.
//!
//! Every command produces a [`CommandResult`]. JSON output prints the envelope
//! as-is; text output prints the data fields one per line.

use std::io::{self, Write};

use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text
	#[default]
	Text,
	/// Pretty-printed JSON envelope
	Json,
}

impl std::fmt::Display for OutputFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			OutputFormat::Text => write!(f, "text"),
			OutputFormat::Json => write!(f, "json"),
		}
	}
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T: Serialize> {
	pub ok: bool,

	/// Command name ("project", "versions", "port", "frames")
	pub command: String,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<CommandError>,

	/// Non-fatal findings, e.g. a host version that could not be resolved
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
	pub code: ErrorCode,
	pub message: String,
}

/// Stable error codes for scripts consuming JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	/// cwd does not resolve to a React Native project
	NotInProjectFolder,
	VersionResolution,
	/// The remote extension could not be reached or rejected the call
	RemoteCall,
	InvalidInput,
	IoError,
	InternalError,
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ErrorCode::NotInProjectFolder => write!(f, "NOT_IN_PROJECT_FOLDER"),
			ErrorCode::VersionResolution => write!(f, "VERSION_RESOLUTION"),
			ErrorCode::RemoteCall => write!(f, "REMOTE_CALL"),
			ErrorCode::InvalidInput => write!(f, "INVALID_INPUT"),
			ErrorCode::IoError => write!(f, "IO_ERROR"),
			ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
		}
	}
}

pub struct ResultBuilder<T: Serialize> {
	command: String,
	data: Option<T>,
	error: Option<CommandError>,
	warnings: Vec<String>,
}

impl<T: Serialize> ResultBuilder<T> {
	pub fn new(command: impl Into<String>) -> Self {
		Self {
			command: command.into(),
			data: None,
			error: None,
			warnings: Vec::new(),
		}
	}

	pub fn data(mut self, data: T) -> Self {
		self.data = Some(data);
		self
	}

	pub fn error(mut self, code: ErrorCode, message: impl Into<String>) -> Self {
		self.error = Some(CommandError {
			code,
			message: message.into(),
		});
		self
	}

	pub fn warning(mut self, message: impl Into<String>) -> Self {
		self.warnings.push(message.into());
		self
	}

	pub fn build(self) -> CommandResult<T> {
		CommandResult {
			ok: self.error.is_none(),
			command: self.command,
			data: self.data,
			error: self.error,
			warnings: self.warnings,
		}
	}
}

/// Print a command result to stdout in the specified format
pub fn print_result<T: Serialize>(result: &CommandResult<T>, format: OutputFormat) {
	match format {
		OutputFormat::Json => {
			if let Ok(json) = serde_json::to_string_pretty(result) {
				println!("{json}");
			}
		}
		OutputFormat::Text => {
			let mut stdout = io::stdout().lock();
			let _ = stdout.write_all(render_text(result).as_bytes());
		}
	}
}

/// Text rendering: one `key: value` line per data field, then warnings.
pub fn render_text<T: Serialize>(result: &CommandResult<T>) -> String {
	let mut out = String::new();

	if let Some(error) = &result.error {
		out.push_str(&format!("{} [{}]: {}\n", "error".red().bold(), error.code, error.message));
	}

	match result.data.as_ref().map(serde_json::to_value) {
		Some(Ok(Value::Object(fields))) => {
			for (key, value) in fields {
				out.push_str(&format!("{}: {}\n", key.bold(), text_value(&value)));
			}
		}
		Some(Ok(value)) => out.push_str(&format!("{}\n", text_value(&value))),
		Some(Err(_)) | None => {}
	}

	for warning in &result.warnings {
		out.push_str(&format!("{}: {warning}\n", "warning".yellow().bold()));
	}
	out
}

fn text_value(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		Value::Null => "-".dimmed().to_string(),
		other => other.to_string(),
	}
}

/// Print an error to stderr in human-readable format
pub fn print_error_stderr(error: &CommandError) {
	eprintln!("{} [{}]: {}", "error".red().bold(), error.code, error.message);
}
