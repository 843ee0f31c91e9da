//! Adapter configuration supplied by the host environment.
//!
//! The IDE host owns where logs go and whether telemetry is collected; it hands
//! those to the adapter process through environment variables.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const ENV_LOGS_DIR: &str = "RN_DEBUG_LOGS_DIR";
pub const ENV_REMOTE_ENDPOINT: &str = "RN_DEBUG_REMOTE_ENDPOINT";
pub const ENV_REMOTE_TIMEOUT_MS: &str = "RN_DEBUG_REMOTE_TIMEOUT_MS";
pub const ENV_TELEMETRY: &str = "RN_DEBUG_TELEMETRY";

pub const DEFAULT_REMOTE_ENDPOINT: &str = "http://127.0.0.1:19333";
pub const DEFAULT_REMOTE_TIMEOUT_MS: u64 = 30_000;

/// File inside the logs directory that receives the bridge's own logs.
pub const LOG_FILE_NAME: &str = "DebugCoreLogs.txt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdapterConfig {
	/// Directory for log files; logs go to stderr when unset.
	pub logs_dir: Option<PathBuf>,
	/// JSON-RPC endpoint of the remote extension.
	pub remote_endpoint: String,
	pub remote_timeout_ms: u64,
	pub telemetry_enabled: bool,
}

impl Default for AdapterConfig {
	fn default() -> Self {
		Self {
			logs_dir: None,
			remote_endpoint: DEFAULT_REMOTE_ENDPOINT.to_string(),
			remote_timeout_ms: DEFAULT_REMOTE_TIMEOUT_MS,
			telemetry_enabled: true,
		}
	}
}

impl AdapterConfig {
	/// Reads the configuration from the process environment.
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Builds the configuration from an arbitrary variable lookup.
	pub fn from_lookup<F>(lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut config = Self::default();

		if let Some(dir) = lookup(ENV_LOGS_DIR).filter(|v| !v.trim().is_empty()) {
			config.logs_dir = Some(PathBuf::from(dir));
		}
		if let Some(endpoint) = lookup(ENV_REMOTE_ENDPOINT).filter(|v| !v.trim().is_empty()) {
			config.remote_endpoint = endpoint;
		}
		if let Some(timeout) = lookup(ENV_REMOTE_TIMEOUT_MS) {
			config.remote_timeout_ms = timeout
				.trim()
				.parse()
				.map_err(|_| Error::Config(format!("{ENV_REMOTE_TIMEOUT_MS} must be a number of milliseconds, got {timeout:?}")))?;
		}
		if let Some(flag) = lookup(ENV_TELEMETRY) {
			config.telemetry_enabled = parse_flag(&flag).ok_or_else(|| Error::Config(format!("{ENV_TELEMETRY} must be a boolean, got {flag:?}")))?;
		}

		Ok(config)
	}

	/// Log file path, when a logs directory is configured.
	pub fn log_file(&self) -> Option<PathBuf> {
		self.logs_dir.as_ref().map(|dir| dir.join(LOG_FILE_NAME))
	}

	pub fn remote_timeout(&self) -> Duration {
		Duration::from_millis(self.remote_timeout_ms)
	}
}

fn parse_flag(value: &str) -> Option<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Some(true),
		"0" | "false" | "no" | "off" => Some(false),
		_ => None,
	}
}
