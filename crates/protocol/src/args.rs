//! Request arguments flowing from the IDE into the bridge and on to the transport.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::platform::{Platform, TraceLevel};

/// Address the inspector transport attaches to. The packager port is always
/// forwarded to the local machine.
pub const LOCAL_ADDRESS: &str = "localhost";

/// Arguments shared by launch and attach requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionArgs {
	/// Target platform of the debugged application.
	pub platform: Platform,
	/// Working directory of the debug configuration, usually the workspace folder.
	pub cwd: PathBuf,
	/// Explicit packager port; skips port discovery when set.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub port: Option<u16>,
	/// Log level token (`off`, `error`, `warn`, `log`, `verbose`).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub trace: Option<String>,
	/// Whether source maps are used; the settings gate defaults this to `true`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source_maps: Option<bool>,
}

impl SessionArgs {
	pub fn new(platform: Platform, cwd: impl Into<PathBuf>) -> Self {
		Self {
			platform,
			cwd: cwd.into(),
			port: None,
			trace: None,
			source_maps: None,
		}
	}

	pub fn with_port(mut self, port: u16) -> Self {
		self.port = Some(port);
		self
	}

	pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
		self.trace = Some(trace.into());
		self
	}

	pub fn trace_level(&self) -> TraceLevel {
		TraceLevel::from_arg(self.trace.as_deref())
	}

	pub fn cwd(&self) -> &Path {
		&self.cwd
	}
}

/// Arguments of a `launch` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchArgs {
	#[serde(flatten)]
	pub session: SessionArgs,
	/// Device or simulator to launch on.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub target: Option<String>,
	/// Extra arguments for the platform's run command.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub run_arguments: Vec<String>,
	/// Everything else in the launch configuration, forwarded verbatim to the
	/// remote extension.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl LaunchArgs {
	pub fn new(session: SessionArgs) -> Self {
		Self {
			session,
			target: None,
			run_arguments: Vec::new(),
			extra: Map::new(),
		}
	}

	/// Attach arguments for the attach that follows a successful launch.
	pub fn as_attach(&self) -> AttachArgs {
		AttachArgs {
			session: self.session.clone(),
			extra: self.extra.clone(),
		}
	}
}

/// Arguments of an `attach` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachArgs {
	#[serde(flatten)]
	pub session: SessionArgs,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl AttachArgs {
	pub fn new(session: SessionArgs) -> Self {
		Self {
			session,
			extra: Map::new(),
		}
	}

	pub fn platform(&self) -> Platform {
		self.session.platform
	}
}

/// Arguments of a `disconnect` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectArgs {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub terminate_debuggee: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub restart: Option<bool>,
}

impl DisconnectArgs {
	pub fn terminate() -> Self {
		Self {
			terminate_debuggee: Some(true),
			restart: None,
		}
	}
}

/// Attach request handed to the inspector transport.
///
/// Root mappings are always cleared: the port is forwarded locally, so remote and
/// local paths are the same.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportAttachArgs {
	pub address: String,
	pub port: u16,
	pub restart: bool,
	pub remote_root: Option<String>,
	pub local_root: Option<String>,
	pub source_maps: bool,
	pub platform: Platform,
	pub cwd: PathBuf,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub trace: Option<String>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl TransportAttachArgs {
	/// Builds the transport request for an attach to the packager on `port`.
	pub fn for_packager(args: &AttachArgs, port: u16) -> Self {
		let mut extra = args.extra.clone();
		extra.remove("remoteRoot");
		extra.remove("localRoot");
		Self {
			address: LOCAL_ADDRESS.to_string(),
			port,
			restart: true,
			remote_root: None,
			local_root: None,
			source_maps: args.session.source_maps.unwrap_or(true),
			platform: args.session.platform,
			cwd: args.session.cwd.clone(),
			trace: args.session.trace.clone(),
			extra,
		}
	}
}
