use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	/// The resolved project root is not a React Native project. The settings gate
	/// stays uninitialized so the request can be retried after the workspace is fixed.
	#[error("{} is not a React Native project folder (no package.json with a react-native dependency)", path.display())]
	NotInProjectFolder { path: PathBuf },

	#[error("could not determine the React Native version in {}: {reason}", path.display())]
	VersionResolution { path: PathBuf, reason: String },

	/// A call to the remote extension failed. `message` is the remote's own error
	/// text, kept verbatim.
	#[error("{message}")]
	RemoteCall { method: &'static str, message: String },

	#[error("{0}")]
	Transport(String),

	#[error("debug session was disconnected")]
	Cancelled,

	#[error("invalid configuration: {0}")]
	Config(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

/// Coarse classification used for logging and telemetry properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	Configuration,
	VersionResolution,
	RemoteCall,
	Transport,
	Cancelled,
	Internal,
}

impl ErrorKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Configuration => "configuration",
			Self::VersionResolution => "versionResolution",
			Self::RemoteCall => "remoteCall",
			Self::Transport => "transport",
			Self::Cancelled => "cancelled",
			Self::Internal => "internal",
		}
	}
}

impl Error {
	pub fn remote(method: &'static str, message: impl Into<String>) -> Self {
		Self::RemoteCall {
			method,
			message: message.into(),
		}
	}

	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::NotInProjectFolder { .. } | Error::Config(_) => ErrorKind::Configuration,
			Error::VersionResolution { .. } => ErrorKind::VersionResolution,
			Error::RemoteCall { .. } => ErrorKind::RemoteCall,
			Error::Transport(_) => ErrorKind::Transport,
			Error::Cancelled => ErrorKind::Cancelled,
			Error::Io(_) | Error::Json(_) => ErrorKind::Internal,
		}
	}

	pub fn is_cancelled(&self) -> bool {
		matches!(self, Error::Cancelled)
	}
}
