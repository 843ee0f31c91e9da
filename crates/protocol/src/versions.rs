use serde::{Deserialize, Serialize};

/// Version of the desktop-native host runtime, when one was asked for.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "camelCase")]
pub enum HostVersion {
	#[default]
	NotRequested,
	Resolved(String),
	/// The host version could not be determined; carries the reason.
	VersionError(String),
}

impl HostVersion {
	pub fn as_version(&self) -> Option<&str> {
		match self {
			Self::Resolved(v) => Some(v),
			_ => None,
		}
	}
}

/// React Native versions of the debugged project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeVersions {
	pub primary: String,
	#[serde(default)]
	pub host: HostVersion,
}

impl RuntimeVersions {
	pub fn new(primary: impl Into<String>) -> Self {
		Self {
			primary: primary.into(),
			host: HostVersion::NotRequested,
		}
	}

	pub fn with_host(mut self, host: HostVersion) -> Self {
		self.host = host;
		self
	}
}
