use serde::{Deserialize, Serialize};

/// Category of a line written to the IDE output channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputCategory {
	#[default]
	Console,
	Stdout,
	Stderr,
	Telemetry,
}

impl OutputCategory {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Console => "console",
			Self::Stdout => "stdout",
			Self::Stderr => "stderr",
			Self::Telemetry => "telemetry",
		}
	}
}
