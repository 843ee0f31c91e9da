use std::fmt;

/// Lifecycle of a debug session.
///
/// `Disconnected` is terminal and reachable from every other state. A failed
/// launch or attach returns the session to `Uninitialized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
	#[default]
	Uninitialized,
	/// Settings gate is running.
	Initializing,
	/// Resolving runtime versions and the packager port.
	Resolving,
	/// Waiting for the inspector transport to attach.
	Connecting,
	Attached,
	Disconnected,
}

impl SessionState {
	pub fn is_terminal(self) -> bool {
		self == Self::Disconnected
	}
}

impl fmt::Display for SessionState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Uninitialized => write!(f, "uninitialized"),
			Self::Initializing => write!(f, "initializing"),
			Self::Resolving => write!(f, "resolving"),
			Self::Connecting => write!(f, "connecting"),
			Self::Attached => write!(f, "attached"),
			Self::Disconnected => write!(f, "disconnected"),
		}
	}
}
