//! Target platforms and trace levels accepted in request arguments.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Platform the debugged application runs on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
	Android,
	Ios,
	/// React Native for Windows, a desktop-native host.
	Windows,
	/// React Native for macOS, a desktop-native host.
	Macos,
	/// Expo-hosted application.
	#[serde(rename = "exprogram", alias = "exponent")]
	Exponent,
}

impl Platform {
	pub const ALL: [Platform; 5] = [Self::Android, Self::Ios, Self::Windows, Self::Macos, Self::Exponent];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Android => "android",
			Self::Ios => "ios",
			Self::Windows => "windows",
			Self::Macos => "macos",
			Self::Exponent => "exprogram",
		}
	}

	pub fn is_android(self) -> bool {
		self == Self::Android
	}

	/// Whether the app runs inside a desktop-native React Native host with its own
	/// versioned package.
	pub fn is_native_host(self) -> bool {
		matches!(self, Self::Windows | Self::Macos)
	}

	/// npm package that carries the native host runtime, if any.
	pub fn host_package(self) -> Option<&'static str> {
		match self {
			Self::Windows => Some("react-native-windows"),
			Self::Macos => Some("react-native-macos"),
			_ => None,
		}
	}
}

impl fmt::Display for Platform {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePlatformError(pub String);

impl fmt::Display for ParsePlatformError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "unknown platform: {}", self.0)
	}
}

impl std::error::Error for ParsePlatformError {}

impl FromStr for Platform {
	type Err = ParsePlatformError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"android" => Ok(Self::Android),
			"ios" => Ok(Self::Ios),
			"windows" => Ok(Self::Windows),
			"macos" => Ok(Self::Macos),
			"exprogram" | "exponent" => Ok(Self::Exponent),
			_ => Err(ParsePlatformError(s.to_string())),
		}
	}
}

/// Verbosity of the bridge's own logs, driven by the `trace` request argument.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TraceLevel {
	Off,
	Error,
	Warn,
	#[default]
	Log,
	Verbose,
}

impl TraceLevel {
	/// Parses a `trace` token the way IDE launch configs spell it.
	///
	/// Only the first character is upper-cased before matching, so `"verbose"` and
	/// `"Verbose"` are accepted while `"VERBOSE"` is not.
	pub fn from_token(token: &str) -> Option<Self> {
		let mut chars = token.chars();
		let first = chars.next()?;
		let normalized: String = first.to_uppercase().chain(chars).collect();
		match normalized.as_str() {
			"Off" => Some(Self::Off),
			"Error" => Some(Self::Error),
			"Warn" => Some(Self::Warn),
			"Log" => Some(Self::Log),
			"Verbose" => Some(Self::Verbose),
			_ => None,
		}
	}

	/// Resolves an optional `trace` argument, defaulting to [`TraceLevel::Log`].
	pub fn from_arg(trace: Option<&str>) -> Self {
		trace.and_then(Self::from_token).unwrap_or_default()
	}
}

impl fmt::Display for TraceLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			Self::Off => "Off",
			Self::Error => "Error",
			Self::Warn => "Warn",
			Self::Log => "Log",
			Self::Verbose => "Verbose",
		};
		f.write_str(s)
	}
}
