//! Paused-execution notifications reported by the JS runtime's inspector.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::native::{NATIVE_FUNCTION_NAME, NATIVE_SCRIPT_ID};

/// Position of a call frame inside a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
	pub script_id: String,
	pub line_number: u32,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub column_number: Option<u32>,
}

impl Location {
	pub fn new(script_id: impl Into<String>, line_number: u32) -> Self {
		Self {
			script_id: script_id.into(),
			line_number,
			column_number: None,
		}
	}
}

/// A single frame of a paused call stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFrame {
	pub call_frame_id: String,
	pub function_name: String,
	pub location: Location,
	/// Scope chain, `this` and other inspector fields the bridge does not inspect.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl CallFrame {
	pub fn new(call_frame_id: impl Into<String>, function_name: impl Into<String>, location: Location) -> Self {
		Self {
			call_frame_id: call_frame_id.into(),
			function_name: function_name.into(),
			location,
			extra: Map::new(),
		}
	}

	/// Whether this frame belongs to the runtime's native layer rather than to
	/// application code.
	pub fn is_native(&self) -> bool {
		self.function_name == NATIVE_FUNCTION_NAME || self.location.script_id == NATIVE_SCRIPT_ID
	}
}

/// `Debugger.paused` notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PausedNotification {
	pub call_frames: Vec<CallFrame>,
	#[serde(default)]
	pub reason: String,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl PausedNotification {
	pub fn new(reason: impl Into<String>, call_frames: Vec<CallFrame>) -> Self {
		Self {
			call_frames,
			reason: reason.into(),
			extra: Map::new(),
		}
	}
}
