//! Sentinels the JS runtime uses for frames that belong to its native layer.
//!
//! The values must match what the runtime reports byte for byte; the inspector
//! transport compares them as strings.

/// Function name reported for native (host) functions on the call stack.
pub const NATIVE_FUNCTION_NAME: &str = "(native)";

/// Script id reported for frames without a script, `u32::MAX` rendered as a string.
pub const NATIVE_SCRIPT_ID: &str = "4294967295";

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn native_script_id_is_invalid_u32_id() {
		assert_eq!(NATIVE_SCRIPT_ID.parse::<u32>().unwrap(), u32::MAX);
	}
}
