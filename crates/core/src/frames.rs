//! Removal of native-runtime frames from paused call stacks.
//!
//! The IDE cannot map frames from the runtime's native layer to any source and
//! renders them as broken entries, so they are dropped before the stack is
//! surfaced.

use rn_debug_protocol::{CallFrame, PausedNotification};

/// Whether `frame` belongs to the native runtime layer.
pub fn is_native_frame(frame: &CallFrame) -> bool {
	frame.is_native()
}

/// Drops native frames, keeping the order of the remaining ones.
pub fn filter_native_frames(frames: Vec<CallFrame>) -> Vec<CallFrame> {
	frames.into_iter().filter(|frame| !is_native_frame(frame)).collect()
}

/// Returns `notification` with its native frames removed.
pub fn without_native_frames(mut notification: PausedNotification) -> PausedNotification {
	notification.call_frames = filter_native_frames(std::mem::take(&mut notification.call_frames));
	notification
}
