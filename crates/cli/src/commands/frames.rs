use std::io::Read;
use std::path::Path;

use anyhow::Context;
use rn_debug::without_native_frames;
use rn_debug_protocol::PausedNotification;
use serde::Serialize;

use crate::error::Result;
use crate::output::{OutputFormat, ResultBuilder, print_result};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FramesData {
	/// Number of native frames dropped
	pub removed: usize,
	pub notification: PausedNotification,
}

/// Parses a paused notification and drops its native frames.
pub fn filter_notification(raw: &str) -> anyhow::Result<FramesData> {
	let notification: PausedNotification = serde_json::from_str(raw).context("parsing Debugger.paused notification")?;
	let before = notification.call_frames.len();
	let notification = without_native_frames(notification);
	Ok(FramesData {
		removed: before - notification.call_frames.len(),
		notification,
	})
}

pub(super) fn execute(input: Option<&Path>, format: OutputFormat) -> Result<()> {
	let raw = match input {
		Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?,
		None => {
			let mut raw = String::new();
			std::io::stdin().read_to_string(&mut raw).context("reading stdin")?;
			raw
		}
	};

	let data = filter_notification(&raw)?;
	print_result(&ResultBuilder::new("frames").data(data).build(), format);
	Ok(())
}
