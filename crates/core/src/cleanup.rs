//! Platform-specific teardown run when a session ends or a request fails.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use rn_debug_protocol::{AttachArgs, DisconnectArgs, OutputCategory};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::remote::RemoteClient;
use crate::transport::{OutputChannel, Transport};

/// Collaborators the cleanup task needs; cloned out of the session so the task
/// can outlive the request that triggered it.
pub struct CleanupContext {
	pub previous_attach_args: Option<AttachArgs>,
	pub remote: Option<Arc<dyn RemoteClient>>,
	pub transport: Arc<dyn Transport>,
	pub output: Arc<dyn OutputChannel>,
}

#[derive(Default)]
pub struct CleanupHandler {
	done: AtomicBool,
	task: Mutex<Option<JoinHandle<()>>>,
}

impl CleanupHandler {
	pub fn new() -> Self {
		Self::default()
	}

	/// Schedules teardown for the platform of the last attach.
	///
	/// Never fails and never waits. Without previous attach args there is nothing
	/// to tear down and the call is a no-op that can be repeated. Android teardown
	/// needs a bound remote client; without one the call is also a no-op. Otherwise
	/// the teardown body runs once per recorded attach (see [`Self::arm`]).
	pub fn run(&self, ctx: CleanupContext) {
		let Some(previous) = ctx.previous_attach_args else {
			debug!(target = "rn_debug.cleanup", "no previous attach; nothing to clean up");
			return;
		};

		let platform = previous.platform();
		if !platform.is_android() {
			debug!(target = "rn_debug.cleanup", %platform, "no platform cleanup needed");
			return;
		}

		let Some(remote) = ctx.remote else {
			debug!(target = "rn_debug.cleanup", "remote extension never connected; nothing to stop");
			return;
		};

		if self.done.swap(true, Ordering::SeqCst) {
			debug!(target = "rn_debug.cleanup", "cleanup already ran for this attach");
			return;
		}

		let handle = tokio::spawn(stop_android_session(remote, ctx.transport, ctx.output));
		*self.task.lock() = Some(handle);
	}

	/// Allows the teardown body to run again; called whenever new attach args are
	/// recorded, since a retried launch/attach starts fresh work on the device.
	pub fn arm(&self) {
		if self.done.swap(false, Ordering::SeqCst) {
			debug!(target = "rn_debug.cleanup", "cleanup re-armed for a new attach");
		}
	}

	pub fn has_run(&self) -> bool {
		self.done.load(Ordering::SeqCst)
	}

	/// Waits for scheduled teardown work, if any.
	pub async fn join(&self) {
		let handle = self.task.lock().take();
		if let Some(handle) = handle {
			if let Err(err) = handle.await {
				warn!(target = "rn_debug.cleanup", error = %err, "cleanup task failed");
			}
		}
	}
}

async fn stop_android_session(remote: Arc<dyn RemoteClient>, transport: Arc<dyn Transport>, output: Arc<dyn OutputChannel>) {
	if let Err(err) = remote.stop_monitoring().await {
		warn!(target = "rn_debug.cleanup", error = %err, "couldn't stop monitoring logcat");
		output.output(&format!("Couldn't stop monitoring logcat: {err}"), OutputCategory::Stderr);
	}

	if let Err(err) = transport.disconnect(DisconnectArgs::terminate()).await {
		warn!(target = "rn_debug.cleanup", error = %err, "terminate-debuggee disconnect failed");
	}
}
