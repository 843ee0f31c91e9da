//! Debug session state machine.
//!
//! A [`Session`] turns IDE launch/attach/disconnect requests into calls on the
//! remote extension and the inspector transport:
//!
//! 1. the settings gate validates the project and binds the remote client (once)
//! 2. runtime versions are resolved for telemetry
//! 3. launch asks the remote extension to start the app
//! 4. the packager port is taken from the request or asked from the remote
//! 5. the transport attaches to `localhost:<port>`
//!
//! Launch and attach bodies are serialized by a per-session lock. `disconnect`
//! cancels the session token; any in-flight request resumes into
//! [`Error::Cancelled`] instead of touching a torn-down session.

mod builder;
mod state;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

pub use builder::SessionBuilder;
use parking_lot::Mutex;
use rn_debug_protocol::{AttachArgs, DisconnectArgs, LaunchArgs, OutputCategory, PausedNotification, SessionArgs, TransportAttachArgs};
pub use state::SessionState;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use crate::cleanup::{CleanupContext, CleanupHandler};
use crate::error::{Error, Result};
use crate::frames::without_native_frames;
use crate::settings::{Settings, SettingsGate};
use crate::telemetry::{PropertyBag, Telemetry, session_properties};
use crate::transport::{OutputChannel, Transport};
use crate::versions::VersionResolver;

pub struct Session {
	state: Mutex<SessionState>,
	gate: Mutex<SettingsGate>,
	/// Args of the most recent launch/attach; cleanup reads the platform from here
	/// after the request itself is gone.
	previous_attach_args: Mutex<Option<AttachArgs>>,
	flow: tokio::sync::Mutex<()>,
	cancel: CancellationToken,
	cleanup: CleanupHandler,
	transport: Arc<dyn Transport>,
	output: Arc<dyn OutputChannel>,
	versions: Arc<dyn VersionResolver>,
	telemetry: Telemetry,
}

impl Session {
	pub fn builder(transport: Arc<dyn Transport>) -> SessionBuilder {
		SessionBuilder::new(transport)
	}

	pub fn state(&self) -> SessionState {
		*self.state.lock()
	}

	pub fn previous_attach_args(&self) -> Option<AttachArgs> {
		self.previous_attach_args.lock().clone()
	}

	pub fn settings(&self) -> Option<Settings> {
		self.gate.lock().settings().cloned()
	}

	pub fn project_root(&self) -> Option<PathBuf> {
		self.gate.lock().settings().map(|s| s.project_root().to_path_buf())
	}

	/// How many times the settings gate body has run.
	pub fn init_count(&self) -> usize {
		self.gate.lock().init_count()
	}

	/// Token cancelled when the session disconnects.
	pub fn cancellation_token(&self) -> CancellationToken {
		self.cancel.clone()
	}

	/// Waits for teardown work scheduled by cleanup.
	pub async fn join_cleanup(&self) {
		self.cleanup.join().await;
	}

	/// Launches the app through the remote extension, then attaches to it.
	pub async fn launch(&self, args: LaunchArgs) -> Result<()> {
		self.record_attach_args(args.as_attach());
		let _flow = self.enter().await?;
		let result = self.launch_flow(args).await;
		self.finish("launching the application", result)
	}

	/// Attaches to an app that is already running.
	pub async fn attach(&self, args: AttachArgs) -> Result<()> {
		self.record_attach_args(args.clone());
		let _flow = self.enter().await?;
		let result = self.attach_flow(args).await;
		self.finish("attaching debugger to the application", result)
	}

	/// Ends the session.
	///
	/// Cleanup only schedules its work, so the transport disconnect always runs.
	pub async fn disconnect(&self, args: DisconnectArgs) -> Result<()> {
		self.cancel.cancel();
		let previous = std::mem::replace(&mut *self.state.lock(), SessionState::Disconnected);
		debug!(target = "rn_debug.session", from = %previous, "disconnecting");
		self.run_cleanup();
		self.transport.disconnect(args).await
	}

	/// Forwards a paused notification with native frames removed.
	pub async fn on_paused(&self, notification: PausedNotification) -> Result<()> {
		let before = notification.call_frames.len();
		let filtered = without_native_frames(notification);
		let removed = before - filtered.call_frames.len();
		if removed > 0 {
			trace!(target = "rn_debug.session", removed, "dropped native frames");
		}
		self.transport.on_paused(filtered).await
	}

	async fn launch_flow(&self, mut args: LaunchArgs) -> Result<()> {
		self.transition(SessionState::Initializing)?;
		let settings = self.initialize(&mut args.session)?;

		self.transition(SessionState::Resolving)?;
		let platform = args.session.platform;
		let versions = self.guard(self.versions.get_versions(settings.project_root(), platform.is_native_host())).await?;

		self.telemetry
			.generate("launch", session_properties(platform, &versions), |bag| async move {
				self.guard(settings.remote().launch(&args)).await?;
				debug!(target = "rn_debug.session", %platform, "remote launch finished");

				let port = self.packager_port(&args.session, &settings, &bag).await?;
				let mut attach = args.as_attach();
				attach.session.port = Some(port);
				self.record_attach_args(attach.clone());
				self.attach_flow(attach).await
			})
			.await
	}

	async fn attach_flow(&self, mut args: AttachArgs) -> Result<()> {
		self.transition(SessionState::Initializing)?;
		let settings = self.initialize(&mut args.session)?;

		// Attach assumes the host is already running, so the host version is
		// always looked up.
		self.transition(SessionState::Resolving)?;
		let versions = self.guard(self.versions.get_versions(settings.project_root(), true)).await?;
		let platform = args.platform();

		self.telemetry
			.generate("attach", session_properties(platform, &versions), |bag| async move {
				let port = self.packager_port(&args.session, &settings, &bag).await?;

				self.transition(SessionState::Connecting)?;
				let request = TransportAttachArgs::for_packager(&args, port);
				self.guard(self.transport.attach(request)).await?;

				self.transition(SessionState::Attached)?;
				info!(target = "rn_debug.session", %platform, port, "attached to packager");
				self.output.output(
					&format!("Debugger attached to the application on packager port {port}."),
					OutputCategory::Console,
				);
				Ok(())
			})
			.await
	}

	async fn packager_port(&self, args: &SessionArgs, settings: &Settings, bag: &PropertyBag) -> Result<u16> {
		let port = match args.port {
			Some(port) => {
				debug!(target = "rn_debug.session", port, "using explicit packager port");
				port
			}
			None => self.guard(settings.remote().get_packager_port(&args.cwd)).await?,
		};
		bag.add("packagerPort", port);
		bag.add("explicitPort", args.port.is_some());
		Ok(port)
	}

	fn initialize(&self, args: &mut SessionArgs) -> Result<Settings> {
		let settings = self.gate.lock().ensure_initialized(args)?;
		self.check_live()?;
		Ok(settings)
	}

	async fn enter(&self) -> Result<tokio::sync::MutexGuard<'_, ()>> {
		self.check_live()?;
		self.guard(async { Ok(self.flow.lock().await) }).await
	}

	/// Awaits `fut` unless the session disconnects first.
	async fn guard<T, F>(&self, fut: F) -> Result<T>
	where
		F: Future<Output = Result<T>>,
	{
		tokio::select! {
			biased;
			_ = self.cancel.cancelled() => Err(Error::Cancelled),
			result = fut => {
				self.check_live()?;
				result
			}
		}
	}

	fn check_live(&self) -> Result<()> {
		if self.cancel.is_cancelled() {
			return Err(Error::Cancelled);
		}
		Ok(())
	}

	fn transition(&self, next: SessionState) -> Result<()> {
		self.check_live()?;
		let mut state = self.state.lock();
		if state.is_terminal() {
			return Err(Error::Cancelled);
		}
		trace!(target = "rn_debug.session", from = %*state, to = %next, "state transition");
		*state = next;
		Ok(())
	}

	/// Recording new args re-arms cleanup so a retried request gets its own
	/// teardown. A disconnected session stays disarmed.
	fn record_attach_args(&self, args: AttachArgs) {
		*self.previous_attach_args.lock() = Some(args);
		if !self.cancel.is_cancelled() {
			self.cleanup.arm();
		}
	}

	fn finish(&self, action: &str, result: Result<()>) -> Result<()> {
		if let Err(err) = &result {
			error!(target = "rn_debug.session", error = %err, kind = err.kind().as_str(), "{action} failed");
			self.output.output(&format!("An error occurred while {action}. {err}"), OutputCategory::Stderr);
			{
				let mut state = self.state.lock();
				if !state.is_terminal() {
					*state = SessionState::Uninitialized;
				}
			}
			self.run_cleanup();
		}
		result
	}

	fn run_cleanup(&self) {
		let remote = self.gate.lock().settings().map(|s| s.remote().clone());
		self.cleanup.run(CleanupContext {
			previous_attach_args: self.previous_attach_args(),
			remote,
			transport: self.transport.clone(),
			output: self.output.clone(),
		});
	}
}
