//! Test doubles for the session's collaborators.
//!
//! Every mock can share a [`CallLog`] so tests can assert the order of calls
//! across collaborators, e.g. that log monitoring stops before the debuggee is
//! terminated.
//!
//! # Example
//!
//! ```ignore
//! let log = CallLog::default();
//! let remote = Arc::new(MockRemoteClient::new(log.clone()).with_port(8081));
//! let transport = Arc::new(MockTransport::new(log.clone()));
//! let session = Session::builder(transport.clone())
//!     .remote_factory(Arc::new(MockRemoteFactory::new(remote)))
//!     .build();
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rn_debug_protocol::{DisconnectArgs, LaunchArgs, OutputCategory, PausedNotification, RuntimeVersions, TransportAttachArgs};

use crate::error::{Error, Result};
use crate::remote::{RemoteClient, RemoteClientFactory};
use crate::telemetry::{TelemetryError, TelemetryEvent, TelemetrySink};
use crate::transport::{OutputChannel, Transport};
use crate::versions::VersionResolver;

/// Ordered record of calls made on the mocks.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
	pub fn push(&self, entry: impl Into<String>) {
		self.0.lock().push(entry.into());
	}

	pub fn entries(&self) -> Vec<String> {
		self.0.lock().clone()
	}

	pub fn contains(&self, entry: &str) -> bool {
		self.0.lock().iter().any(|e| e == entry)
	}

	/// Index of the first occurrence of `entry`.
	pub fn position(&self, entry: &str) -> Option<usize> {
		self.0.lock().iter().position(|e| e == entry)
	}
}

#[derive(Default)]
struct RemoteBehavior {
	port: u16,
	port_delay: Option<Duration>,
	launch_error: Option<String>,
	port_error: Option<String>,
	stop_error: Option<String>,
}

pub struct MockRemoteClient {
	log: CallLog,
	behavior: Mutex<RemoteBehavior>,
	launched: Mutex<Vec<LaunchArgs>>,
	port_requests: Mutex<Vec<PathBuf>>,
	stop_calls: AtomicUsize,
}

impl Default for MockRemoteClient {
	fn default() -> Self {
		Self::new(CallLog::default())
	}
}

impl MockRemoteClient {
	pub fn new(log: CallLog) -> Self {
		Self {
			log,
			behavior: Mutex::new(RemoteBehavior {
				port: 8081,
				..RemoteBehavior::default()
			}),
			launched: Mutex::new(Vec::new()),
			port_requests: Mutex::new(Vec::new()),
			stop_calls: AtomicUsize::new(0),
		}
	}

	pub fn with_port(self, port: u16) -> Self {
		self.behavior.lock().port = port;
		self
	}

	/// Holds every `get_packager_port` call for `delay` before answering.
	pub fn with_port_delay(self, delay: Duration) -> Self {
		self.behavior.lock().port_delay = Some(delay);
		self
	}

	pub fn fail_launch(self, message: &str) -> Self {
		self.behavior.lock().launch_error = Some(message.to_string());
		self
	}

	pub fn fail_port(self, message: &str) -> Self {
		self.behavior.lock().port_error = Some(message.to_string());
		self
	}

	pub fn fail_stop_monitoring(self, message: &str) -> Self {
		self.behavior.lock().stop_error = Some(message.to_string());
		self
	}

	/// Makes every later call succeed, for retry scenarios.
	pub fn clear_failures(&self) {
		let mut behavior = self.behavior.lock();
		behavior.launch_error = None;
		behavior.port_error = None;
		behavior.stop_error = None;
	}

	pub fn launched(&self) -> Vec<LaunchArgs> {
		self.launched.lock().clone()
	}

	pub fn port_requests(&self) -> Vec<PathBuf> {
		self.port_requests.lock().clone()
	}

	pub fn stop_calls(&self) -> usize {
		self.stop_calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl RemoteClient for MockRemoteClient {
	async fn launch(&self, args: &LaunchArgs) -> Result<()> {
		self.log.push("remote.launch");
		self.launched.lock().push(args.clone());
		match self.behavior.lock().launch_error.clone() {
			Some(message) => Err(Error::remote("launch", message)),
			None => Ok(()),
		}
	}

	async fn get_packager_port(&self, cwd: &Path) -> Result<u16> {
		self.log.push("remote.getPackagerPort");
		self.port_requests.lock().push(cwd.to_path_buf());
		let (port, delay, error) = {
			let behavior = self.behavior.lock();
			(behavior.port, behavior.port_delay, behavior.port_error.clone())
		};
		if let Some(delay) = delay {
			tokio::time::sleep(delay).await;
		}
		match error {
			Some(message) => Err(Error::remote("getPackagerPort", message)),
			None => Ok(port),
		}
	}

	async fn stop_monitoring(&self) -> Result<()> {
		self.log.push("remote.stopMonitoring");
		self.stop_calls.fetch_add(1, Ordering::SeqCst);
		match self.behavior.lock().stop_error.clone() {
			Some(message) => Err(Error::remote("stopMonitoringLogcat", message)),
			None => Ok(()),
		}
	}
}

/// Factory handing out one shared [`MockRemoteClient`].
pub struct MockRemoteFactory {
	client: Arc<MockRemoteClient>,
	roots: Mutex<Vec<PathBuf>>,
	connects: AtomicUsize,
}

impl Default for MockRemoteFactory {
	fn default() -> Self {
		Self::new(Arc::new(MockRemoteClient::default()))
	}
}

impl MockRemoteFactory {
	pub fn new(client: Arc<MockRemoteClient>) -> Self {
		Self {
			client,
			roots: Mutex::new(Vec::new()),
			connects: AtomicUsize::new(0),
		}
	}

	pub fn client(&self) -> &Arc<MockRemoteClient> {
		&self.client
	}

	pub fn connect_count(&self) -> usize {
		self.connects.load(Ordering::SeqCst)
	}

	pub fn roots(&self) -> Vec<PathBuf> {
		self.roots.lock().clone()
	}
}

impl RemoteClientFactory for MockRemoteFactory {
	fn connect(&self, project_root: &Path) -> Result<Arc<dyn RemoteClient>> {
		self.connects.fetch_add(1, Ordering::SeqCst);
		self.roots.lock().push(project_root.to_path_buf());
		Ok(self.client.clone())
	}
}

pub struct MockTransport {
	log: CallLog,
	attach_error: Mutex<Option<String>>,
	disconnect_error: Mutex<Option<String>>,
	attaches: Mutex<Vec<TransportAttachArgs>>,
	disconnects: Mutex<Vec<DisconnectArgs>>,
	paused: Mutex<Vec<PausedNotification>>,
}

impl Default for MockTransport {
	fn default() -> Self {
		Self::new(CallLog::default())
	}
}

impl MockTransport {
	pub fn new(log: CallLog) -> Self {
		Self {
			log,
			attach_error: Mutex::new(None),
			disconnect_error: Mutex::new(None),
			attaches: Mutex::new(Vec::new()),
			disconnects: Mutex::new(Vec::new()),
			paused: Mutex::new(Vec::new()),
		}
	}

	pub fn fail_attach(self, message: &str) -> Self {
		*self.attach_error.lock() = Some(message.to_string());
		self
	}

	pub fn fail_disconnect(self, message: &str) -> Self {
		*self.disconnect_error.lock() = Some(message.to_string());
		self
	}

	pub fn attaches(&self) -> Vec<TransportAttachArgs> {
		self.attaches.lock().clone()
	}

	pub fn disconnects(&self) -> Vec<DisconnectArgs> {
		self.disconnects.lock().clone()
	}

	pub fn paused(&self) -> Vec<PausedNotification> {
		self.paused.lock().clone()
	}
}

#[async_trait]
impl Transport for MockTransport {
	async fn attach(&self, args: TransportAttachArgs) -> Result<()> {
		self.log.push("transport.attach");
		self.attaches.lock().push(args);
		match self.attach_error.lock().clone() {
			Some(message) => Err(Error::Transport(message)),
			None => Ok(()),
		}
	}

	async fn disconnect(&self, args: DisconnectArgs) -> Result<()> {
		let entry = if args.terminate_debuggee == Some(true) {
			"transport.disconnect(terminate)"
		} else {
			"transport.disconnect"
		};
		self.log.push(entry);
		self.disconnects.lock().push(args);
		match self.disconnect_error.lock().clone() {
			Some(message) => Err(Error::Transport(message)),
			None => Ok(()),
		}
	}

	async fn on_paused(&self, notification: PausedNotification) -> Result<()> {
		self.log.push("transport.onPaused");
		self.paused.lock().push(notification);
		Ok(())
	}
}

pub struct MockVersionResolver {
	log: CallLog,
	versions: Mutex<std::result::Result<RuntimeVersions, String>>,
	requests: Mutex<Vec<bool>>,
}

impl Default for MockVersionResolver {
	fn default() -> Self {
		Self::new(CallLog::default())
	}
}

impl MockVersionResolver {
	pub fn new(log: CallLog) -> Self {
		Self {
			log,
			versions: Mutex::new(Ok(RuntimeVersions::new("0.73.0"))),
			requests: Mutex::new(Vec::new()),
		}
	}

	pub fn with_versions(self, versions: RuntimeVersions) -> Self {
		*self.versions.lock() = Ok(versions);
		self
	}

	pub fn fail(self, reason: &str) -> Self {
		*self.versions.lock() = Err(reason.to_string());
		self
	}

	/// `native_host` flag of every request, in order.
	pub fn requests(&self) -> Vec<bool> {
		self.requests.lock().clone()
	}
}

#[async_trait]
impl VersionResolver for MockVersionResolver {
	async fn get_versions(&self, project_root: &Path, native_host: bool) -> Result<RuntimeVersions> {
		self.log.push("versions.get");
		self.requests.lock().push(native_host);
		match self.versions.lock().clone() {
			Ok(versions) => Ok(versions),
			Err(reason) => Err(Error::VersionResolution {
				path: project_root.to_path_buf(),
				reason,
			}),
		}
	}
}

/// Output channel that keeps every line.
#[derive(Default)]
pub struct RecordingOutput {
	lines: Mutex<Vec<(String, OutputCategory)>>,
}

impl RecordingOutput {
	pub fn lines(&self) -> Vec<(String, OutputCategory)> {
		self.lines.lock().clone()
	}

	pub fn contains(&self, needle: &str) -> bool {
		self.lines.lock().iter().any(|(line, _)| line.contains(needle))
	}
}

impl OutputChannel for RecordingOutput {
	fn output(&self, text: &str, category: OutputCategory) {
		self.lines.lock().push((text.to_string(), category));
	}
}

/// Telemetry sink that keeps every event, optionally failing each send.
#[derive(Default)]
pub struct RecordingTelemetry {
	events: Mutex<Vec<TelemetryEvent>>,
	fail: bool,
}

impl RecordingTelemetry {
	pub fn failing() -> Self {
		Self {
			events: Mutex::new(Vec::new()),
			fail: true,
		}
	}

	pub fn events(&self) -> Vec<TelemetryEvent> {
		self.events.lock().clone()
	}

	pub fn names(&self) -> Vec<String> {
		self.events.lock().iter().map(|e| e.name.clone()).collect()
	}
}

impl TelemetrySink for RecordingTelemetry {
	fn send(&self, event: &TelemetryEvent) -> std::result::Result<(), TelemetryError> {
		self.events.lock().push(event.clone());
		if self.fail {
			return Err(TelemetryError::Unavailable("recording sink set to fail".into()));
		}
		Ok(())
	}
}
