use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use rn_debug::testing::{
	CallLog, MockRemoteClient, MockRemoteFactory, MockTransport, MockVersionResolver, RecordingOutput, RecordingTelemetry,
};
use rn_debug::{Error, Session, SessionState, Telemetry};
use rn_debug_protocol::{
	AttachArgs, CallFrame, DisconnectArgs, HostVersion, LaunchArgs, Location, OutputCategory, PausedNotification,
	Platform, RuntimeVersions, SessionArgs, TransportAttachArgs,
};
use serde_json::{Map, json};
use tempfile::TempDir;

struct Mocks {
	log: CallLog,
	remote: MockRemoteClient,
	transport: MockTransport,
	versions: MockVersionResolver,
	telemetry: RecordingTelemetry,
}

impl Mocks {
	fn new() -> Self {
		let log = CallLog::default();
		Self {
			remote: MockRemoteClient::new(log.clone()),
			transport: MockTransport::new(log.clone()),
			versions: MockVersionResolver::new(log.clone()),
			telemetry: RecordingTelemetry::default(),
			log,
		}
	}

	fn remote(mut self, configure: impl FnOnce(MockRemoteClient) -> MockRemoteClient) -> Self {
		self.remote = configure(self.remote);
		self
	}

	fn transport(mut self, configure: impl FnOnce(MockTransport) -> MockTransport) -> Self {
		self.transport = configure(self.transport);
		self
	}

	fn versions(mut self, configure: impl FnOnce(MockVersionResolver) -> MockVersionResolver) -> Self {
		self.versions = configure(self.versions);
		self
	}

	fn telemetry(mut self, telemetry: RecordingTelemetry) -> Self {
		self.telemetry = telemetry;
		self
	}

	fn build(self) -> Harness {
		let project = TempDir::new().unwrap();
		write_manifest(project.path());

		let remote = Arc::new(self.remote);
		let factory = Arc::new(MockRemoteFactory::new(remote.clone()));
		let transport = Arc::new(self.transport);
		let versions = Arc::new(self.versions);
		let output = Arc::new(RecordingOutput::default());
		let telemetry = Arc::new(self.telemetry);

		let session = Session::builder(transport.clone())
			.remote_factory(factory.clone())
			.versions(versions.clone())
			.output(output.clone())
			.telemetry(Telemetry::new(telemetry.clone()))
			.build();

		Harness {
			log: self.log,
			remote,
			factory,
			transport,
			versions,
			output,
			telemetry,
			session: Arc::new(session),
			project,
		}
	}
}

struct Harness {
	log: CallLog,
	remote: Arc<MockRemoteClient>,
	factory: Arc<MockRemoteFactory>,
	transport: Arc<MockTransport>,
	versions: Arc<MockVersionResolver>,
	output: Arc<RecordingOutput>,
	telemetry: Arc<RecordingTelemetry>,
	session: Arc<Session>,
	project: TempDir,
}

impl Harness {
	fn root(&self) -> PathBuf {
		self.project.path().to_path_buf()
	}

	fn attach_args(&self, platform: Platform) -> AttachArgs {
		AttachArgs::new(SessionArgs::new(platform, self.root()))
	}

	fn launch_args(&self, platform: Platform) -> LaunchArgs {
		LaunchArgs::new(SessionArgs::new(platform, self.root()))
	}
}

fn write_manifest(root: &Path) {
	let manifest = json!({
		"name": "sample-app",
		"dependencies": { "react-native": "0.73.0" },
	});
	std::fs::write(root.join("package.json"), manifest.to_string()).unwrap();
}

fn frame(id: &str, function_name: &str, script_id: &str) -> CallFrame {
	CallFrame::new(id, function_name, Location::new(script_id, 1))
}

#[tokio::test]
async fn ios_attach_targets_local_packager() {
	let h = Mocks::new().build();

	h.session.attach(h.attach_args(Platform::Ios)).await.unwrap();

	let expected = TransportAttachArgs {
		address: "localhost".to_string(),
		port: 8081,
		restart: true,
		remote_root: None,
		local_root: None,
		source_maps: true,
		platform: Platform::Ios,
		cwd: h.root(),
		trace: None,
		extra: Map::new(),
	};
	assert_eq!(h.transport.attaches(), vec![expected]);
	assert_eq!(h.remote.port_requests(), vec![h.root()]);
	assert_eq!(h.session.state(), SessionState::Attached);
	assert!(h.output.contains("packager port 8081"));
}

#[tokio::test]
async fn attach_clears_root_mappings() {
	let h = Mocks::new().build();
	let mut args = h.attach_args(Platform::Ios);
	args.extra.insert("remoteRoot".into(), json!("/device/app"));
	args.extra.insert("localRoot".into(), json!("/work/app"));
	args.extra.insert("address".into(), json!("10.0.0.4"));

	h.session.attach(args).await.unwrap();

	let attach = &h.transport.attaches()[0];
	assert_eq!(attach.address, "localhost");
	assert_eq!(attach.remote_root, None);
	assert_eq!(attach.local_root, None);
	assert!(!attach.extra.contains_key("remoteRoot"));
	assert!(!attach.extra.contains_key("localRoot"));
}

#[tokio::test]
async fn settings_gate_runs_once_per_session() {
	let h = Mocks::new().build();

	h.session.attach(h.attach_args(Platform::Ios)).await.unwrap();
	h.session.attach(h.attach_args(Platform::Ios)).await.unwrap();

	assert_eq!(h.session.init_count(), 1);
	assert_eq!(h.factory.connect_count(), 1);
	assert_eq!(h.factory.roots(), vec![h.root()]);
	assert_eq!(h.transport.attaches().len(), 2);
}

#[tokio::test]
async fn invalid_project_leaves_gate_uninitialized() {
	let h = Mocks::new().build();
	let empty = TempDir::new().unwrap();
	let args = AttachArgs::new(SessionArgs::new(Platform::Ios, empty.path()));

	let err = h.session.attach(args).await.unwrap_err();

	assert!(matches!(err, Error::NotInProjectFolder { .. }), "unexpected error: {err}");
	assert_eq!(h.session.state(), SessionState::Uninitialized);
	assert!(h.session.settings().is_none());
	assert_eq!(h.factory.connect_count(), 0);

	h.session.attach(h.attach_args(Platform::Ios)).await.unwrap();
	assert_eq!(h.session.init_count(), 2);
	assert_eq!(h.session.project_root(), Some(h.root()));
}

#[tokio::test]
async fn explicit_port_skips_packager_lookup() {
	let h = Mocks::new().build();
	let mut args = h.attach_args(Platform::Android);
	args.session.port = Some(19000);

	h.session.attach(args).await.unwrap();

	assert!(h.remote.port_requests().is_empty());
	assert!(!h.log.contains("remote.getPackagerPort"));
	assert_eq!(h.transport.attaches()[0].port, 19000);
}

#[tokio::test]
async fn packager_port_comes_from_remote() {
	let h = Mocks::new().remote(|remote| remote.with_port(8088)).build();

	h.session.attach(h.attach_args(Platform::Ios)).await.unwrap();

	assert_eq!(h.transport.attaches()[0].port, 8088);
	assert_eq!(h.telemetry.events()[0].properties.get("explicitPort"), Some(&json!(false)));
}

#[tokio::test]
async fn packager_port_failure_rejects_attach() {
	let h = Mocks::new()
		.remote(|remote| remote.fail_port("Packager is not running in /work/app"))
		.build();

	let err = h.session.attach(h.attach_args(Platform::Ios)).await.unwrap_err();

	assert_eq!(err.to_string(), "Packager is not running in /work/app");
	assert!(h.transport.attaches().is_empty());
	assert_eq!(h.session.state(), SessionState::Uninitialized);
	assert!(h.session.settings().is_some());
	let event = &h.telemetry.events()[0];
	assert_eq!(event.name, "attach");
	assert!(matches!(event.outcome, rn_debug::TelemetryOutcome::Failed { ref kind, .. } if kind == "remoteCall"));
}

#[tokio::test]
async fn attach_always_requests_host_version() {
	let h = Mocks::new().build();

	h.session.attach(h.attach_args(Platform::Android)).await.unwrap();

	assert_eq!(h.versions.requests(), vec![true]);
}

#[tokio::test]
async fn launch_starts_app_then_attaches() {
	let h = Mocks::new().build();
	let mut args = h.launch_args(Platform::Android);
	args.target = Some("emulator-5554".to_string());

	h.session.launch(args).await.unwrap();

	assert_eq!(
		h.log.entries(),
		vec![
			"versions.get",
			"remote.launch",
			"remote.getPackagerPort",
			"versions.get",
			"transport.attach",
		]
	);
	let launched = h.remote.launched();
	assert_eq!(launched.len(), 1);
	assert_eq!(launched[0].target.as_deref(), Some("emulator-5554"));
	assert_eq!(launched[0].session.source_maps, Some(true));

	let previous = h.session.previous_attach_args().unwrap();
	assert_eq!(previous.platform(), Platform::Android);
	assert_eq!(previous.session.port, Some(8081));
	assert_eq!(h.session.state(), SessionState::Attached);
	assert_eq!(h.telemetry.names(), vec!["attach", "launch"]);
}

#[tokio::test]
async fn launch_requests_host_version_only_for_native_hosts() {
	let h = Mocks::new().build();
	h.session.launch(h.launch_args(Platform::Android)).await.unwrap();
	assert_eq!(h.versions.requests(), vec![false, true]);

	let h = Mocks::new().build();
	h.session.launch(h.launch_args(Platform::Windows)).await.unwrap();
	assert_eq!(h.versions.requests(), vec![true, true]);
}

#[tokio::test]
async fn launch_failure_keeps_remote_message() {
	let h = Mocks::new().remote(|remote| remote.fail_launch("No devices connected")).build();

	let err = h.session.launch(h.launch_args(Platform::Ios)).await.unwrap_err();

	assert_eq!(err.to_string(), "No devices connected");
	assert!(h.output.lines().contains(&(
		"An error occurred while launching the application. No devices connected".to_string(),
		OutputCategory::Stderr,
	)));
	assert!(h.transport.attaches().is_empty());
	assert_eq!(h.session.state(), SessionState::Uninitialized);
}

fn terminate_count(transport: &MockTransport) -> usize {
	transport
		.disconnects()
		.iter()
		.filter(|args| **args == DisconnectArgs::terminate())
		.count()
}

#[tokio::test]
async fn failed_android_attach_still_stops_monitoring() {
	let h = Mocks::new().versions(|versions| versions.fail("node_modules missing")).build();

	let err = h.session.attach(h.attach_args(Platform::Android)).await.unwrap_err();
	assert!(matches!(err, Error::VersionResolution { .. }), "unexpected error: {err}");
	assert!(h.output.contains("An error occurred while attaching debugger to the application."));
	h.session.join_cleanup().await;
	assert_eq!(h.remote.stop_calls(), 1);

	h.session.disconnect(DisconnectArgs::default()).await.unwrap();
	h.session.join_cleanup().await;

	assert_eq!(h.session.previous_attach_args().map(|args| args.platform()), Some(Platform::Android));
	assert_eq!(h.remote.stop_calls(), 1);
	assert_eq!(terminate_count(&h.transport), 1);
	let stop = h.log.position("remote.stopMonitoring").unwrap();
	let terminate = h.log.position("transport.disconnect(terminate)").unwrap();
	assert!(stop < terminate);
	assert!(h.transport.attaches().is_empty());
}

#[tokio::test]
async fn disconnect_during_android_attach_tears_down_its_platform() {
	let h = Mocks::new()
		.remote(|remote| remote.with_port_delay(Duration::from_millis(200)))
		.build();
	let session = h.session.clone();
	let args = h.attach_args(Platform::Android);
	let attach = tokio::spawn(async move { session.attach(args).await });

	tokio::time::sleep(Duration::from_millis(20)).await;
	h.session.disconnect(DisconnectArgs::default()).await.unwrap();
	h.session.join_cleanup().await;

	assert_eq!(h.remote.stop_calls(), 1);
	let stop = h.log.position("remote.stopMonitoring").unwrap();
	let terminate = h.log.position("transport.disconnect(terminate)").unwrap();
	assert!(stop < terminate);

	let result = attach.await.unwrap();
	assert!(matches!(result, Err(Error::Cancelled)));
	h.session.join_cleanup().await;
	assert_eq!(h.remote.stop_calls(), 1);
	assert_eq!(terminate_count(&h.transport), 1);
	assert!(h.transport.attaches().is_empty());
}

#[tokio::test]
async fn retried_android_attach_is_cleaned_up_on_disconnect() {
	let h = Mocks::new().build();
	let empty = TempDir::new().unwrap();

	let err = h
		.session
		.attach(AttachArgs::new(SessionArgs::new(Platform::Android, empty.path())))
		.await
		.unwrap_err();
	assert!(matches!(err, Error::NotInProjectFolder { .. }), "unexpected error: {err}");
	h.session.join_cleanup().await;
	assert_eq!(h.remote.stop_calls(), 0);
	assert!(h.transport.disconnects().is_empty());
	assert!(!h.output.contains("Couldn't stop monitoring logcat"));

	h.session.attach(h.attach_args(Platform::Android)).await.unwrap();
	assert_eq!(h.session.state(), SessionState::Attached);

	h.session.disconnect(DisconnectArgs::default()).await.unwrap();
	h.session.join_cleanup().await;

	assert_eq!(h.remote.stop_calls(), 1);
	let attached = h.log.position("transport.attach").unwrap();
	let stop = h.log.position("remote.stopMonitoring").unwrap();
	let terminate = h.log.position("transport.disconnect(terminate)").unwrap();
	assert!(attached < stop);
	assert!(stop < terminate);
	assert_eq!(terminate_count(&h.transport), 1);
}

#[tokio::test]
async fn retried_android_launch_stops_monitoring_again() {
	let h = Mocks::new()
		.remote(|remote| remote.fail_port("Packager is not running"))
		.build();

	h.session.launch(h.launch_args(Platform::Android)).await.unwrap_err();
	h.session.join_cleanup().await;
	assert_eq!(h.remote.stop_calls(), 1);

	h.remote.clear_failures();
	h.session.launch(h.launch_args(Platform::Android)).await.unwrap();
	assert_eq!(h.session.state(), SessionState::Attached);

	h.session.disconnect(DisconnectArgs::default()).await.unwrap();
	h.session.join_cleanup().await;

	assert_eq!(h.remote.stop_calls(), 2);
	assert_eq!(terminate_count(&h.transport), 2);
}

#[tokio::test]
async fn android_disconnect_stops_monitoring_before_terminating() {
	let h = Mocks::new().build();
	h.session.attach(h.attach_args(Platform::Android)).await.unwrap();

	h.session.disconnect(DisconnectArgs::default()).await.unwrap();
	h.session.join_cleanup().await;

	let stop = h.log.position("remote.stopMonitoring").unwrap();
	let terminate = h.log.position("transport.disconnect(terminate)").unwrap();
	assert!(stop < terminate);
	assert!(h.log.contains("transport.disconnect"));
	assert_eq!(h.session.state(), SessionState::Disconnected);
}

#[tokio::test]
async fn android_disconnect_terminates_when_stop_fails() {
	let h = Mocks::new()
		.remote(|remote| remote.fail_stop_monitoring("adb is not running"))
		.build();
	h.session.attach(h.attach_args(Platform::Android)).await.unwrap();

	h.session.disconnect(DisconnectArgs::default()).await.unwrap();
	h.session.join_cleanup().await;

	assert!(h.log.contains("transport.disconnect(terminate)"));
	assert!(h.output.contains("adb is not running"));
}

#[tokio::test]
async fn ios_disconnect_goes_straight_to_transport() {
	let h = Mocks::new().build();
	h.session.attach(h.attach_args(Platform::Ios)).await.unwrap();

	let args = DisconnectArgs {
		terminate_debuggee: Some(false),
		restart: None,
	};
	h.session.disconnect(args.clone()).await.unwrap();
	h.session.join_cleanup().await;

	assert_eq!(h.remote.stop_calls(), 0);
	assert_eq!(h.transport.disconnects(), vec![args]);
}

#[tokio::test]
async fn disconnect_surfaces_transport_failure() {
	let h = Mocks::new().transport(|transport| transport.fail_disconnect("socket closed")).build();
	h.session.attach(h.attach_args(Platform::Ios)).await.unwrap();

	let err = h.session.disconnect(DisconnectArgs::default()).await.unwrap_err();

	assert_eq!(err.to_string(), "socket closed");
	assert_eq!(h.session.state(), SessionState::Disconnected);
}

#[tokio::test]
async fn disconnect_cancels_in_flight_attach() {
	let h = Mocks::new()
		.remote(|remote| remote.with_port_delay(Duration::from_millis(200)))
		.build();
	let session = h.session.clone();
	let args = h.attach_args(Platform::Ios);
	let attach = tokio::spawn(async move { session.attach(args).await });

	tokio::time::sleep(Duration::from_millis(20)).await;
	h.session.disconnect(DisconnectArgs::default()).await.unwrap();

	let result = attach.await.unwrap();
	assert!(matches!(result, Err(Error::Cancelled)));
	assert!(h.transport.attaches().is_empty());
	assert_eq!(h.session.state(), SessionState::Disconnected);

	let err = h.session.attach(h.attach_args(Platform::Ios)).await.unwrap_err();
	assert!(err.is_cancelled());
}

#[tokio::test]
async fn concurrent_attaches_are_serialized() {
	let h = Mocks::new()
		.remote(|remote| remote.with_port_delay(Duration::from_millis(20)))
		.build();

	let (first, second) = tokio::join!(
		h.session.attach(h.attach_args(Platform::Ios)),
		h.session.attach(h.attach_args(Platform::Ios)),
	);
	first.unwrap();
	second.unwrap();

	assert_eq!(h.session.init_count(), 1);
	assert_eq!(
		h.log.entries(),
		vec![
			"versions.get",
			"remote.getPackagerPort",
			"transport.attach",
			"versions.get",
			"remote.getPackagerPort",
			"transport.attach",
		]
	);
}

#[tokio::test]
async fn telemetry_failure_does_not_change_outcome() {
	let h = Mocks::new()
		.versions(|versions| versions.with_versions(RuntimeVersions::new("0.73.0").with_host(HostVersion::Resolved("0.73.4".into()))))
		.telemetry(RecordingTelemetry::failing())
		.build();

	h.session.attach(h.attach_args(Platform::Windows)).await.unwrap();

	let events = h.telemetry.events();
	assert_eq!(events.len(), 1);
	let props = &events[0].properties;
	assert_eq!(props.get("platform"), Some(&json!("windows")));
	assert_eq!(props.get("reactNativeWindowsVersion"), Some(&json!("0.73.4")));
	assert_eq!(props.get("packagerPort"), Some(&json!(8081)));
	assert_eq!(h.session.state(), SessionState::Attached);
}

#[tokio::test]
async fn android_attach_omits_missing_windows_version() {
	let h = Mocks::new()
		.versions(|versions| {
			versions.with_versions(RuntimeVersions::new("0.73.0").with_host(HostVersion::VersionError("not installed".into())))
		})
		.build();

	h.session.attach(h.attach_args(Platform::Android)).await.unwrap();

	let props = &h.telemetry.events()[0].properties;
	assert_eq!(props.get("platform"), Some(&json!("android")));
	assert!(!props.contains_key("reactNativeWindowsVersion"));
	assert!(!props.contains_key("reactNativeWindowsVersionError"));
}

#[tokio::test]
async fn paused_notifications_hide_native_frames() {
	let h = Mocks::new().build();
	let notification = PausedNotification::new(
		"other",
		vec![
			frame("0", "render", "12"),
			frame("1", "(native)", "12"),
			frame("2", "flush", "4294967295"),
			frame("3", "App", "7"),
		],
	);

	h.session.on_paused(notification).await.unwrap();

	let paused = h.transport.paused();
	let ids: Vec<_> = paused[0].call_frames.iter().map(|f| f.call_frame_id.as_str()).collect();
	assert_eq!(ids, vec!["0", "3"]);
	assert_eq!(paused[0].reason, "other");
}
