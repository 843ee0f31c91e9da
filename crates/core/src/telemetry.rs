//! Best-effort telemetry around session operations.
//!
//! [`Telemetry::generate`] wraps an operation, reports how it ended, and hands
//! back the operation's own result. Reporting failures are logged and dropped.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use rn_debug_protocol::{HostVersion, Platform, RuntimeVersions};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::AdapterConfig;
use crate::error::Result;

pub type Properties = BTreeMap<String, Value>;

#[derive(Debug, Error)]
pub enum TelemetryError {
	#[error("telemetry sink unavailable: {0}")]
	Unavailable(String),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum TelemetryOutcome {
	Succeeded,
	Failed { kind: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryEvent {
	pub name: String,
	pub properties: Properties,
	pub outcome: TelemetryOutcome,
	pub duration_ms: u64,
}

/// Where telemetry events end up. Provided by the host.
pub trait TelemetrySink: Send + Sync {
	fn send(&self, event: &TelemetryEvent) -> std::result::Result<(), TelemetryError>;
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl TelemetrySink for NoopTelemetry {
	fn send(&self, _event: &TelemetryEvent) -> std::result::Result<(), TelemetryError> {
		Ok(())
	}
}

/// Emits events as structured `tracing` records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

impl TelemetrySink for TracingTelemetry {
	fn send(&self, event: &TelemetryEvent) -> std::result::Result<(), TelemetryError> {
		let payload = serde_json::to_string(event)?;
		info!(target = "rn_debug.telemetry", name = %event.name, %payload, "telemetry event");
		Ok(())
	}
}

/// Properties an operation can extend while it runs.
#[derive(Debug, Clone, Default)]
pub struct PropertyBag(Arc<Mutex<Properties>>);

impl PropertyBag {
	pub fn add(&self, key: impl Into<String>, value: impl Into<Value>) {
		self.0.lock().insert(key.into(), value.into());
	}

	fn snapshot(&self) -> Properties {
		self.0.lock().clone()
	}
}

#[derive(Clone)]
pub struct Telemetry {
	sink: Arc<dyn TelemetrySink>,
}

impl Default for Telemetry {
	fn default() -> Self {
		Self::disabled()
	}
}

impl Telemetry {
	pub fn new(sink: Arc<dyn TelemetrySink>) -> Self {
		Self { sink }
	}

	pub fn disabled() -> Self {
		Self::new(Arc::new(NoopTelemetry))
	}

	pub fn from_config(config: &AdapterConfig) -> Self {
		if config.telemetry_enabled {
			Self::new(Arc::new(TracingTelemetry))
		} else {
			Self::disabled()
		}
	}

	/// Runs `op`, reports its outcome under `name`, and returns its result.
	pub async fn generate<T, F, Fut>(&self, name: &str, properties: Properties, op: F) -> Result<T>
	where
		F: FnOnce(PropertyBag) -> Fut,
		Fut: Future<Output = Result<T>>,
	{
		let bag = PropertyBag(Arc::new(Mutex::new(properties)));
		let started = Instant::now();
		let result = op(bag.clone()).await;

		let outcome = match &result {
			Ok(_) => TelemetryOutcome::Succeeded,
			Err(err) => TelemetryOutcome::Failed {
				kind: err.kind().as_str().to_string(),
				message: err.to_string(),
			},
		};
		self.report(&TelemetryEvent {
			name: name.to_string(),
			properties: bag.snapshot(),
			outcome,
			duration_ms: started.elapsed().as_millis() as u64,
		});

		result
	}

	/// Sends a standalone event.
	pub fn report(&self, event: &TelemetryEvent) {
		if let Err(err) = self.sink.send(event) {
			warn!(target = "rn_debug.telemetry", name = %event.name, error = %err, "failed to send telemetry event");
		}
	}
}

/// Properties describing a session for launch/attach events.
///
/// Attach always looks up the host version, so a host lookup failure is only
/// reported for the native-host platforms it belongs to.
pub fn session_properties(platform: Platform, versions: &RuntimeVersions) -> Properties {
	let mut props = Properties::new();
	props.insert("platform".into(), Value::from(platform.as_str()));
	props.insert("isDirect".into(), Value::Bool(true));
	props.insert("reactNativeVersion".into(), Value::from(versions.primary.clone()));

	let host_key = match platform {
		Platform::Macos => "reactNativeMacOSVersion",
		_ => "reactNativeWindowsVersion",
	};
	match &versions.host {
		HostVersion::NotRequested => {}
		HostVersion::Resolved(version) => {
			props.insert(host_key.into(), Value::from(version.clone()));
		}
		HostVersion::VersionError(_) if !platform.is_native_host() => {}
		HostVersion::VersionError(reason) => {
			props.insert(host_key.into(), Value::from("VersionError"));
			props.insert(format!("{host_key}Error"), Value::from(reason.clone()));
		}
	}
	props
}
