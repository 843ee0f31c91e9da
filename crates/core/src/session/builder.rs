use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use super::{Session, SessionState};
use crate::cleanup::CleanupHandler;
use crate::config::AdapterConfig;
use crate::remote::{RemoteClientFactory, RpcRemoteClientFactory};
use crate::settings::SettingsGate;
use crate::telemetry::Telemetry;
use crate::transport::{OutputChannel, TracingOutput, Transport};
use crate::versions::{PackageJsonVersionResolver, VersionResolver};

/// Assembles a [`Session`] around its transport.
///
/// Unset collaborators fall back to the production implementations: the
/// JSON-RPC remote client at the default endpoint, `package.json` version
/// lookup, `tracing` output and disabled telemetry.
pub struct SessionBuilder {
	transport: Arc<dyn Transport>,
	output: Option<Arc<dyn OutputChannel>>,
	remote_factory: Option<Arc<dyn RemoteClientFactory>>,
	versions: Option<Arc<dyn VersionResolver>>,
	telemetry: Option<Telemetry>,
	logging: Option<Option<PathBuf>>,
}

impl SessionBuilder {
	pub fn new(transport: Arc<dyn Transport>) -> Self {
		Self {
			transport,
			output: None,
			remote_factory: None,
			versions: None,
			telemetry: None,
			logging: None,
		}
	}

	/// Applies host configuration: remote endpoint, telemetry and log file.
	pub fn config(mut self, config: &AdapterConfig) -> Self {
		self.remote_factory = Some(Arc::new(RpcRemoteClientFactory::from_config(config)));
		self.telemetry = Some(Telemetry::from_config(config));
		self.logging = Some(config.log_file());
		self
	}

	pub fn output(mut self, output: Arc<dyn OutputChannel>) -> Self {
		self.output = Some(output);
		self
	}

	pub fn remote_factory(mut self, factory: Arc<dyn RemoteClientFactory>) -> Self {
		self.remote_factory = Some(factory);
		self
	}

	pub fn versions(mut self, versions: Arc<dyn VersionResolver>) -> Self {
		self.versions = Some(versions);
		self
	}

	pub fn telemetry(mut self, telemetry: Telemetry) -> Self {
		self.telemetry = Some(telemetry);
		self
	}

	pub fn build(self) -> Session {
		let factory = self
			.remote_factory
			.unwrap_or_else(|| Arc::new(RpcRemoteClientFactory::from_config(&AdapterConfig::default())));
		let mut gate = SettingsGate::new(factory);
		if let Some(log_file) = self.logging {
			gate = gate.with_logging(log_file);
		}

		Session {
			state: Mutex::new(SessionState::Uninitialized),
			gate: Mutex::new(gate),
			previous_attach_args: Mutex::new(None),
			flow: tokio::sync::Mutex::new(()),
			cancel: CancellationToken::new(),
			cleanup: CleanupHandler::new(),
			transport: self.transport,
			output: self.output.unwrap_or_else(|| Arc::new(TracingOutput)),
			versions: self.versions.unwrap_or_else(|| Arc::new(PackageJsonVersionResolver)),
			telemetry: self.telemetry.unwrap_or_default(),
		}
	}
}
