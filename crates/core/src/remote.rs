//! Client for the remote extension.
//!
//! The remote extension lives in the IDE's extension host. It performs the
//! platform-specific launch (build, install, start the packager), knows which
//! port the packager listens on, and runs the Android logcat monitor. The bridge
//! only ever talks to it through [`RemoteClient`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jsonrpsee::core::{ClientError, RpcResult};
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::proc_macros::rpc;
use rn_debug_protocol::LaunchArgs;
use tracing::debug;

use crate::config::AdapterConfig;
use crate::error::{Error, Result};

/// Remote extension operations the bridge depends on.
#[async_trait]
pub trait RemoteClient: Send + Sync {
	/// Launches the application with the full launch configuration.
	async fn launch(&self, args: &LaunchArgs) -> Result<()>;

	/// Port of the packager serving the project at `cwd`.
	async fn get_packager_port(&self, cwd: &Path) -> Result<u16>;

	/// Stops the Android logcat monitor started by a launch.
	async fn stop_monitoring(&self) -> Result<()>;
}

/// Creates a [`RemoteClient`] bound to a project root.
pub trait RemoteClientFactory: Send + Sync {
	fn connect(&self, project_root: &Path) -> Result<Arc<dyn RemoteClient>>;
}

#[rpc(client, namespace = "remote")]
pub trait RemoteExtensionRpc {
	#[method(name = "launch")]
	async fn launch(&self, project_root: PathBuf, args: LaunchArgs) -> RpcResult<()>;

	#[method(name = "getPackagerPort")]
	async fn get_packager_port(&self, project_root: PathBuf, cwd: PathBuf) -> RpcResult<u16>;

	#[method(name = "stopMonitoringLogcat")]
	async fn stop_monitoring_logcat(&self, project_root: PathBuf) -> RpcResult<()>;
}

/// JSON-RPC client for the remote extension, bound to one project root.
pub struct RpcRemoteClient {
	client: HttpClient,
	project_root: PathBuf,
}

impl RpcRemoteClient {
	pub fn new(client: HttpClient, project_root: PathBuf) -> Self {
		Self { client, project_root }
	}

	pub fn project_root(&self) -> &Path {
		&self.project_root
	}
}

#[async_trait]
impl RemoteClient for RpcRemoteClient {
	async fn launch(&self, args: &LaunchArgs) -> Result<()> {
		debug!(target = "rn_debug.remote", platform = %args.session.platform, "remote launch");
		RemoteExtensionRpcClient::launch(&self.client, self.project_root.clone(), args.clone())
			.await
			.map_err(|err| call_error("launch", err))
	}

	async fn get_packager_port(&self, cwd: &Path) -> Result<u16> {
		let port = RemoteExtensionRpcClient::get_packager_port(&self.client, self.project_root.clone(), cwd.to_path_buf())
			.await
			.map_err(|err| call_error("getPackagerPort", err))?;
		debug!(target = "rn_debug.remote", port, "packager port resolved");
		Ok(port)
	}

	async fn stop_monitoring(&self) -> Result<()> {
		RemoteExtensionRpcClient::stop_monitoring_logcat(&self.client, self.project_root.clone())
			.await
			.map_err(|err| call_error("stopMonitoringLogcat", err))
	}
}

/// Builds [`RpcRemoteClient`]s against the configured endpoint.
#[derive(Debug, Clone)]
pub struct RpcRemoteClientFactory {
	endpoint: String,
	timeout: Duration,
}

impl RpcRemoteClientFactory {
	pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
		Self {
			endpoint: endpoint.into(),
			timeout,
		}
	}

	pub fn from_config(config: &AdapterConfig) -> Self {
		Self::new(config.remote_endpoint.clone(), config.remote_timeout())
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}
}

impl RemoteClientFactory for RpcRemoteClientFactory {
	fn connect(&self, project_root: &Path) -> Result<Arc<dyn RemoteClient>> {
		let client = HttpClientBuilder::default()
			.request_timeout(self.timeout)
			.build(&self.endpoint)
			.map_err(|err| call_error("connect", err))?;
		debug!(target = "rn_debug.remote", endpoint = %self.endpoint, root = %project_root.display(), "remote client created");
		Ok(Arc::new(RpcRemoteClient::new(client, project_root.to_path_buf())))
	}
}

/// Keeps the remote's own message for call errors so the IDE shows what the
/// remote extension said.
fn call_error(method: &'static str, err: ClientError) -> Error {
	let message = match err {
		ClientError::Call(obj) => obj.message().to_string(),
		other => other.to_string(),
	};
	Error::remote(method, message)
}
