use std::path::{Path, PathBuf};

use rn_debug::project::absolutize;
use rn_debug::{AdapterConfig, Project, RemoteClientFactory, RpcRemoteClientFactory};
use serde::Serialize;

use crate::error::Result;
use crate::output::{OutputFormat, ResultBuilder, print_result};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortData {
	pub root: PathBuf,
	pub endpoint: String,
	pub port: u16,
}

pub(super) async fn execute(cwd: &Path, endpoint: Option<String>, format: OutputFormat) -> Result<()> {
	let mut config = AdapterConfig::from_env()?;
	if let Some(endpoint) = endpoint {
		config.remote_endpoint = endpoint;
	}

	let project = Project::from_cwd(cwd)?;
	let factory = RpcRemoteClientFactory::from_config(&config);
	let remote = factory.connect(project.root())?;

	tracing::debug!(target = "rn_debug_cli", endpoint = %factory.endpoint(), "querying packager port");
	let port = remote.get_packager_port(&absolutize(cwd)).await?;

	let data = PortData {
		root: project.root().to_path_buf(),
		endpoint: factory.endpoint().to_string(),
		port,
	};
	print_result(&ResultBuilder::new("port").data(data).build(), format);
	Ok(())
}
