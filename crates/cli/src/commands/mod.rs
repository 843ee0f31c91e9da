mod frames;
mod port;
mod project;
mod versions;

pub use frames::{FramesData, filter_notification};
pub use port::PortData;
pub use project::{ProjectData, inspect_project};
pub use versions::{VersionsData, resolve_versions};

use crate::cli::{Cli, Commands};
use crate::error::Result;

pub async fn dispatch(cli: Cli) -> Result<()> {
	let format = cli.format;
	match cli.command {
		Commands::Project { cwd } => project::execute(&cwd, format),
		Commands::Versions { cwd, platform } => versions::execute(&cwd, platform, format).await,
		Commands::Port { cwd } => port::execute(&cwd, cli.remote_endpoint, format).await,
		Commands::Frames { input } => frames::execute(input.as_deref(), format),
	}
}
