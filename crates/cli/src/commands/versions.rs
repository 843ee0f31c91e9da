use std::path::{Path, PathBuf};

use rn_debug::{PackageJsonVersionResolver, Project, VersionResolver};
use rn_debug_protocol::{HostVersion, Platform};
use serde::Serialize;

use crate::error::Result;
use crate::output::{OutputFormat, ResultBuilder, print_result};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionsData {
	pub root: PathBuf,
	pub platform: Option<Platform>,
	pub react_native: String,
	pub host: HostVersion,
}

/// Versions as a launch for `platform` would resolve them.
pub async fn resolve_versions(cwd: &Path, platform: Option<Platform>) -> rn_debug::Result<VersionsData> {
	let project = Project::from_cwd(cwd)?;
	let native_host = platform.is_some_and(Platform::is_native_host);
	let versions = PackageJsonVersionResolver.get_versions(project.root(), native_host).await?;
	Ok(VersionsData {
		root: project.root().to_path_buf(),
		platform,
		react_native: versions.primary,
		host: versions.host,
	})
}

pub(super) async fn execute(cwd: &Path, platform: Option<Platform>, format: OutputFormat) -> Result<()> {
	let data = resolve_versions(cwd, platform).await?;

	let mut result = ResultBuilder::new("versions");
	if let HostVersion::VersionError(reason) = &data.host {
		result = result.warning(format!("host version unavailable: {reason}"));
	}
	print_result(&result.data(data).build(), format);
	Ok(())
}

#[cfg(test)]
mod tests {
	use std::fs;

	use tempfile::TempDir;

	use super::*;

	fn project(manifest: &str) -> TempDir {
		let temp = TempDir::new().unwrap();
		fs::write(temp.path().join("package.json"), manifest).unwrap();
		temp
	}

	#[tokio::test]
	async fn mobile_platforms_skip_host_lookup() {
		let temp = project(r#"{"dependencies":{"react-native":"0.73.2"}}"#);

		let data = resolve_versions(temp.path(), Some(Platform::Android)).await.unwrap();

		assert_eq!(data.react_native, "0.73.2");
		assert_eq!(data.host, HostVersion::NotRequested);
	}

	#[tokio::test]
	async fn desktop_platform_reports_missing_host() {
		let temp = project(r#"{"dependencies":{"react-native":"0.73.2"}}"#);

		let data = resolve_versions(temp.path(), Some(Platform::Windows)).await.unwrap();

		assert!(matches!(data.host, HostVersion::VersionError(_)));
	}

	#[tokio::test]
	async fn installed_host_package_wins() {
		let temp = project(r#"{"dependencies":{"react-native":"0.73.2","react-native-windows":"^0.73.0"}}"#);
		let installed = temp.path().join("node_modules/react-native-windows");
		fs::create_dir_all(&installed).unwrap();
		fs::write(installed.join("package.json"), r#"{"version":"0.73.9"}"#).unwrap();

		let data = resolve_versions(temp.path(), Some(Platform::Windows)).await.unwrap();

		assert_eq!(data.host, HostVersion::Resolved("0.73.9".into()));
	}
}
