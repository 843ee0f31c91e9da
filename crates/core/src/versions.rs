//! React Native version resolution for telemetry.

use std::path::Path;

use async_trait::async_trait;
use rn_debug_protocol::{HostVersion, Platform, RuntimeVersions};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::project::{PACKAGE_JSON, PackageManifest, REACT_NATIVE_PACKAGE};

/// Resolves the runtime versions of a project.
#[async_trait]
pub trait VersionResolver: Send + Sync {
	/// Versions for the project at `project_root`. With `native_host`, also looks up
	/// the desktop-native host package.
	///
	/// Failing to find the host version is reported as [`HostVersion::VersionError`],
	/// not as an error.
	async fn get_versions(&self, project_root: &Path, native_host: bool) -> Result<RuntimeVersions>;
}

/// Reads versions from installed packages, falling back to declared ranges.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageJsonVersionResolver;

#[derive(Deserialize)]
struct InstalledPackage {
	version: String,
}

#[async_trait]
impl VersionResolver for PackageJsonVersionResolver {
	async fn get_versions(&self, project_root: &Path, native_host: bool) -> Result<RuntimeVersions> {
		let manifest = match tokio::fs::read_to_string(project_root.join(PACKAGE_JSON)).await {
			Ok(content) => serde_json::from_str::<PackageManifest>(&content).ok(),
			Err(_) => None,
		};

		let primary = package_version(project_root, manifest.as_ref(), REACT_NATIVE_PACKAGE)
			.await
			.ok_or_else(|| Error::VersionResolution {
				path: project_root.to_path_buf(),
				reason: format!("{REACT_NATIVE_PACKAGE} is neither installed nor declared"),
			})?;

		let host = if native_host {
			host_version(project_root, manifest.as_ref()).await
		} else {
			HostVersion::NotRequested
		};

		debug!(target = "rn_debug.versions", %primary, ?host, "resolved versions");
		Ok(RuntimeVersions { primary, host })
	}
}

async fn host_version(project_root: &Path, manifest: Option<&PackageManifest>) -> HostVersion {
	let hosts = Platform::ALL.into_iter().filter_map(Platform::host_package);
	let mut tried = Vec::new();
	for package in hosts {
		if let Some(version) = package_version(project_root, manifest, package).await {
			return HostVersion::Resolved(version);
		}
		tried.push(package);
	}
	HostVersion::VersionError(format!("none of {} is installed or declared", tried.join(", ")))
}

async fn package_version(project_root: &Path, manifest: Option<&PackageManifest>, package: &str) -> Option<String> {
	let installed = project_root.join("node_modules").join(package).join(PACKAGE_JSON);
	if let Ok(content) = tokio::fs::read_to_string(&installed).await {
		if let Ok(pkg) = serde_json::from_str::<InstalledPackage>(&content) {
			return Some(pkg.version);
		}
	}
	manifest.and_then(|m| m.dependency(package)).and_then(normalize_range)
}

/// Strips range operators from a declared dependency (`^0.73.4` → `0.73.4`).
///
/// Returns `None` for specs that are not versions, such as git URLs or tags.
pub fn normalize_range(range: &str) -> Option<String> {
	let trimmed = range.trim().trim_start_matches(['^', '~', '=', '>', '<', 'v', ' ']);
	let version = trimmed.split_whitespace().next()?;
	if version.chars().next()?.is_ascii_digit() {
		Some(version.to_string())
	} else {
		None
	}
}
