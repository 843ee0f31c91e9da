//! React Native project detection.
//!
//! Resolves the project root a debug configuration points at and checks that it
//! is a React Native project before anything talks to the remote extension.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};

pub const PACKAGE_JSON: &str = "package.json";
pub const REACT_NATIVE_PACKAGE: &str = "react-native";

/// Workspace settings file that may relocate the project root.
pub const WORKSPACE_SETTINGS: &str = ".vscode/settings.json";
/// Settings key holding a project root relative to the workspace folder.
pub const PROJECT_ROOT_SETTING: &str = "react-native-tools.projectRoot";

/// The parts of `package.json` the bridge reads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub version: Option<String>,
	#[serde(default)]
	pub dependencies: Map<String, Value>,
	#[serde(default)]
	pub dev_dependencies: Map<String, Value>,
	#[serde(default)]
	pub peer_dependencies: Map<String, Value>,
}

impl PackageManifest {
	pub fn load(path: &Path) -> Result<Self> {
		let content = fs::read_to_string(path)?;
		Ok(serde_json::from_str(&content)?)
	}

	/// Declared version range of `package` in any dependency table.
	pub fn dependency(&self, package: &str) -> Option<&str> {
		[&self.dependencies, &self.dev_dependencies, &self.peer_dependencies]
			.into_iter()
			.find_map(|deps| deps.get(package))
			.and_then(Value::as_str)
	}
}

/// A validated React Native project.
#[derive(Debug, Clone)]
pub struct Project {
	root: PathBuf,
	manifest: PackageManifest,
}

impl Project {
	/// Validates `root` as a React Native project.
	pub fn open(root: &Path) -> Result<Self> {
		let manifest_path = root.join(PACKAGE_JSON);
		let manifest = match PackageManifest::load(&manifest_path) {
			Ok(manifest) => manifest,
			Err(err) => {
				debug!(target = "rn_debug.project", path = %manifest_path.display(), error = %err, "no readable package.json");
				return Err(Error::NotInProjectFolder { path: root.to_path_buf() });
			}
		};

		if manifest.dependency(REACT_NATIVE_PACKAGE).is_none() {
			debug!(target = "rn_debug.project", root = %root.display(), "package.json has no react-native dependency");
			return Err(Error::NotInProjectFolder { path: root.to_path_buf() });
		}

		Ok(Self {
			root: root.to_path_buf(),
			manifest,
		})
	}

	/// Resolves the project root for `cwd` and validates it.
	pub fn from_cwd(cwd: &Path) -> Result<Self> {
		Self::open(&resolve_project_root(cwd))
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn manifest(&self) -> &PackageManifest {
		&self.manifest
	}

	pub fn name(&self) -> Option<&str> {
		self.manifest.name.as_deref()
	}
}

/// Project root for a debug configuration's `cwd`.
///
/// `cwd` itself unless the workspace settings relocate the project via
/// [`PROJECT_ROOT_SETTING`].
pub fn resolve_project_root(cwd: &Path) -> PathBuf {
	let cwd = absolutize(cwd);
	match project_root_override(&cwd) {
		Some(relative) => {
			let root = cwd.join(relative);
			debug!(target = "rn_debug.project", root = %root.display(), "project root overridden by workspace settings");
			root
		}
		None => cwd,
	}
}

/// Searches upward from `start` for a React Native project root.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
	let start = absolutize(start);
	let mut current = start.as_path();
	loop {
		debug!(target = "rn_debug.project", path = %current.display(), "checking for react-native package.json");
		if is_react_native_project(current) {
			return Some(current.to_path_buf());
		}
		match current.parent() {
			Some(parent) if parent != current => current = parent,
			_ => return None,
		}
	}
}

pub fn is_react_native_project(root: &Path) -> bool {
	PackageManifest::load(&root.join(PACKAGE_JSON))
		.map(|manifest| manifest.dependency(REACT_NATIVE_PACKAGE).is_some())
		.unwrap_or(false)
}

fn project_root_override(cwd: &Path) -> Option<String> {
	let path = cwd.join(WORKSPACE_SETTINGS);
	let content = fs::read_to_string(&path).ok()?;
	let settings: Value = match serde_json::from_str(&content) {
		Ok(settings) => settings,
		Err(err) => {
			debug!(target = "rn_debug.project", path = %path.display(), error = %err, "ignoring unparsable workspace settings");
			return None;
		}
	};
	settings
		.get(PROJECT_ROOT_SETTING)
		.and_then(Value::as_str)
		.filter(|s| !s.trim().is_empty())
		.map(str::to_string)
}

/// `path` joined onto the current directory when relative.
pub fn absolutize(path: &Path) -> PathBuf {
	if path.is_absolute() {
		return path.to_path_buf();
	}
	std::env::current_dir().map(|cwd| cwd.join(path)).unwrap_or_else(|_| path.to_path_buf())
}
