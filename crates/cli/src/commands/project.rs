use std::path::{Path, PathBuf};

use colored::Colorize;
use rn_debug::project::{REACT_NATIVE_PACKAGE, absolutize, find_project_root, resolve_project_root};
use rn_debug::{Error, Project};
use serde::Serialize;

use crate::error::Result;
use crate::output::{OutputFormat, ResultBuilder, print_result};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectData {
	pub root: PathBuf,
	pub name: Option<String>,
	/// Declared `react-native` range
	pub react_native: Option<String>,
	/// Whether workspace settings moved the root away from cwd
	pub root_overridden: bool,
}

pub fn inspect_project(cwd: &Path) -> rn_debug::Result<ProjectData> {
	let project = Project::from_cwd(cwd)?;
	Ok(ProjectData {
		root: project.root().to_path_buf(),
		name: project.name().map(str::to_string),
		react_native: project.manifest().dependency(REACT_NATIVE_PACKAGE).map(str::to_string),
		root_overridden: resolve_project_root(cwd) != absolutize(cwd),
	})
}

pub(super) fn execute(cwd: &Path, format: OutputFormat) -> Result<()> {
	let data = match inspect_project(cwd) {
		Ok(data) => data,
		Err(err @ Error::NotInProjectFolder { .. }) => {
			if let Some(parent) = absolutize(cwd).parent().and_then(find_project_root) {
				eprintln!("{}: nearest React Native project is {}", "hint".cyan().bold(), parent.display());
			}
			return Err(err.into());
		}
		Err(err) => return Err(err.into()),
	};

	tracing::info!(target = "rn_debug_cli", root = %data.root.display(), "project resolved");
	print_result(&ResultBuilder::new("project").data(data).build(), format);
	Ok(())
}
