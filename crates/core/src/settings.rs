//! One-shot session setup.
//!
//! The first launch or attach of a session configures logging, validates the
//! project and binds the remote client. Later requests reuse the result.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rn_debug_protocol::{SessionArgs, TraceLevel};
use tracing::{info, warn};

use crate::error::Result;
use crate::logging;
use crate::project::Project;
use crate::remote::{RemoteClient, RemoteClientFactory};

/// What the gate produced on its first successful run.
#[derive(Clone)]
pub struct Settings {
	project_root: PathBuf,
	remote: Arc<dyn RemoteClient>,
	trace_level: TraceLevel,
}

impl Settings {
	pub fn project_root(&self) -> &Path {
		&self.project_root
	}

	pub fn remote(&self) -> &Arc<dyn RemoteClient> {
		&self.remote
	}

	pub fn trace_level(&self) -> TraceLevel {
		self.trace_level
	}
}

impl std::fmt::Debug for Settings {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Settings")
			.field("project_root", &self.project_root)
			.field("trace_level", &self.trace_level)
			.finish_non_exhaustive()
	}
}

enum GateState {
	Uninitialized,
	Ready(Settings),
}

pub struct SettingsGate {
	state: GateState,
	factory: Arc<dyn RemoteClientFactory>,
	log_file: Option<PathBuf>,
	install_logging: bool,
	init_count: usize,
}

impl SettingsGate {
	pub fn new(factory: Arc<dyn RemoteClientFactory>) -> Self {
		Self {
			state: GateState::Uninitialized,
			factory,
			log_file: None,
			install_logging: false,
			init_count: 0,
		}
	}

	/// Installs the global log subscriber on first initialization, writing to
	/// `log_file` when set.
	pub fn with_logging(mut self, log_file: Option<PathBuf>) -> Self {
		self.install_logging = true;
		self.log_file = log_file;
		self
	}

	/// Runs the setup once; later calls return the stored settings.
	///
	/// On failure the gate stays uninitialized and the next request tries again.
	pub fn ensure_initialized(&mut self, args: &mut SessionArgs) -> Result<Settings> {
		if let GateState::Ready(settings) = &self.state {
			return Ok(settings.clone());
		}

		self.init_count += 1;

		let trace_level = args.trace_level();
		if self.install_logging {
			if let Err(err) = logging::init_logging(trace_level, self.log_file.as_deref()) {
				warn!(target = "rn_debug.settings", error = %err, "could not set up log file; logging to stderr");
			}
		}

		if args.source_maps.is_none() {
			args.source_maps = Some(true);
		}

		let project = Project::from_cwd(&args.cwd)?;
		let remote = self.factory.connect(project.root())?;

		info!(
			target = "rn_debug.settings",
			root = %project.root().display(),
			trace = %trace_level,
			"session settings initialized"
		);

		let settings = Settings {
			project_root: project.root().to_path_buf(),
			remote,
			trace_level,
		};
		self.state = GateState::Ready(settings.clone());
		Ok(settings)
	}

	pub fn settings(&self) -> Option<&Settings> {
		match &self.state {
			GateState::Ready(settings) => Some(settings),
			GateState::Uninitialized => None,
		}
	}

	pub fn is_initialized(&self) -> bool {
		self.settings().is_some()
	}

	/// How many times the setup body has run.
	pub fn init_count(&self) -> usize {
		self.init_count
	}
}

#[cfg(test)]
mod tests {
	use std::fs;

	use rn_debug_protocol::Platform;
	use tempfile::TempDir;

	use super::*;
	use crate::error::Error;
	use crate::testing::MockRemoteFactory;

	fn rn_project() -> TempDir {
		let temp = TempDir::new().unwrap();
		fs::write(temp.path().join("package.json"), r#"{"dependencies":{"react-native":"0.73.0"}}"#).unwrap();
		temp
	}

	#[test]
	fn body_runs_once_across_calls() {
		let temp = rn_project();
		let factory = Arc::new(MockRemoteFactory::default());
		let mut gate = SettingsGate::new(factory.clone());

		let mut args = SessionArgs::new(Platform::Ios, temp.path());
		gate.ensure_initialized(&mut args).unwrap();
		let mut again = SessionArgs::new(Platform::Ios, temp.path());
		gate.ensure_initialized(&mut again).unwrap();

		assert_eq!(gate.init_count(), 1);
		assert_eq!(factory.connect_count(), 1);
		assert_eq!(gate.settings().unwrap().project_root(), temp.path());
	}

	#[test]
	fn source_maps_default_to_enabled() {
		let temp = rn_project();
		let mut gate = SettingsGate::new(Arc::new(MockRemoteFactory::default()));

		let mut args = SessionArgs::new(Platform::Android, temp.path());
		gate.ensure_initialized(&mut args).unwrap();
		assert_eq!(args.source_maps, Some(true));

		let temp = rn_project();
		let mut gate = SettingsGate::new(Arc::new(MockRemoteFactory::default()));
		let mut args = SessionArgs::new(Platform::Android, temp.path());
		args.source_maps = Some(false);
		gate.ensure_initialized(&mut args).unwrap();
		assert_eq!(args.source_maps, Some(false));
	}

	#[test]
	fn trace_level_comes_from_args() {
		let temp = rn_project();
		let mut gate = SettingsGate::new(Arc::new(MockRemoteFactory::default()));
		let mut args = SessionArgs::new(Platform::Ios, temp.path()).with_trace("verbose");
		let settings = gate.ensure_initialized(&mut args).unwrap();
		assert_eq!(settings.trace_level(), TraceLevel::Verbose);
	}

	#[test]
	fn invalid_project_leaves_gate_uninitialized_for_retry() {
		let temp = TempDir::new().unwrap();
		let factory = Arc::new(MockRemoteFactory::default());
		let mut gate = SettingsGate::new(factory.clone());

		let mut args = SessionArgs::new(Platform::Ios, temp.path());
		let err = gate.ensure_initialized(&mut args).unwrap_err();
		assert!(matches!(err, Error::NotInProjectFolder { .. }));
		assert!(!gate.is_initialized());
		assert_eq!(factory.connect_count(), 0);

		fs::write(temp.path().join("package.json"), r#"{"dependencies":{"react-native":"0.73.0"}}"#).unwrap();
		gate.ensure_initialized(&mut args).unwrap();
		assert!(gate.is_initialized());
		assert_eq!(gate.init_count(), 2);
	}
}
