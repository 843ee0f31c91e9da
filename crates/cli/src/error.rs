use rn_debug::ErrorKind;
use thiserror::Error;

use crate::output::{CommandError, ErrorCode};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error(transparent)]
	Debug(#[from] rn_debug::Error),

	#[error("invalid input: {0}")]
	InvalidInput(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Anyhow(#[from] anyhow::Error),
}

impl CliError {
	pub fn to_command_error(&self) -> CommandError {
		let code = match self {
			CliError::Debug(err) => match err.kind() {
				ErrorKind::Configuration if matches!(err, rn_debug::Error::NotInProjectFolder { .. }) => ErrorCode::NotInProjectFolder,
				ErrorKind::Configuration => ErrorCode::InvalidInput,
				ErrorKind::VersionResolution => ErrorCode::VersionResolution,
				ErrorKind::RemoteCall => ErrorCode::RemoteCall,
				ErrorKind::Transport | ErrorKind::Cancelled | ErrorKind::Internal => ErrorCode::InternalError,
			},
			CliError::InvalidInput(_) => ErrorCode::InvalidInput,
			CliError::Io(_) => ErrorCode::IoError,
			CliError::Anyhow(_) => ErrorCode::InternalError,
		};
		CommandError {
			code,
			message: format!("{self:#}"),
		}
	}
}
