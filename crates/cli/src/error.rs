use std::path::PathBuf;

use thiserror::Error;

use crate::output::{CommandError, ErrorCode};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error("invalid input: {0}")]
	InvalidInput(String),

	#[error("failed to read {path}")]
	ReadFile {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid JSON in {path}: {source}")]
	ConfigParse {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Page(#[from] webpage::Error),
}

impl CliError {
	/// Structured form for the output envelope.
	pub fn to_command_error(&self) -> CommandError {
		let code = match self {
			CliError::InvalidInput(_) | CliError::ConfigParse { .. } => ErrorCode::InvalidInput,
			CliError::ReadFile { .. } | CliError::Io(_) => ErrorCode::IoError,
			CliError::Json(_) => ErrorCode::InternalError,
			CliError::Page(err) => page_error_code(err),
		};
		CommandError {
			code,
			message: self.to_string(),
		}
	}
}

fn page_error_code(err: &webpage::Error) -> ErrorCode {
	match err {
		webpage::Error::InvalidUsage(_) | webpage::Error::TargetClosed(_) => ErrorCode::NavigationFailed,
		webpage::Error::InvalidArgument(_) | webpage::Error::InvalidUrl { .. } => ErrorCode::InvalidInput,
		webpage::Error::Timeout(_) => ErrorCode::Timeout,
		webpage::Error::Io(_) => ErrorCode::IoError,
		_ => ErrorCode::InternalError,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn page_errors_map_to_codes() {
		let usage = CliError::from(webpage::Error::InvalidUsage("too many".into()));
		assert_eq!(usage.to_command_error().code, ErrorCode::NavigationFailed);

		let url = CliError::from(webpage::Error::InvalidUrl {
			url: "x".into(),
			reason: "relative URL without a base".into(),
		});
		assert_eq!(url.to_command_error().code, ErrorCode::InvalidInput);

		let timeout = CliError::from(webpage::Error::Timeout("load".into()));
		assert_eq!(timeout.to_command_error().code, ErrorCode::Timeout);
	}

	#[test]
	fn message_is_display() {
		let err = CliError::InvalidInput("bad method".into());
		assert_eq!(err.to_command_error().message, "invalid input: bad method");
	}
}
