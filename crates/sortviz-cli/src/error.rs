use std::path::PathBuf;

use sortviz_core::InputError;
use sortviz_runtime::ConfigError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

/// Exit code for usage and input errors.
pub const EXIT_USAGE: i32 = 2;
/// Exit code after SIGINT/SIGTERM cancelled playback.
pub const EXIT_INTERRUPTED: i32 = 130;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    #[error("config error in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("verification failed: {failed} of {total} cases")]
    VerificationFailed { failed: usize, total: usize },

    #[error("playback interrupted")]
    Interrupted,
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Input(_) | Self::InvalidArgument { .. } => EXIT_USAGE,
            Self::Interrupted => EXIT_INTERRUPTED,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
