//! Application-level errors for the CLI boundary.

use crate::client::ClientError;
use thiserror::Error;
use ward_core::WardError;

/// Everything a CLI command can fail with.
///
/// Lifecycle errors display exactly as the controller produced them, so a
/// server `detail` reaches the user unchanged.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error(transparent)]
    Lifecycle(#[from] WardError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
