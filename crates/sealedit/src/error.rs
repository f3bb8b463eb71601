//! Error taxonomy for seal/unseal operations
//!
//! Every failure surfaces to the user exactly once, through the host's
//! error dialog. Nothing is retried and nothing is logged persistently.

use thiserror::Error;

/// Errors raised by the encrypt/decrypt workflows
#[derive(Error, Debug)]
pub enum SealError {
    /// Missing or invalid settings (cert path, private key path)
    #[error("{0}")]
    Configuration(String),

    /// Bad user input (no selection, empty prompt entry)
    #[error("{0}")]
    Input(String),

    /// The external tool exited non-zero; message is its stderr verbatim
    #[error("{stderr}")]
    Tool { stderr: String },

    /// Anything else (spawn failure, I/O on the child's pipes)
    #[error("{0}")]
    Unexpected(String),
}

impl From<std::io::Error> for SealError {
    fn from(err: std::io::Error) -> Self {
        SealError::Unexpected(err.to_string())
    }
}
