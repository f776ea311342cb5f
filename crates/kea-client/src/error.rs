//! KEA client errors

use thiserror::Error;

/// Errors that can occur when talking to the KEA Control Agent
#[derive(Debug, Error)]
pub enum KeaError {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Control Agent answered with a non-success HTTP status
    #[error("Control Agent error: {0}")]
    Api(String),

    /// Control Agent rejected the configured credentials
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Response did not have the shape of a KEA command response
    #[error("Invalid response from KEA: {0}")]
    InvalidResponse(String),

    /// Command is not available (hook library not loaded)
    #[error("Command '{command}' not supported: {text}")]
    Unsupported { command: String, text: String },

    /// KEA refused the change because it conflicts with existing state
    #[error("Command '{command}' conflicted with existing state: {text}")]
    Conflict { command: String, text: String },

    /// KEA processed the command and reported a failure
    #[error("KEA command '{command}' failed with code {code}: {text}")]
    CommandFailed {
        command: String,
        code: i64,
        text: String,
    },
}

impl KeaError {
    /// True when the error means the command itself is unavailable
    pub fn is_unsupported(&self) -> bool {
        matches!(self, KeaError::Unsupported { .. })
    }

    /// True when the Control Agent could not be reached or refused the request
    /// before KEA evaluated the command
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            KeaError::Http(_) | KeaError::Api(_) | KeaError::Authentication(_)
        )
    }
}
