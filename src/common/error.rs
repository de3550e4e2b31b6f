//! Error types for the replay CLI
//!
//! Configuration errors are fatal and end the run with exit code 1.
//! Transport and decode errors are reported per step by the playback
//! engine and only abort the run when a strict policy asks for it.

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the replay CLI
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    #[error("Invalid JSON in '{path}': {error}")]
    JsonParse { path: String, error: String },

    #[error("Invalid settings file: {0}")]
    SettingsParse(String),

    #[error("Workflow '{0}' does not exist in the scenario file")]
    WorkflowNotFound(String),

    #[error("Translation for '{0}' not provided in the client config")]
    TranslationMissing(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // === Transport Errors ===
    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("{url} responded with status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Session reset failed: {0}")]
    SessionReset(String),

    // === Response Errors ===
    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Endpoint returned an empty message")]
    EmptyMessage,

    #[error("Agent request '{operation}' failed: {message}")]
    AgentRequestFailed { operation: String, message: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a file read error for a path
    pub fn file_read(path: &std::path::Path, error: impl ToString) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Create a JSON parse error for a path
    pub fn json_parse(path: &std::path::Path, error: impl ToString) -> Self {
        Self::JsonParse {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Create a transport error from any failure while sending
    pub fn transport(url: &str, reason: impl ToString) -> Self {
        Self::Transport {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an agent request failed error
    pub fn agent_request_failed(operation: &str, message: &str) -> Self {
        Self::AgentRequestFailed {
            operation: operation.to_string(),
            message: message.to_string(),
        }
    }
}
