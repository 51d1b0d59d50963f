//! Error types for the OpenAI client.

use thiserror::Error;

/// Result type for OpenAI client operations.
pub type Result<T> = std::result::Result<T, OpenAIError>;

/// Errors returned by the OpenAI client.
#[derive(Debug, Error)]
pub enum OpenAIError {
    /// Configuration error (missing API key)
    #[error("configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// API error (non-2xx response)
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Parse error (unexpected response shape)
    #[error("parse error: {0}")]
    Parse(String),
}
