//! Typed errors for the monitor.
//!
//! One variant per failure class, so the orchestration can match on what
//! went wrong and decide between aborting the run and degrading.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for monitor operations.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Failure classes of a monitor run.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Page or bulletin fetch failed (connection failure or non-2xx status)
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Malformed input: unresolvable link or unreadable PDF
    #[error("parse error: {0}")]
    Parse(String),

    /// Text-generation service failed
    #[error("summary service error: {0}")]
    Service(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Mail submission failed
    #[error("mail transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// State file, history log or PDF slot IO failed
    #[error("filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MonitorError {
    pub fn network(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Network(Box::new(err))
    }

    pub fn service(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Service(Box::new(err))
    }

    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(err))
    }

    pub fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}
