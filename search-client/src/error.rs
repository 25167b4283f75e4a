//! Error types for search-client

use std::time::Duration;
use thiserror::Error;

/// Result type alias for setup operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors raised while setting the client up (never by a query itself)
#[derive(Error, Debug)]
pub enum ClientError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client construction error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<::config::ConfigError> for ClientError {
    fn from(err: ::config::ConfigError) -> Self {
        ClientError::Config(err.to_string())
    }
}

/// Why a single query attempt failed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// Connection, reset, DNS or body read failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// No complete response before the deadline
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Backend answered with a non-success status
    #[error("Server returned HTTP {status}")]
    Server { status: u16 },

    /// Response body failed validation
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Payload-free tag of a [`QueryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Timeout,
    Server(u16),
    MalformedResponse,
}

impl QueryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::Transport(_) => ErrorKind::Transport,
            QueryError::Timeout(_) => ErrorKind::Timeout,
            QueryError::Server { status } => ErrorKind::Server(*status),
            QueryError::MalformedResponse(_) => ErrorKind::MalformedResponse,
        }
    }
}
