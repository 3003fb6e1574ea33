//! Error types shared across the core library.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the HTTP client pipeline and its call groups.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend rejected the credential (HTTP 401).
    ///
    /// Never handled locally: the shell turns it into a forced logout.
    #[error("{}", .message.as_deref().unwrap_or("Session expired"))]
    Unauthorized { message: Option<String> },

    /// Any other non-2xx response.
    #[error("Server returned status {status}{}", .message.as_ref().map(|m| format!(": {}", m)).unwrap_or_default())]
    Status { status: u16, message: Option<String> },

    /// The request never produced a response (unreachable, timed out, ...).
    #[error("Request failed: {0}")]
    Transport(String),

    /// A 2xx response whose body could not be decoded.
    #[error("Malformed response: {0}")]
    Decode(String),

    /// No backend address is known for the scheme in use.
    #[error("No backend configured for scheme '{0}'. Set api.url in config.")]
    UnsupportedScheme(String),

    /// An explicit backend URL was rejected.
    #[error("Invalid backend URL '{0}': must use http:// or https:// and include a host")]
    InvalidBaseUrl(String),

    /// Building a request part failed before anything was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Returns true when the backend signalled an authentication failure.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Message supplied by the backend, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { message } | ApiError::Status { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    /// The backend's message, or `fallback` when it supplied none.
    pub fn message_or(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

/// Errors from durable key-value storage.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error for {0}: {1}")]
    Io(PathBuf, #[source] io::Error),

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("Failed to serialize session: {0}")]
    Serialize(String),
}
