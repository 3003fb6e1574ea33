//! Backend address selection.
//!
//! The base URL is chosen once, from the scheme the client is served under,
//! and never revisited for the lifetime of the client.

use std::fmt;

use crate::error::ApiError;

/// Backend used when the client runs in a secure context.
pub const PRODUCTION_BASE_URL: &str = "https://heathcare-plus-backend.vercel.app/api";
/// Backend used for local plain-HTTP development.
pub const LOCAL_BASE_URL: &str = "http://localhost:5000/api";

/// Scheme the client itself is served under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scheme {
    Secure,
    Plain,
    Other(String),
}

impl Scheme {
    /// Accepts `https`, `https:`, `http`, `http:` in any case.
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().trim_end_matches(':').to_ascii_lowercase();
        match normalized.as_str() {
            "https" => Scheme::Secure,
            "http" => Scheme::Plain,
            _ => Scheme::Other(normalized),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Secure => write!(f, "https"),
            Scheme::Plain => write!(f, "http"),
            Scheme::Other(s) => write!(f, "{}", s),
        }
    }
}

/// The resolved backend base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendTarget {
    base_url: String,
}

impl BackendTarget {
    /// Picks the backend for `scheme`, unless an explicit URL is configured.
    pub fn select(scheme: &Scheme, override_url: Option<&str>) -> Result<Self, ApiError> {
        if let Some(url) = override_url {
            return Self::from_url(url);
        }

        let base_url = match scheme {
            Scheme::Secure => PRODUCTION_BASE_URL,
            Scheme::Plain => LOCAL_BASE_URL,
            Scheme::Other(other) => return Err(ApiError::UnsupportedScheme(other.clone())),
        };

        Ok(Self {
            base_url: base_url.to_string(),
        })
    }

    /// Uses an explicit base URL, e.g. `https://api.example.com/api`.
    pub fn from_url(raw: &str) -> Result<Self, ApiError> {
        let trimmed = raw.trim().trim_end_matches('/');
        let invalid = || ApiError::InvalidBaseUrl(raw.to_string());

        let (scheme, remainder) = trimmed.split_once("://").ok_or_else(invalid)?;
        if !matches!(scheme, "http" | "https") {
            return Err(invalid());
        }
        if remainder.trim().is_empty() || remainder.starts_with('/') {
            return Err(invalid());
        }

        Ok(Self {
            base_url: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins `path` (leading `/` expected) onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
