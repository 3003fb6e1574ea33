//! HTTP client pipeline for the Health Plus backend.
//!
//! Every backend call goes through [`ApiClient`], which applies two policies
//! uniformly:
//!
//! - **Request**: when a session exists, its token is attached as a bearer
//!   credential. Nothing else about the request is changed.
//! - **Response**: a 401 becomes [`ApiError::Unauthorized`] no matter which
//!   endpoint produced it. Reacting to it (clearing the session, sending the
//!   user back to login) is the shell's job, not the transport's.
//!
//! Calls are fire-once: no retries, no queueing, no caching.
//!
//! # Usage
//!
//! ```ignore
//! let session = Arc::new(SessionStore::new(FileStorage::new(data_dir)));
//! let target = BackendTarget::select(&Scheme::Secure, None)?;
//! let api = ApiClient::new(target, session, ClientOptions::default())?;
//! let dashboard = api.dashboard().get().await?;
//! ```

mod ai;
mod auth;
mod dashboard;
mod family_members;
pub mod target;
#[cfg(test)]
pub(crate) mod test_server;

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::session::SessionStore;

pub use ai::AiApi;
pub use auth::AuthApi;
pub use dashboard::DashboardApi;
pub use family_members::FamilyMemberApi;
pub use target::{BackendTarget, Scheme};

/// Transport settings for [`ApiClient`].
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Upper bound for a whole request. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

/// Single gateway for backend calls.
#[derive(Clone, Debug)]
pub struct ApiClient {
    target: BackendTarget,
    session: Arc<SessionStore>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(
        target: BackendTarget,
        session: Arc<SessionStore>,
        options: ClientOptions,
    ) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            target,
            session,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        self.target.base_url()
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn dashboard(&self) -> DashboardApi<'_> {
        DashboardApi::new(self)
    }

    pub fn family_members(&self) -> FamilyMemberApi<'_> {
        FamilyMemberApi::new(self)
    }

    pub fn ai(&self) -> AiApi<'_> {
        AiApi::new(self)
    }

    /// Starts a request to `path`, with the session token attached if any.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.target.url(path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends a request and decodes a JSON body, classifying failures.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let request = builder
            .build()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        tracing::debug!(%method, %path, "Sending request");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        tracing::debug!(%method, %path, status = status.as_u16(), "Received response");

        if status == StatusCode::UNAUTHORIZED {
            let message = error_message(response).await;
            tracing::warn!(%method, %path, "Backend rejected credentials");
            return Err(ApiError::Unauthorized { message });
        }

        if !status.is_success() {
            let message = error_message(response).await;
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Pulls `message` out of a JSON error body, if there is one.
async fn error_message(response: reqwest::Response) -> Option<String> {
    let body = response.text().await.ok()?;
    parse_error_message(&body)
}

fn parse_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
}
