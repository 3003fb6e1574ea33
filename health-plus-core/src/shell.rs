//! Application shell: route guarding and session lifecycle.
//!
//! The shell is the only place that reacts to [`ApiError::Unauthorized`].
//! Whatever call produced it, the session is cleared and the navigator is
//! sent to the login route, once per rejected response.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::api::ApiClient;
use crate::error::{ApiError, StorageError};
use crate::models::UserIdentity;
use crate::session::SessionStore;

/// Client-side locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Root,
    Login,
    Signup,
    Dashboard,
    FamilyMember(String),
    NotFound(String),
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let trimmed = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Root,
            ["login"] => Route::Login,
            ["signup"] => Route::Signup,
            ["dashboard"] => Route::Dashboard,
            ["family-member", id] => Route::FamilyMember((*id).to_string()),
            _ => Route::NotFound(trimmed.to_string()),
        }
    }

    /// Routes that require a session.
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Dashboard | Route::FamilyMember(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Root => write!(f, "/"),
            Route::Login => write!(f, "/login"),
            Route::Signup => write!(f, "/signup"),
            Route::Dashboard => write!(f, "/dashboard"),
            Route::FamilyMember(id) => write!(f, "/family-member/{}", id),
            Route::NotFound(path) => write!(f, "{}", path),
        }
    }
}

/// Performs client-side navigation.
pub trait Navigator {
    fn navigate(&self, route: &Route);
}

/// Top-level coordinator owning the session, the API client and navigation.
pub struct Shell<N: Navigator> {
    session: Arc<SessionStore>,
    api: ApiClient,
    navigator: N,
}

impl<N: Navigator> Shell<N> {
    /// Builds a shell around a client; the session is the client's own.
    pub fn new(api: ApiClient, navigator: N) -> Self {
        Self {
            session: api.session().clone(),
            api,
            navigator,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Where a request for `route` actually lands.
    pub fn guard(&self, route: &Route) -> Route {
        let authenticated = self.session.is_authenticated();
        match route {
            Route::Root | Route::NotFound(_) if authenticated => Route::Dashboard,
            Route::Root | Route::NotFound(_) => Route::Login,
            protected if protected.is_protected() && !authenticated => Route::Login,
            other => other.clone(),
        }
    }

    /// Applies the global unauthorized policy to a finished call.
    pub fn settle<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(err) = &result {
            if err.is_unauthorized() {
                tracing::warn!("Backend rejected the session; logging out");
                self.force_logout();
            }
        }
        result
    }

    /// Issues a call through the pipeline and settles it.
    pub async fn run<'a, T, F, Fut>(&'a self, call: F) -> Result<T, ApiError>
    where
        F: FnOnce(&'a ApiClient) -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + 'a,
    {
        let result = call(&self.api).await;
        self.settle(result)
    }

    /// Logs in and stores the returned session.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserIdentity, ShellError> {
        let auth = self.run(|api| api.auth().login(email, password)).await?;
        self.session.set_session(&auth.token, &auth.user)?;
        Ok(auth.user)
    }

    /// Registers and stores the returned session.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserIdentity, ShellError> {
        let auth = self
            .run(|api| api.auth().register(name, email, password))
            .await?;
        self.session.set_session(&auth.token, &auth.user)?;
        Ok(auth.user)
    }

    /// Explicit logout.
    pub fn logout(&self) -> Result<(), StorageError> {
        self.session.clear_session()?;
        self.navigator.navigate(&Route::Login);
        Ok(())
    }

    fn force_logout(&self) {
        if let Err(e) = self.session.clear_session() {
            tracing::warn!("Failed to clear session: {}", e);
        }
        self.navigator.navigate(&Route::Login);
    }
}

/// Errors from shell operations that touch both the backend and the session.
#[derive(thiserror::Error, Debug)]
pub enum ShellError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ShellError {
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            ShellError::Api(e) => e.message_or(fallback),
            ShellError::Storage(e) => e.to_string(),
        }
    }
}
