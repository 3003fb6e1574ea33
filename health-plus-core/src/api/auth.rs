use reqwest::Method;
use serde::Serialize;

use super::ApiClient;
use crate::error::ApiError;
use crate::models::AuthResponse;

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

/// `/auth` endpoints. These only return the new session; storing it is up
/// to the caller.
#[derive(Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn login(self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let request = self
            .client
            .request(Method::POST, "/auth/login")
            .json(&LoginRequest { email, password });
        self.client.send(request).await
    }

    pub async fn register(
        self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        let request = self
            .client
            .request(Method::POST, "/auth/register")
            .json(&RegisterRequest {
                name,
                email,
                password,
            });
        self.client.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::api::test_server::spawn_backend;
    use crate::api::{ApiClient, BackendTarget, ClientOptions};
    use crate::error::ApiError;
    use crate::session::SessionStore;

    fn client_for(base_url: &str) -> ApiClient {
        let target = BackendTarget::from_url(base_url).unwrap();
        ApiClient::new(target, Arc::new(SessionStore::in_memory()), ClientOptions::default())
            .unwrap()
    }

    #[tokio::test]
    async fn test_login() {
        let backend = spawn_backend().await;
        let client = client_for(&backend.base_url);

        let auth = client.auth().login("a@b.com", "pw").await.unwrap();
        assert_eq!(auth.token, "abc");
        assert_eq!(auth.user.email, "a@b.com");

        let seen = backend.recorder.requests();
        assert_eq!(seen[0].method, "POST");
        assert_eq!(seen[0].path, "/api/auth/login");
        assert_eq!(seen[0].content_type.as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let backend = spawn_backend().await;
        let client = client_for(&backend.base_url);

        let err = client.auth().login("a@b.com", "wrong").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(
            err.message_or("Login failed. Please try again."),
            "Invalid email or password"
        );
    }

    #[tokio::test]
    async fn test_register() {
        let backend = spawn_backend().await;
        let client = client_for(&backend.base_url);

        let auth = client
            .auth()
            .register("Bea", "bea@b.com", "secret")
            .await
            .unwrap();
        assert_eq!(auth.token, "new-token");
        assert_eq!(auth.user.name, "Bea");
    }

    #[tokio::test]
    async fn test_register_conflict() {
        let backend = spawn_backend().await;
        let client = client_for(&backend.base_url);

        let err = client
            .auth()
            .register("Bea", "taken@b.com", "secret")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 400, .. }));
        assert_eq!(err.server_message(), Some("User already exists"));
    }

    #[tokio::test]
    async fn test_double_submit_runs_both() {
        let backend = spawn_backend().await;
        let client = client_for(&backend.base_url);
        let auth = client.auth();

        let (first, second) = futures::join!(
            auth.login("a@b.com", "pw"),
            auth.login("a@b.com", "pw")
        );
        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(backend.recorder.requests().len(), 2);
    }
}
