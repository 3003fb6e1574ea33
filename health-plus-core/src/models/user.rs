use serde::{Deserialize, Serialize};

/// The logged-in user as returned by the auth endpoints.
///
/// Opaque beyond display; nothing here is validated client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Body of a successful `/auth/login` or `/auth/register` call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserIdentity,
}
