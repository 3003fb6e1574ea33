use reqwest::Method;

use super::ApiClient;
use crate::error::ApiError;
use crate::models::Dashboard;

/// `/dashboard`: the caller's family roster.
#[derive(Clone, Copy)]
pub struct DashboardApi<'a> {
    client: &'a ApiClient,
}

impl<'a> DashboardApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get(self) -> Result<Dashboard, ApiError> {
        let request = self.client.request(Method::GET, "/dashboard");
        self.client.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::api::test_server::{spawn_backend, test_user};
    use crate::api::{ApiClient, BackendTarget, ClientOptions};
    use crate::session::SessionStore;

    #[tokio::test]
    async fn test_get_dashboard() {
        let backend = spawn_backend().await;
        let session = Arc::new(SessionStore::in_memory());
        session.set_session("xyz", &test_user()).unwrap();
        let target = BackendTarget::from_url(&backend.base_url).unwrap();
        let client = ApiClient::new(target, session, ClientOptions::default()).unwrap();

        let dashboard = client.dashboard().get().await.unwrap();
        assert_eq!(dashboard.family_members.len(), 2);

        let summary = dashboard.summary();
        assert_eq!(summary.members, 2);
        assert_eq!(summary.reports, 2);
        assert_eq!(summary.medications, 2);
    }
}
