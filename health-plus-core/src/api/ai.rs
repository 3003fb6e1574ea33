use reqwest::Method;
use serde::Serialize;

use super::ApiClient;
use crate::error::ApiError;
use crate::models::HealthAnswer;

#[derive(Serialize)]
struct HealthQuery<'a> {
    question: &'a str,
}

/// `/ai` endpoints.
#[derive(Clone, Copy)]
pub struct AiApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AiApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Asks the health assistant a free-text question.
    pub async fn health_query(self, question: &str) -> Result<HealthAnswer, ApiError> {
        let request = self
            .client
            .request(Method::POST, "/ai/health-query")
            .json(&HealthQuery { question });
        self.client.send(request).await
    }
}
