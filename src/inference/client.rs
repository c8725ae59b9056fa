use super::types::*;
use crate::{Error, Result, config::InferenceConfig};
use async_trait::async_trait;
use tracing::debug;

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
}

/// Posts prompts to a single configured inference endpoint.
pub struct HttpCompletionClient {
    client: reqwest::Client,
    endpoint_url: String,
    api_key: String,
}

impl HttpCompletionClient {
    pub fn new(config: InferenceConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: InferenceConfig) -> Self {
        Self {
            client,
            endpoint_url: config.endpoint_url,
            api_key: config.api_key,
        }
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        debug!(
            "Posting completion request to {} (prompt present: {})",
            self.endpoint_url,
            request.prompt.is_some()
        );

        let response = self
            .client
            .post(&self.endpoint_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Inference endpoint answered with {} bytes", body.len());

        CompletionResponse::from_body(&body)
    }
}
