use super::types::ScoringRequest;
use crate::{Error, Result, config::ScoringConfig};
use serde_json::Value;
use tracing::debug;

pub struct ScoringClient {
    client: reqwest::Client,
    endpoint_url: String,
    api_key: String,
}

impl ScoringClient {
    pub fn new(client: reqwest::Client, config: ScoringConfig) -> Self {
        Self {
            client,
            endpoint_url: config.endpoint_url,
            api_key: config.api_key,
        }
    }

    /// Scores the rows and returns the endpoint's JSON body untouched.
    pub async fn score(&self, request: &ScoringRequest) -> Result<Value> {
        debug!(
            "Scoring {} rows against {}",
            request.data.len(),
            self.endpoint_url
        );

        let response = self
            .client
            .post(&self.endpoint_url)
            .bearer_auth(&self.api_key)
            .json(request)
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

        serde_json::from_str(&body).map_err(|e| Error::upstream_shape(e.to_string()))
    }
}
