//! Natural-language balance prediction.
//!
//! Free text is turned into model features by a chat model, and the
//! features are then scored by a separately deployed balance model.

pub mod scoring;
pub mod types;

pub use scoring::ScoringClient;
pub use types::*;

use crate::{
    Result,
    config::StructuringConfig,
    llm::{ChatCompletionRequest, ChatMessage, LlmClient, OpenAiClient},
};
use tracing::{debug, info};

pub struct NlPredictor {
    llm_client: Box<dyn LlmClient>,
    scoring: ScoringClient,
}

impl NlPredictor {
    pub fn new(config: StructuringConfig, http: reqwest::Client) -> Self {
        let llm_client = OpenAiClient::with_http_client(config.llm, http.clone());
        Self::with_llm_client(Box::new(llm_client), ScoringClient::new(http, config.scoring))
    }

    pub fn with_llm_client(llm_client: Box<dyn LlmClient>, scoring: ScoringClient) -> Self {
        Self {
            llm_client,
            scoring,
        }
    }

    pub async fn structure(&self, input: &str) -> Result<StructuredInput> {
        let request = ChatCompletionRequest {
            messages: vec![
                ChatMessage::system(STRUCTURING_SYSTEM_PROMPT),
                ChatMessage::user(structuring_prompt(input)),
            ],
            temperature: Some(0.0),
        };

        let output = self.llm_client.create_chat_completion(request).await?;
        debug!("Structuring model returned: {}", output);

        StructuredInput::from_model_output(&output)
    }

    pub async fn predict(&self, input: &str) -> Result<NlPrediction> {
        let structured_input = self.structure(input).await?;
        info!(
            "Structured input: journals={} total={} avg={}",
            structured_input.total_journals,
            structured_input.total_amount,
            structured_input.avg_amount
        );

        let prediction = self
            .scoring
            .score(&ScoringRequest {
                data: vec![structured_input.clone()],
            })
            .await?;

        Ok(NlPrediction {
            structured_input,
            prediction,
        })
    }
}
