use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Features the balance model is scored on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredInput {
    #[serde(rename = "TOTAL_JOURNALS")]
    pub total_journals: f64,
    #[serde(rename = "TOTAL_AMOUNT")]
    pub total_amount: f64,
    #[serde(rename = "AVG_AMOUNT")]
    pub avg_amount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoringRequest {
    pub data: Vec<StructuredInput>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NlPrediction {
    pub structured_input: StructuredInput,
    pub prediction: Value,
}

pub const STRUCTURING_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

pub fn structuring_prompt(input: &str) -> String {
    format!(
        r#"Convert the following natural language into a JSON object with keys:
- TOTAL_JOURNALS
- TOTAL_AMOUNT
- AVG_AMOUNT

Input: "{input}"
JSON:
"#
    )
}

impl StructuredInput {
    /// Parses model output as JSON, tolerating a surrounding markdown fence.
    pub fn from_model_output(output: &str) -> Result<Self> {
        let trimmed = output.trim();
        let body = trimmed
            .strip_prefix("```json")
            .or_else(|| trimmed.strip_prefix("```"))
            .and_then(|rest| rest.strip_suffix("```"))
            .unwrap_or(trimmed);

        serde_json::from_str(body.trim()).map_err(|e| {
            Error::llm(format!(
                "Model output is not a valid structured input ({}): {}",
                e, output
            ))
        })
    }
}
