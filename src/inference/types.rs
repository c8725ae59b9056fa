use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body posted to the inference endpoint. An absent prompt is omitted
/// from the payload rather than sent as `null`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompletionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
}

/// `content` is relayed untouched: an explicit `null` stays `Some(Null)`,
/// only a missing key is `None`.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionMessage {
    #[serde(default, deserialize_with = "present")]
    pub content: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl CompletionResponse {
    pub fn from_body(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| Error::upstream_shape(e.to_string()))
    }

    /// Content of the first choice.
    pub fn into_content(self) -> Result<Option<Value>> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::upstream_shape("response has no choices"))
    }
}
