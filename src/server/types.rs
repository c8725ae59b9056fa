use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub prompt: Option<Value>,
}

/// A missing upstream `content` leaves `predicted_balance` out entirely.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_balance: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct NlPredictRequest {
    #[serde(default)]
    pub input: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
