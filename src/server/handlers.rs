use super::types::{ErrorResponse, NlPredictRequest, PredictRequest, PredictResponse};
use crate::{
    Error,
    inference::{CompletionClient, CompletionRequest},
    structuring::{NlPrediction, NlPredictor},
};
use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub completion: Arc<dyn CompletionClient>,
    pub nl_predictor: Option<Arc<NlPredictor>>,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Every failure is reported as a 500 carrying the error text.
fn internal_error(e: Error) -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

async fn relay(client: &dyn CompletionClient, prompt: Option<Value>) -> crate::Result<Option<Value>> {
    let response = client.complete(CompletionRequest { prompt }).await?;
    response.into_content()
}

pub async fn nlc_predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, HandlerError> {
    let request_id = Uuid::new_v4();
    info!(
        "[{}] Received prediction request (prompt present: {})",
        request_id,
        request.prompt.is_some()
    );

    match relay(state.completion.as_ref(), request.prompt).await {
        Ok(content) => {
            info!("[{}] Prediction relayed", request_id);
            Ok(Json(PredictResponse {
                predicted_balance: content,
            }))
        }
        Err(e) => {
            error!("[{}] Prediction request failed: {}", request_id, e);
            Err(internal_error(e))
        }
    }
}

pub async fn predict_from_nl(
    State(predictor): State<Arc<NlPredictor>>,
    Json(request): Json<NlPredictRequest>,
) -> Result<Json<NlPrediction>, HandlerError> {
    let request_id = Uuid::new_v4();
    info!(
        "[{}] Received natural-language prediction request (input present: {})",
        request_id,
        request.input.is_some()
    );

    // A missing input is handed to the model as empty text
    let input = request.input.unwrap_or_default();

    match predictor.predict(&input).await {
        Ok(prediction) => Ok(Json(prediction)),
        Err(e) => {
            error!(
                "[{}] Natural-language prediction failed: {}",
                request_id, e
            );
            Err(internal_error(e))
        }
    }
}
