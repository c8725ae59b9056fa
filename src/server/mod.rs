pub mod handlers;
pub mod types;

use crate::{
    Error, Result,
    config::{Config, ServerConfig},
    inference::HttpCompletionClient,
    structuring::NlPredictor,
};
use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::post,
};
use handlers::AppState;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Builds the shared state; every outbound call goes through one HTTP client.
pub fn build_state(config: &Config) -> AppState {
    let http = reqwest::Client::new();
    let completion = HttpCompletionClient::with_client(http.clone(), config.inference.clone());
    let nl_predictor = config
        .structuring
        .clone()
        .map(|structuring| Arc::new(NlPredictor::new(structuring, http.clone())));

    AppState {
        completion: Arc::new(completion),
        nl_predictor,
    }
}

pub fn router(state: AppState, server: &ServerConfig) -> Result<Router> {
    let mut app = Router::new().route("/api/nlc-predict", post(handlers::nlc_predict));

    if let Some(predictor) = state.nl_predictor.clone() {
        app = app.route(
            "/predict-from-nl",
            post(handlers::predict_from_nl).with_state(predictor),
        );
    }

    Ok(app
        .layer(cors_layer(&server.cors_origins)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let values = origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|_| Error::config(format!("Invalid CORS origin: '{}'", origin)))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(Any))
}

pub async fn run(config: Config) -> Result<()> {
    let app = router(build_state(&config), &config.server)?;

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
