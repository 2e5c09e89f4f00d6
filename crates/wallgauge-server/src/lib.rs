//! wallgauge-server - HTTP front end for the wall measurement engine.
//!
//! # Endpoints
//!
//! - `GET /` - API information
//! - `GET /api/v1/health` - Health check
//! - `POST /measure` - Multipart measurement (`front` required; `side`, `top`
//!   optional; scale, paint and output fields as text parts)

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use wallgauge::{Estimator, EstimatorConfig, MeasureError};

pub mod commentary;
pub mod config;
pub mod error;
pub mod routes;

use commentary::CommentaryClient;
use config::Config;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub estimator: Arc<Estimator>,
    pub commentary: Option<Arc<CommentaryClient>>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Build state, loading the engine config file when one is configured.
    pub fn from_config(config: Config) -> Result<Self, MeasureError> {
        let engine = match &config.engine_config {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading engine config");
                EstimatorConfig::from_json_file(path)?
            }
            None => EstimatorConfig::default(),
        };
        let commentary = CommentaryClient::from_config(&config).map(Arc::new);
        if commentary.is_none() {
            tracing::info!("Commentary disabled (no OPENAI_API_KEY)");
        }
        Ok(Self {
            estimator: Arc::new(Estimator::with_config(engine)),
            commentary,
            config: Arc::new(config),
        })
    }
}

/// Router with all routes and middleware.
pub fn router(state: AppState) -> Router {
    let max_body = state.config.max_upload_mb.saturating_mul(1024 * 1024);
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        .route("/", get(routes::health::info))
        .route("/api/v1/health", get(routes::health::check))
        .route("/measure", post(routes::measure::measure))
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
