//! Health check and API information endpoints.

use axum::{extract::State, Json};
use serde::Serialize;
use wallgauge::EstimatorConfig;

use crate::AppState;

const SERVICE: &str = "wallgauge-server";

/// Health check response: liveness plus the settings requests run with.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    /// Whether `use_ai` requests get commentary (an API key is configured).
    pub commentary_enabled: bool,
    pub commentary_model: Option<String>,
    pub max_upload_mb: usize,
    /// Active engine configuration, including default paint parameters.
    pub engine: EstimatorConfig,
}

/// API information response.
#[derive(Debug, Serialize)]
pub struct ApiInfoResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

/// Endpoint information.
#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
    /// Multipart parts accepted, empty for bodiless endpoints.
    pub fields: &'static [&'static str],
}

const MEASURE_FIELDS: &[&str] = &[
    "front",
    "side",
    "top",
    "scale",
    "ref_length_m",
    "ref_pixels",
    "side_scale",
    "side_ref_length_m",
    "side_ref_pixels",
    "top_scale",
    "top_ref_length_m",
    "top_ref_pixels",
    "coverage",
    "coats",
    "units",
    "round_up",
    "use_ai",
];

/// GET /api/v1/health - Health check endpoint.
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let commentary_enabled = state.commentary.is_some();
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: SERVICE,
        commentary_enabled,
        commentary_model: commentary_enabled.then(|| state.config.openai_model.clone()),
        max_upload_mb: state.config.max_upload_mb,
        engine: state.estimator.config().clone(),
    })
}

/// GET / - API information endpoint.
pub async fn info() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        service: SERVICE,
        version: env!("CARGO_PKG_VERSION"),
        description: "Wall dimensions and paint volume from photographs",
        endpoints: vec![
            EndpointInfo {
                method: "GET",
                path: "/api/v1/health",
                description: "Health, commentary availability and engine settings",
                fields: &[],
            },
            EndpointInfo {
                method: "POST",
                path: "/measure",
                description: "Measure a wall from multipart images (front required, side/top optional)",
                fields: MEASURE_FIELDS,
            },
        ],
    })
}
