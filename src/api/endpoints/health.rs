//! Liveness endpoints.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub drug_count: usize,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct RootResponse {
    pub message: String,
}

/// `GET /`: banner for quick manual checks.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: format!("{} prescription parser is running.", crate::config::APP_NAME),
    })
}

/// `GET /api/health`: connection check for clients.
pub async fn check(
    State(ctx): State<ApiContext>,
) -> Result<Json<HealthResponse>, ApiError> {
    let drugs = ctx.core.drugs().snapshot().map_err(crate::core_state::CoreError::from)?;

    Ok(Json(HealthResponse {
        status: "ok",
        drug_count: drugs.len(),
        version: crate::config::APP_VERSION,
    }))
}
