//! Drug reference endpoints.
//!
//! - `GET /api/drugs`: size and generation of the current set
//! - `POST /api/drugs/reload`: re-read the CSV and swap it in

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, DrugSetStatus, ReloadResponse};
use crate::core_state::CoreError;

pub async fn status(
    State(ctx): State<ApiContext>,
) -> Result<Json<DrugSetStatus>, ApiError> {
    let registry = ctx.core.drugs();
    let snapshot = registry.snapshot().map_err(CoreError::from)?;

    Ok(Json(DrugSetStatus {
        count: snapshot.len(),
        generation: snapshot.generation(),
        source: registry.source().map(|p| p.display().to_string()),
    }))
}

pub async fn reload(
    State(ctx): State<ApiContext>,
) -> Result<Json<ReloadResponse>, ApiError> {
    let core = ctx.core.clone();
    let count = tokio::task::spawn_blocking(move || core.reload_drugs()).await??;

    Ok(Json(ReloadResponse {
        message: "Drug list reloaded successfully".to_string(),
        count,
    }))
}
