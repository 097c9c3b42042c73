//! Prescription parsing endpoints.
//!
//! - `POST /api/parse`: JSON parse result, `null` for blank text
//! - `POST /api/parse/report`: the same parse rendered as plain text

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ParseRequest};
use crate::pipeline::prescription::{render_report, ParseResult, StaticNer};

/// Returns the parse result, or `null` when the text is blank.
pub async fn parse(
    State(ctx): State<ApiContext>,
    Json(request): Json<ParseRequest>,
) -> Result<Json<Option<ParseResult>>, ApiError> {
    let result = run_parse(ctx, request).await?;
    if let Some(ref parsed) = result {
        tracing::info!(items = parsed.items.len(), "Parse request complete");
    }
    Ok(Json(result))
}

/// Returns the text report. Blank text has nothing to report and is a 400.
pub async fn report(
    State(ctx): State<ApiContext>,
    Json(request): Json<ParseRequest>,
) -> Result<String, ApiError> {
    let parsed = run_parse(ctx, request)
        .await?
        .ok_or_else(|| ApiError::BadRequest("No text to parse".into()))?;
    tracing::info!(items = parsed.items.len(), "Report request complete");
    Ok(render_report(&parsed))
}

async fn run_parse(
    ctx: ApiContext,
    request: ParseRequest,
) -> Result<Option<ParseResult>, ApiError> {
    let core = ctx.core.clone();
    let ParseRequest { text, entities } = request;

    let result = tokio::task::spawn_blocking(move || match entities {
        Some(spans) => core.parse_with(&text, &StaticNer(spans)),
        None => core.parse(&text),
    })
    .await??;
    Ok(result)
}
