//! HTTP router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! JSON endpoints are nested under `/api/`.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the API router.
pub fn api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);

    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/parse", post(endpoints::parse::parse))
        .route("/parse/report", post(endpoints::parse::report))
        .route("/drugs", get(endpoints::drugs::status))
        .route("/drugs/reload", post(endpoints::drugs::reload))
        .with_state(ctx);

    // The mobile client is served from a different origin
    Router::new()
        .route("/", get(endpoints::health::root))
        .nest("/api", api)
        .layer(CorsLayer::permissive())
}
