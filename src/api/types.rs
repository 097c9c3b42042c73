//! Shared types for the HTTP layer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core_state::CoreState;
use crate::pipeline::prescription::NerEntitySpan;

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

/// `POST /api/parse` body.
#[derive(Debug, Clone, Deserialize)]
pub struct ParseRequest {
    /// OCR text of the prescription.
    pub text: String,
    /// Spans from a caller-side NER model. When absent the server's
    /// configured model is used.
    #[serde(default)]
    pub entities: Option<Vec<NerEntitySpan>>,
}

#[derive(Debug, Serialize)]
pub struct DrugSetStatus {
    pub count: usize,
    pub generation: u64,
    pub source: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub message: String,
    pub count: usize,
}
