//! HTTP surface over the prescription pipeline.
//!
//! Thin JSON layer: handlers translate requests into `CoreState` calls
//! and errors into `ApiError` responses. No results are persisted.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{serve, ServerError};
pub use types::ApiContext;
