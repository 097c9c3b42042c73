pub mod api;
pub mod config;
pub mod core_state;
pub mod pipeline;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Start the HTTP service: logging, drug reference load, serve until Ctrl-C.
pub async fn run() -> Result<(), api::ServerError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let drug_csv = config::drug_csv_path();
    tracing::info!(path = %drug_csv.display(), "Loading drug reference set");
    let core = Arc::new(core_state::CoreState::from_csv(drug_csv));

    api::serve(core, config::bind_addr()).await
}
