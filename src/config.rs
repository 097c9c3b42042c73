use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Rxparse";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable overriding the drug reference CSV path.
pub const DRUG_CSV_ENV: &str = "RXPARSE_DRUG_CSV";

/// Environment variable overriding the HTTP bind address.
pub const BIND_ENV: &str = "RXPARSE_BIND";

const DEFAULT_BIND: ([u8; 4], u16) = ([127, 0, 0, 1], 8000);

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "rxparse_lib=info,rxparse=info,tower_http=warn"
}

/// Get the application data directory
/// ~/Rxparse/ on all platforms; falls back to the working directory
/// when no home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the datasets directory
pub fn datasets_dir() -> PathBuf {
    app_data_dir().join("datasets")
}

/// Drug reference CSV: `$RXPARSE_DRUG_CSV`, else the bundled dataset location.
pub fn drug_csv_path() -> PathBuf {
    std::env::var_os(DRUG_CSV_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| datasets_dir().join("combined_drug_names.csv"))
}

/// HTTP bind address: `$RXPARSE_BIND`, else localhost:8000.
/// An unparseable override is logged and ignored.
pub fn bind_addr() -> SocketAddr {
    let default = SocketAddr::from(DEFAULT_BIND);
    match std::env::var(BIND_ENV) {
        Ok(raw) => raw.parse().unwrap_or_else(|e| {
            tracing::warn!(value = %raw, error = %e, "Invalid bind address, using default");
            default
        }),
        Err(_) => default,
    }
}
