//! Tracing initialisation

use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;

const SERVICE_NAME: &str = "inference_service";

/// Initialize tracing in the requested output format
pub fn init_tracing(format: LogFormat) {
    match format {
        LogFormat::Text => init_tracing_text(),
        LogFormat::Json => init_tracing_json(),
    }
}

/// Human-readable output (for development)
fn init_tracing_text() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{SERVICE_NAME}=info,tower_http=debug")));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// JSON output (for production)
fn init_tracing_json() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{SERVICE_NAME}=info,tower_http=info")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .init();
}
