use anyhow::Result;
use tracing::warn;

use inference_service::{metrics, server, telemetry, ServiceConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServiceConfig::from_env()?;

    telemetry::init_tracing(config.log_format);

    if let Err(e) = metrics::init_metrics() {
        warn!(error = %e, "Prometheus recorder not installed; /metrics will be empty");
    }

    server::run(config).await
}
