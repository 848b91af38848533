//! export-lambda — function handler for snapshot events.
//!
//! Invoked once per event admitted by the bus rule (`snapex pattern` prints
//! it). Transient failures are returned as errors so the function host's
//! retry policy redelivers the event; everything else completes the
//! invocation.

use std::sync::Arc;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;

use snapex_core::config::{load_dotenv, Config};
use snapex_export::{host, ExportTrigger, RdsExportService};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .init();

    load_dotenv();
    let config = Config::from_env();
    config.log_summary();

    let service = Arc::new(RdsExportService::new(&config.aws).await);
    let trigger = Arc::new(ExportTrigger::new(service, config.export)?);

    info!("export-lambda ready");
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let trigger = trigger.clone();
        async move {
            info!(request_id = %event.context.request_id, "Invocation started");
            let body = host::invoke(&trigger, &event.payload).await?;
            Ok::<Value, Error>(body)
        }
    }))
    .await
}
