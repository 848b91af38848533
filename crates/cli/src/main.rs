//! snapex — operator tooling for the snapshot export trigger.

mod cli;

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{json, Value};

use snapex_core::config::{load_dotenv, Config};
use snapex_core::{EventFilter, FixedClock, JobIdentifier, ResourceReference};
use snapex_export::{
    dispatch, Dispatch, ExportService, ExportTrigger, RdsExportService, RecordingExportService,
};

use cli::{CliArgs, Command};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    load_dotenv();
    let args = CliArgs::parse();

    match args.command {
        Command::Pattern { compact } => {
            let pattern = EventFilter::automated_cluster_snapshot().to_event_pattern();
            print_json(&pattern, !compact)?;
        }
        Command::JobId { arn } => {
            let source: ResourceReference = arn
                .parse()
                .with_context(|| format!("not a valid resource reference: {arn}"))?;
            println!("{}", JobIdentifier::for_source(&source));
        }
        Command::Config => {
            let config = Config::for_profile(&args.profile);
            print_json(&config.redacted_summary(), true)?;
        }
        Command::Invoke { event, dry_run, date, skip_filter } => {
            let config = Config::for_profile(&args.profile);
            let payload = read_event(&event)?;

            let service: Arc<dyn ExportService> = if dry_run {
                Arc::new(RecordingExportService::accepting())
            } else {
                Arc::new(RdsExportService::new(&config.aws).await)
            };

            let mut trigger = ExportTrigger::new(service, config.export.clone())
                .context("export configuration incomplete")?;
            if let Some(date) = date {
                trigger = trigger.with_clock(Arc::new(FixedClock(date)));
            }

            tracing::debug!(dry_run, skip_filter, partition_date = ?date, "invoking trigger");
            let filter = EventFilter::automated_cluster_snapshot();
            let report = if dry_run {
                dry_run_report(&filter, &trigger, &payload, skip_filter)?
            } else {
                let result = if skip_filter {
                    trigger.handle(&payload).await.map(Dispatch::Handled)
                } else {
                    dispatch(&filter, &trigger, &payload).await
                };
                match result.context("trigger failed")? {
                    Dispatch::Dropped => json!({ "dispatch": "dropped" }),
                    Dispatch::Handled(outcome) => json!({
                        "dispatch": "handled",
                        "outcome": outcome,
                    }),
                }
            };
            print_json(&report, true)?;
        }
    }

    Ok(())
}

/// The request an event would produce, without calling the export service.
fn dry_run_report<S: ExportService + ?Sized>(
    filter: &EventFilter,
    trigger: &ExportTrigger<S>,
    payload: &Value,
    skip_filter: bool,
) -> Result<Value> {
    if !skip_filter && !filter.admits(payload) {
        return Ok(json!({ "dispatch": "dropped" }));
    }
    let request = trigger.prepare(payload).context("event cannot be exported")?;
    Ok(json!({ "dispatch": "would_submit", "request": request }))
}

fn read_event(path: &Path) -> Result<Value> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read event from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&raw).context("event is not valid JSON")
}

fn print_json(value: &Value, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}
