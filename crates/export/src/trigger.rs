//! Snapshot event → export job.
//!
//! [`ExportTrigger::handle`] is a single-shot transition per event:
//! `Received → {Submitted | Rejected | MalformedInput}`. It keeps no state
//! between calls and never retries; redelivery of the triggering event is
//! the host's business, and the deterministic job identifier makes that
//! redelivery safe.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use snapex_core::{
    Clock, ConfigError, EventError, ExportConfig, ExportJobRequest, JobIdentifier, SnapshotEvent,
    SystemClock,
};

use crate::service::{ExportJobResult, ExportService, ServiceError, DUPLICATE_JOB_CODE};

// ---------------------------------------------------------------------------
// Outcome / Error
// ---------------------------------------------------------------------------

/// Terminal result of an invocation that reached the export service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TriggerOutcome {
    Submitted {
        job_identifier: JobIdentifier,
        task_identifier: String,
        status: Option<String>,
    },
    /// The export service refused the job. Not retried.
    Rejected {
        job_identifier: JobIdentifier,
        code: String,
        reason: String,
    },
}

impl TriggerOutcome {
    pub fn job_identifier(&self) -> &JobIdentifier {
        match self {
            Self::Submitted { job_identifier, .. } | Self::Rejected { job_identifier, .. } => {
                job_identifier
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    /// The payload could not be decoded; the export service was not called.
    #[error("malformed event: {0}")]
    MalformedEvent(#[from] EventError),

    #[error("export service unreachable: {0}")]
    Transport(String),

    #[error("export call exceeded {seconds}s budget")]
    Timeout { seconds: u64 },
}

impl TriggerError {
    /// Whether a redelivery of the same event could succeed.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::MalformedEvent(_))
    }
}

// ---------------------------------------------------------------------------
// Trigger
// ---------------------------------------------------------------------------

/// Stateless handler that turns one admitted event into one export-start call.
///
/// Safe to share across concurrent invocations: configuration and clock are
/// read-only, and the service is behind an `Arc`.
pub struct ExportTrigger<S: ?Sized> {
    service: Arc<S>,
    config: ExportConfig,
    clock: Arc<dyn Clock>,
}

impl<S: ExportService + ?Sized> ExportTrigger<S> {
    /// Fails if `config` is incomplete.
    pub fn new(service: Arc<S>, config: ExportConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            service,
            config,
            clock: Arc::new(SystemClock),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Decode `payload` and build its export request, without submitting.
    pub fn prepare(&self, payload: &Value) -> Result<ExportJobRequest, TriggerError> {
        let event = SnapshotEvent::from_value(payload)?;
        Ok(ExportJobRequest::build(&event, &self.config, self.clock.today()))
    }

    /// Handle one delivered event: exactly one export-start call unless the
    /// payload is malformed.
    pub async fn handle(&self, payload: &Value) -> Result<TriggerOutcome, TriggerError> {
        let event = match SnapshotEvent::from_value(payload) {
            Ok(event) => event,
            Err(e) => {
                error!(error = %e, "Malformed snapshot event, not exporting");
                return Err(e.into());
            }
        };

        info!(
            event_id = %event.event_id,
            source = %event.resource_reference,
            account = %event.resource_reference.account(),
            region = %event.resource_reference.region(),
            event_time = ?event.time,
            "Snapshot event received"
        );

        let request = ExportJobRequest::build(&event, &self.config, self.clock.today());
        let job_identifier = request.job_identifier.clone();

        let call = self.service.start_export(&request);
        let result = match tokio::time::timeout(self.config.timeout(), call).await {
            Ok(Ok(result)) => result,
            Ok(Err(ServiceError::Transport(reason))) => {
                error!(
                    job_identifier = %job_identifier,
                    service = self.service.name(),
                    error = %reason,
                    "Export start failed"
                );
                return Err(TriggerError::Transport(reason));
            }
            Err(_) => {
                error!(
                    job_identifier = %job_identifier,
                    service = self.service.name(),
                    timeout_seconds = self.config.timeout_seconds,
                    "Export start timed out"
                );
                return Err(TriggerError::Timeout {
                    seconds: self.config.timeout_seconds,
                });
            }
        };

        Ok(match result {
            ExportJobResult::Accepted { task_identifier, status } => {
                info!(
                    job_identifier = %job_identifier,
                    task_identifier = %task_identifier,
                    status = ?status,
                    destination = %request.destination,
                    "Export task started"
                );
                TriggerOutcome::Submitted {
                    job_identifier,
                    task_identifier,
                    status,
                }
            }
            ExportJobResult::Rejected { code, reason } => {
                error!(
                    job_identifier = %job_identifier,
                    code = %code,
                    reason = %reason,
                    duplicate = code == DUPLICATE_JOB_CODE,
                    "Export task rejected"
                );
                TriggerOutcome::Rejected {
                    job_identifier,
                    code,
                    reason,
                }
            }
        })
    }
}
