//! The export-start seam.

use async_trait::async_trait;
use serde::Serialize;

use snapex_core::ExportJobRequest;

/// Error code the export service uses for an already-used job identifier.
pub const DUPLICATE_JOB_CODE: &str = "ExportTaskAlreadyExists";

/// Acknowledgment of an export-start call.
///
/// A rejection is a complete answer from the service, not a failure to reach
/// it, so it is a value here rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ExportJobResult {
    Accepted {
        task_identifier: String,
        status: Option<String>,
    },
    Rejected {
        code: String,
        reason: String,
    },
}

impl ExportJobResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// The job identifier was already used, i.e. this is a redelivery.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Rejected { code, .. } if code == DUPLICATE_JOB_CODE)
    }
}

/// The call never produced an answer from the service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(String),
}

#[async_trait]
pub trait ExportService: Send + Sync {
    /// Start an export job. Returns once the service has acknowledged the
    /// request; the job itself runs on after this returns.
    async fn start_export(&self, request: &ExportJobRequest) -> Result<ExportJobResult, ServiceError>;

    /// Human-readable backend name for logs.
    fn name(&self) -> &str;
}
