//! In-process [`ExportService`] that records every request.
//!
//! Backs `snapex invoke --dry-run` and the test suites. By default every
//! request is accepted; it can also emulate the real service's duplicate
//! detection, replay scripted answers, or stall to exercise timeouts.

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use snapex_core::ExportJobRequest;

use crate::service::{ExportJobResult, ExportService, ServiceError, DUPLICATE_JOB_CODE};

#[derive(Default)]
pub struct RecordingExportService {
    requests: Mutex<Vec<ExportJobRequest>>,
    script: Mutex<VecDeque<Result<ExportJobResult, ServiceError>>>,
    started: Mutex<HashSet<String>>,
    reject_duplicates: bool,
    delay: Option<Duration>,
}

impl RecordingExportService {
    /// Accepts every request.
    pub fn accepting() -> Self {
        Self::default()
    }

    /// Rejects a job identifier that was already started, like the real
    /// export service does.
    pub fn deduplicating() -> Self {
        Self {
            reject_duplicates: true,
            ..Self::default()
        }
    }

    /// Answer the next calls with `responses`, in order, then fall back to
    /// the default behaviour.
    pub fn scripted(responses: Vec<Result<ExportJobResult, ServiceError>>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    /// Sleep for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<ExportJobRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn answer(&self, request: &ExportJobRequest) -> Result<ExportJobResult, ServiceError> {
        if let Some(scripted) = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
        {
            return scripted;
        }

        let id = request.job_identifier.as_str();
        let first = self
            .started
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_string());
        if self.reject_duplicates && !first {
            return Ok(ExportJobResult::Rejected {
                code: DUPLICATE_JOB_CODE.to_string(),
                reason: format!("The export task with the ID {id} already exists."),
            });
        }
        Ok(ExportJobResult::Accepted {
            task_identifier: id.to_string(),
            status: Some("STARTING".to_string()),
        })
    }
}

#[async_trait]
impl ExportService for RecordingExportService {
    async fn start_export(&self, request: &ExportJobRequest) -> Result<ExportJobResult, ServiceError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.answer(request)
    }

    fn name(&self) -> &str {
        "recording"
    }
}
