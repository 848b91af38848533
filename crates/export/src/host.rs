//! Function-host glue.
//!
//! The core never retries. The function host redelivers an event only when
//! the invocation fails, so only transient failures are handed back as
//! errors. Malformed input and service rejections complete the invocation.

use serde_json::{json, Value};

use crate::service::ExportService;
use crate::trigger::{ExportTrigger, TriggerError};

/// Handle one function invocation.
///
/// Returns the response body for terminal outcomes and the error for
/// transient ones, so the function host's retry policy redelivers exactly
/// those.
pub async fn invoke<S: ExportService + ?Sized>(
    trigger: &ExportTrigger<S>,
    payload: &Value,
) -> Result<Value, TriggerError> {
    match trigger.handle(payload).await {
        Ok(outcome) => Ok(serde_json::to_value(&outcome).unwrap_or_else(|e| {
            json!({"outcome": "unknown", "error": e.to_string()})
        })),
        Err(e) if e.is_transient() => Err(e),
        Err(e) => Ok(json!({"outcome": "malformed_input", "error": e.to_string()})),
    }
}
