//! Channel-side delivery: apply the event filter, then hand admitted events
//! to the trigger.
//!
//! Hosts fed by a bus rule already only see admitted events; redrives and
//! manual invocations go through [`dispatch`] so the trigger never sees a
//! non-admitted lifecycle event either way.

use serde_json::Value;
use tracing::debug;

use snapex_core::EventFilter;

use crate::service::ExportService;
use crate::trigger::{ExportTrigger, TriggerError, TriggerOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The filter did not admit the event; nothing was called.
    Dropped,
    Handled(TriggerOutcome),
}

pub async fn dispatch<S: ExportService + ?Sized>(
    filter: &EventFilter,
    trigger: &ExportTrigger<S>,
    payload: &Value,
) -> Result<Dispatch, TriggerError> {
    if !filter.admits(payload) {
        debug!(
            event_id = ?payload.pointer("/detail/EventID"),
            detail_type = ?payload.get("detail-type"),
            "Event not admitted by filter, dropping"
        );
        return Ok(Dispatch::Dropped);
    }
    trigger.handle(payload).await.map(Dispatch::Handled)
}
