//! Typed decode of snapshot lifecycle events.
//!
//! Inbound events are EventBridge RDS events:
//!
//! ```json
//! {
//!   "source": "aws.rds",
//!   "detail-type": "RDS DB Cluster Snapshot Event",
//!   "time": "2024-06-26T03:20:11Z",
//!   "detail": {
//!     "EventCategories": ["backup"],
//!     "SourceType": "CLUSTER_SNAPSHOT",
//!     "SourceArn": "arn:aws:rds:...:cluster-snapshot:rds:mydb-2024-06-26-03-09",
//!     "Message": "Automated cluster snapshot created",
//!     "EventID": "RDS-EVENT-0169"
//!   }
//! }
//! ```
//!
//! Only `detail.SourceArn` is required, and it must be a string. Everything
//! else is read best-effort for logging: a field of an unexpected type is
//! treated as absent, and unknown fields are ignored.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::arn::ResourceReference;
use crate::error::EventError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventCategory {
    Backup,
    Other(String),
}

impl From<String> for EventCategory {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("backup") {
            Self::Backup
        } else {
            Self::Other(value)
        }
    }
}

impl From<EventCategory> for String {
    fn from(value: EventCategory) -> Self {
        match value {
            EventCategory::Backup => "backup".to_string(),
            EventCategory::Other(s) => s,
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backup => f.write_str("backup"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// A string or list of strings, read leniently: anything else is empty.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

/// One snapshot lifecycle event, as admitted by the event filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotEvent {
    pub event_categories: Vec<EventCategory>,
    /// Lifecycle code, e.g. `RDS-EVENT-0169`. Empty when the payload has none.
    pub event_id: String,
    pub resource_reference: ResourceReference,
    pub source_type: Option<String>,
    pub message: Option<String>,
    /// Emission time reported by the bus. Informational only.
    pub time: Option<DateTime<Utc>>,
}

impl SnapshotEvent {
    /// Decode an event payload, failing closed on a missing or unusable
    /// resource reference.
    pub fn from_value(payload: &Value) -> Result<Self, EventError> {
        let detail = match payload.get("detail") {
            None | Some(Value::Null) => return Err(EventError::MissingField("detail")),
            Some(d) if !d.is_object() => {
                return Err(EventError::InvalidField {
                    field: "detail",
                    reason: "expected an object".into(),
                })
            }
            Some(d) => d,
        };

        let source_arn = match detail.get("SourceArn") {
            None | Some(Value::Null) => return Err(EventError::MissingField("detail.SourceArn")),
            Some(Value::String(s)) if s.trim().is_empty() => {
                return Err(EventError::MissingField("detail.SourceArn"))
            }
            Some(Value::String(s)) => s,
            Some(_) => {
                return Err(EventError::InvalidField {
                    field: "detail.SourceArn",
                    reason: "expected a string".into(),
                })
            }
        };
        let resource_reference = ResourceReference::parse(source_arn)?;

        let time = payload
            .get("time")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<DateTime<Utc>>().ok());

        Ok(Self {
            event_categories: string_list(detail.get("EventCategories"))
                .into_iter()
                .map(EventCategory::from)
                .collect(),
            event_id: text(detail.get("EventID")).unwrap_or_default(),
            resource_reference,
            source_type: text(detail.get("SourceType")),
            message: text(detail.get("Message")),
            time,
        })
    }

    /// The snapshot's own name, taken from the resource reference.
    pub fn snapshot_name(&self) -> &str {
        self.resource_reference.resource_name()
    }
}
