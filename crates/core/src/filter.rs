//! Declarative admission predicate for snapshot events.
//!
//! The filter is evaluated by the event bus before delivery, via the rule
//! pattern rendered by [`EventFilter::to_event_pattern`]. [`EventFilter::admits`]
//! evaluates the same predicate locally for delivery paths that do not go
//! through a bus rule (redrives, manual invocation).

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub const RDS_EVENT_SOURCE: &str = "aws.rds";
pub const CLUSTER_SNAPSHOT_DETAIL_TYPE: &str = "RDS DB Cluster Snapshot Event";

/// Creation of a manual cluster snapshot has started.
pub const MANUAL_CLUSTER_SNAPSHOT_STARTED: &str = "RDS-EVENT-0074";
/// A manual cluster snapshot has been created.
pub const MANUAL_CLUSTER_SNAPSHOT_CREATED: &str = "RDS-EVENT-0075";
/// Creating automated cluster snapshot.
pub const AUTOMATED_CLUSTER_SNAPSHOT_STARTED: &str = "RDS-EVENT-0168";
/// Automated cluster snapshot created: the only export-ready code.
pub const AUTOMATED_CLUSTER_SNAPSHOT_CREATED: &str = "RDS-EVENT-0169";

/// Every constraint is a set of allowed values; an empty set leaves the
/// field unconstrained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    pub source: Vec<String>,
    pub detail_type: Vec<String>,
    pub event_categories: Vec<String>,
    pub event_ids: Vec<String>,
}

impl EventFilter {
    /// Completed automated cluster snapshots only.
    pub fn automated_cluster_snapshot() -> Self {
        Self {
            source: vec![RDS_EVENT_SOURCE.to_string()],
            detail_type: vec![CLUSTER_SNAPSHOT_DETAIL_TYPE.to_string()],
            event_categories: vec!["backup".to_string()],
            event_ids: vec![AUTOMATED_CLUSTER_SNAPSHOT_CREATED.to_string()],
        }
    }

    /// Render as an EventBridge rule pattern.
    pub fn to_event_pattern(&self) -> Value {
        let mut pattern = Map::new();
        if !self.source.is_empty() {
            pattern.insert("source".into(), json!(self.source));
        }
        if !self.detail_type.is_empty() {
            pattern.insert("detail-type".into(), json!(self.detail_type));
        }

        let mut detail = Map::new();
        if !self.event_categories.is_empty() {
            detail.insert("EventCategories".into(), json!(self.event_categories));
        }
        if !self.event_ids.is_empty() {
            detail.insert("EventID".into(), json!(self.event_ids));
        }
        if !detail.is_empty() {
            pattern.insert("detail".into(), Value::Object(detail));
        }

        Value::Object(pattern)
    }

    /// Whether a raw event payload satisfies every constraint.
    ///
    /// Matching follows bus-rule semantics: a string field matches when it is
    /// one of the allowed values, an array field matches when any element is.
    /// A missing field never matches a constrained key.
    pub fn admits(&self, event: &Value) -> bool {
        let detail = event.get("detail");
        field_matches(event.get("source"), &self.source)
            && field_matches(event.get("detail-type"), &self.detail_type)
            && field_matches(detail.and_then(|d| d.get("EventCategories")), &self.event_categories)
            && field_matches(detail.and_then(|d| d.get("EventID")), &self.event_ids)
    }
}

impl Default for EventFilter {
    fn default() -> Self {
        Self::automated_cluster_snapshot()
    }
}

fn field_matches(value: Option<&Value>, allowed: &[String]) -> bool {
    if allowed.is_empty() {
        return true;
    }
    let is_allowed = |v: &Value| v.as_str().is_some_and(|s| allowed.iter().any(|a| a == s));
    match value {
        Some(Value::Array(items)) => items.iter().any(is_allowed),
        Some(v) => is_allowed(v),
        None => false,
    }
}
