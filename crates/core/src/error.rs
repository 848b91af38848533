use thiserror::Error;

/// Reasons an inbound event payload cannot be turned into a [`SnapshotEvent`].
///
/// Every variant is terminal for the invocation that hit it: a payload that
/// fails to decode once will fail the same way on every redelivery.
///
/// [`SnapshotEvent`]: crate::event::SnapshotEvent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("invalid resource reference {arn:?}: {reason}")]
    InvalidArn { arn: String, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required configuration: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("invalid configuration {key}: {reason}")]
    Invalid { key: String, reason: String },
}
