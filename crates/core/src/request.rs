//! Export job requests derived from snapshot events.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::arn::ResourceReference;
use crate::config::ExportConfig;
use crate::event::SnapshotEvent;

/// Identifier of an export job, unique within the export service.
///
/// It is the snapshot's own name, so a redelivered event maps onto the job
/// already started for it and the export service rejects the duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobIdentifier(String);

impl JobIdentifier {
    pub fn for_source(source: &ResourceReference) -> Self {
        Self(source.resource_name().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Calendar partition `YYYY/MM/DD`.
pub fn date_partition(date: NaiveDate) -> String {
    date.format("%Y/%m/%d").to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub bucket: String,
    /// Key prefix inside the bucket, ending in the date partition.
    pub prefix: String,
}

impl Destination {
    pub fn for_date(bucket: &str, base_prefix: Option<&str>, date: NaiveDate) -> Self {
        let partition = date_partition(date);
        let prefix = match base_prefix.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty()) {
            Some(base) => format!("{base}/{partition}"),
            None => partition,
        };
        Self {
            bucket: bucket.to_string(),
            prefix,
        }
    }

    pub fn uri(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.prefix)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportJobRequest {
    pub job_identifier: JobIdentifier,
    pub source_reference: ResourceReference,
    pub destination: Destination,
    /// Role the export service assumes.
    pub delegated_identity: String,
    pub encryption_key_handle: String,
    pub export_only: Vec<String>,
}

impl ExportJobRequest {
    /// Build the request for `event`. The date partition comes from `today`,
    /// never from the event.
    pub fn build(event: &SnapshotEvent, config: &ExportConfig, today: NaiveDate) -> Self {
        let source_reference = event.resource_reference.clone();
        Self {
            job_identifier: JobIdentifier::for_source(&source_reference),
            source_reference,
            destination: Destination::for_date(&config.bucket, config.base_prefix.as_deref(), today),
            delegated_identity: config.role_arn.clone(),
            encryption_key_handle: config.kms_key_id.clone(),
            export_only: config.export_only.clone(),
        }
    }
}
