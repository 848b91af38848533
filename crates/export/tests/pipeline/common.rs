//! Shared fixtures.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::{json, Value};

use snapex_core::{ExportConfig, FixedClock};
use snapex_export::{ExportTrigger, RecordingExportService};

pub const ACCOUNT_PREFIX: &str = "arn:aws:rds:ap-southeast-1:123456789012";

pub fn snapshot_arn(name: &str) -> String {
    format!("{ACCOUNT_PREFIX}:cluster-snapshot:{name}")
}

pub fn export_config() -> ExportConfig {
    ExportConfig {
        bucket: "db-backups".into(),
        base_prefix: None,
        role_arn: "arn:aws:iam::123456789012:role/rds-s3-export".into(),
        kms_key_id: "arn:aws:kms:ap-southeast-1:123456789012:key/1234abcd".into(),
        export_only: vec![],
        timeout_seconds: 10,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn trigger_on(
    service: Arc<RecordingExportService>,
    today: NaiveDate,
) -> ExportTrigger<RecordingExportService> {
    ExportTrigger::new(service, export_config())
        .unwrap()
        .with_clock(Arc::new(FixedClock(today)))
}

/// A full bus event as delivered for an RDS cluster snapshot.
pub fn rds_event(category: &str, code: &str, snapshot: &str) -> Value {
    let arn = snapshot_arn(snapshot);
    json!({
        "version": "0",
        "id": "c3b2f5a4-6b6e-4f6a-9d9b-0f1f2e3d4c5b",
        "detail-type": "RDS DB Cluster Snapshot Event",
        "source": "aws.rds",
        "account": "123456789012",
        "time": "2024-06-26T03:20:11Z",
        "region": "ap-southeast-1",
        "resources": [arn],
        "detail": {
            "EventCategories": [category],
            "SourceType": "CLUSTER_SNAPSHOT",
            "SourceArn": arn,
            "Date": "2024-06-26T03:20:11.123Z",
            "Message": "Automated cluster snapshot created",
            "SourceIdentifier": snapshot,
            "EventID": code
        }
    })
}
