use std::sync::Arc;

use snapex_core::filter::{AUTOMATED_CLUSTER_SNAPSHOT_CREATED, AUTOMATED_CLUSTER_SNAPSHOT_STARTED};
use snapex_core::EventFilter;
use snapex_export::{
    dispatch, Dispatch, ExportJobResult, RecordingExportService, TriggerOutcome, DUPLICATE_JOB_CODE,
};

use crate::common::{date, rds_event, snapshot_arn, trigger_on};

#[tokio::test]
async fn automated_snapshot_completed_starts_one_export() {
    let svc = Arc::new(RecordingExportService::accepting());
    let trigger = trigger_on(svc.clone(), date(2024, 6, 27));
    let event = rds_event("backup", AUTOMATED_CLUSTER_SNAPSHOT_CREATED, "rds:mydb-2024-06-26-03-09");

    let result = dispatch(&EventFilter::default(), &trigger, &event).await.unwrap();

    assert!(matches!(result, Dispatch::Handled(TriggerOutcome::Submitted { .. })));
    let calls = svc.requests();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].job_identifier.as_str(), "rds:mydb-2024-06-26-03-09");
    assert_eq!(calls[0].destination.prefix, "2024/06/27");
    assert_eq!(calls[0].destination.bucket, "db-backups");
    assert_eq!(calls[0].source_reference.as_str(), snapshot_arn("rds:mydb-2024-06-26-03-09"));
}

#[tokio::test]
async fn creation_started_starts_nothing() {
    let svc = Arc::new(RecordingExportService::accepting());
    let trigger = trigger_on(svc.clone(), date(2024, 6, 27));
    let event = rds_event("backup", AUTOMATED_CLUSTER_SNAPSHOT_STARTED, "rds:mydb-2024-06-26-03-09");

    let result = dispatch(&EventFilter::default(), &trigger, &event).await.unwrap();

    assert_eq!(result, Dispatch::Dropped);
    assert_eq!(svc.call_count(), 0);
}

#[tokio::test]
async fn duplicate_rejection_is_logged_and_final() {
    let svc = Arc::new(RecordingExportService::scripted(vec![Ok(ExportJobResult::Rejected {
        code: DUPLICATE_JOB_CODE.into(),
        reason: "duplicate job identifier".into(),
    })]));
    let trigger = trigger_on(svc.clone(), date(2024, 6, 27));
    let event = rds_event("backup", AUTOMATED_CLUSTER_SNAPSHOT_CREATED, "rds:mydb-2024-06-26-03-09");

    let outcome = trigger.handle(&event).await.unwrap();

    match outcome {
        TriggerOutcome::Rejected { code, reason, .. } => {
            assert_eq!(code, DUPLICATE_JOB_CODE);
            assert_eq!(reason, "duplicate job identifier");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert_eq!(svc.call_count(), 1);
}
