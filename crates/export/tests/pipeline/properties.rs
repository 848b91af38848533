use std::sync::Arc;

use futures::future::join_all;
use serde_json::json;

use snapex_core::filter::{
    AUTOMATED_CLUSTER_SNAPSHOT_CREATED, AUTOMATED_CLUSTER_SNAPSHOT_STARTED,
    MANUAL_CLUSTER_SNAPSHOT_CREATED, MANUAL_CLUSTER_SNAPSHOT_STARTED,
};
use snapex_core::{EventError, EventFilter};
use snapex_export::{dispatch, Dispatch, RecordingExportService, TriggerError, TriggerOutcome};

use crate::common::{date, rds_event, trigger_on};

const SNAPSHOTS: &[&str] = &[
    "rds:mydb-2024-06-26-03-09",
    "rds:orders-cluster-2024-01-01-00-00",
    "rds:a",
    "nightly-manual-copy",
];

#[tokio::test]
async fn job_identifier_is_the_snapshot_name() {
    for name in SNAPSHOTS {
        let svc = Arc::new(RecordingExportService::accepting());
        let trigger = trigger_on(svc.clone(), date(2024, 6, 27));
        let event = rds_event("backup", AUTOMATED_CLUSTER_SNAPSHOT_CREATED, name);

        dispatch(&EventFilter::default(), &trigger, &event).await.unwrap();

        let calls = svc.requests();
        assert_eq!(calls.len(), 1, "{name}");
        assert_eq!(calls[0].job_identifier.as_str(), *name);
    }
}

#[tokio::test]
async fn non_admitted_events_never_call() {
    let svc = Arc::new(RecordingExportService::accepting());
    let trigger = trigger_on(svc.clone(), date(2024, 6, 27));
    let filter = EventFilter::default();

    let events = [
        rds_event("notification", AUTOMATED_CLUSTER_SNAPSHOT_CREATED, "rds:db-1"),
        rds_event("backup", AUTOMATED_CLUSTER_SNAPSHOT_STARTED, "rds:db-1"),
        rds_event("backup", MANUAL_CLUSTER_SNAPSHOT_STARTED, "manual-1"),
        rds_event("backup", MANUAL_CLUSTER_SNAPSHOT_CREATED, "manual-1"),
        rds_event("backup", "RDS-EVENT-0164", "rds:db-1"),
    ];
    for event in &events {
        assert_eq!(dispatch(&filter, &trigger, event).await.unwrap(), Dispatch::Dropped);
    }
    assert_eq!(svc.call_count(), 0);
}

#[tokio::test]
async fn redelivery_reuses_the_identifier() {
    let svc = Arc::new(RecordingExportService::deduplicating());
    let trigger = trigger_on(svc.clone(), date(2024, 6, 27));
    let event = rds_event("backup", AUTOMATED_CLUSTER_SNAPSHOT_CREATED, "rds:mydb-2024-06-26-03-09");

    let first = trigger.handle(&event).await.unwrap();
    let second = trigger.handle(&event).await.unwrap();

    let calls = svc.requests();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].job_identifier, calls[1].job_identifier);
    assert!(matches!(first, TriggerOutcome::Submitted { .. }));
    assert!(matches!(second, TriggerOutcome::Rejected { .. }));
}

#[tokio::test]
async fn concurrent_duplicates_start_one_job() {
    let svc = Arc::new(RecordingExportService::deduplicating());
    let trigger = trigger_on(svc.clone(), date(2024, 6, 27));
    let event = rds_event("backup", AUTOMATED_CLUSTER_SNAPSHOT_CREATED, "rds:mydb-2024-06-26-03-09");

    let outcomes = join_all((0..8).map(|_| trigger.handle(&event))).await;

    let submitted = outcomes
        .iter()
        .filter(|o| matches!(o, Ok(TriggerOutcome::Submitted { .. })))
        .count();
    assert_eq!(submitted, 1);
    assert_eq!(svc.call_count(), 8);
}

#[tokio::test]
async fn missing_resource_reference_is_malformed() {
    let svc = Arc::new(RecordingExportService::accepting());
    let trigger = trigger_on(svc.clone(), date(2024, 6, 27));

    let mut event = rds_event("backup", AUTOMATED_CLUSTER_SNAPSHOT_CREATED, "rds:db-1");
    event["detail"].as_object_mut().unwrap().remove("SourceArn");

    // Admitted by the filter, rejected by the decode step.
    let err = dispatch(&EventFilter::default(), &trigger, &event).await.unwrap_err();
    assert!(matches!(
        err,
        TriggerError::MalformedEvent(EventError::MissingField("detail.SourceArn"))
    ));

    let err = trigger.handle(&json!({"unrelated": true})).await.unwrap_err();
    assert!(matches!(err, TriggerError::MalformedEvent(_)));
    assert_eq!(svc.call_count(), 0);
}

#[tokio::test]
async fn partition_follows_today_not_the_event() {
    for (today, expected) in [
        (date(2024, 6, 27), "2024/06/27"),
        (date(2025, 1, 1), "2025/01/01"),
        (date(2023, 12, 31), "2023/12/31"),
    ] {
        let svc = Arc::new(RecordingExportService::accepting());
        let trigger = trigger_on(svc.clone(), today);
        // The event's own time is always 2024-06-26.
        let event = rds_event("backup", AUTOMATED_CLUSTER_SNAPSHOT_CREATED, "rds:db-1");

        trigger.handle(&event).await.unwrap();

        assert_eq!(svc.requests()[0].destination.prefix, expected);
    }
}

#[tokio::test]
async fn extra_payload_fields_are_tolerated() {
    let svc = Arc::new(RecordingExportService::accepting());
    let trigger = trigger_on(svc.clone(), date(2024, 6, 27));
    let mut event = rds_event("backup", AUTOMATED_CLUSTER_SNAPSHOT_CREATED, "rds:db-1");
    event["detail"]["SomethingNew"] = json!({"nested": [1, 2, 3]});
    event["extra"] = json!("ignored");

    assert!(trigger.handle(&event).await.is_ok());
    assert_eq!(svc.call_count(), 1);
}

#[tokio::test]
async fn admitted_event_with_oddly_typed_unused_fields_is_exported() {
    let svc = Arc::new(RecordingExportService::accepting());
    let trigger = trigger_on(svc.clone(), date(2024, 6, 27));
    let mut event = rds_event("backup", AUTOMATED_CLUSTER_SNAPSHOT_CREATED, "rds:db-1");
    event["detail"]["EventCategories"] = json!("backup");
    event["detail"]["SourceType"] = json!({"kind": "CLUSTER_SNAPSHOT"});
    event["detail"]["Message"] = json!(["not", "a", "string"]);

    let filter = EventFilter::default();
    assert!(filter.admits(&event));

    let result = dispatch(&filter, &trigger, &event).await.unwrap();

    assert!(matches!(result, Dispatch::Handled(TriggerOutcome::Submitted { .. })));
    assert_eq!(svc.call_count(), 1);
    assert_eq!(svc.requests()[0].job_identifier.as_str(), "rds:db-1");
}
