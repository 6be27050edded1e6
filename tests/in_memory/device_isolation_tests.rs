//! Open-job bookkeeping across several devices.

use std::collections::BTreeSet;

use super::helpers::{MemoryContext, context, device, device_name};
use rstest::rstest;
use weldtrack::weld_job::{
    domain::LastJobStatus,
    ports::WeldJobRepository,
    services::{RegisterWeldJobRequest, RegistrationDisposition},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completing_one_device_leaves_others_open(context: MemoryContext) {
    let MemoryContext { service, .. } = context;
    let left = service
        .register(RegisterWeldJobRequest::new("BAY-1"))
        .await
        .expect("registration should succeed");
    let right = service
        .register(RegisterWeldJobRequest::new("BAY-2"))
        .await
        .expect("registration should succeed");

    let completed = service
        .complete(&device("BAY-1"))
        .await
        .expect("completion should succeed");

    assert_eq!(completed, Some(left.sequence_id));
    assert_eq!(
        service
            .last_job_status(&device("BAY-1"))
            .await
            .expect("status lookup should succeed"),
        LastJobStatus::Completed
    );
    assert_eq!(
        service
            .last_job_status(&device("BAY-2"))
            .await
            .expect("status lookup should succeed"),
        LastJobStatus::Open
    );
    let resumed = service
        .register(RegisterWeldJobRequest::new("BAY-2"))
        .await
        .expect("registration should succeed");
    assert_eq!(resumed.sequence_id, right.sequence_id);
    assert_eq!(resumed.disposition, RegistrationDisposition::Resumed);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn every_created_job_gets_a_distinct_business_id(context: MemoryContext) {
    let MemoryContext { service, .. } = context;
    let mut seen = BTreeSet::new();

    for bay in 0..25 {
        let device_id = format!("BAY-{bay}");
        let outcome = service
            .register(RegisterWeldJobRequest::new(device_id.as_str()))
            .await
            .expect("registration should succeed");
        service
            .complete(&device(&device_id))
            .await
            .expect("completion should succeed");
        let second = service
            .register(RegisterWeldJobRequest::new(device_id.as_str()))
            .await
            .expect("registration should succeed");

        assert!(seen.insert(outcome.business_id.as_str().to_owned()));
        assert!(seen.insert(second.business_id.as_str().to_owned()));
    }

    assert_eq!(seen.len(), 50);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_registrations_keep_one_open_job(context: MemoryContext) {
    let MemoryContext {
        repository,
        service,
    } = context;
    let request = || RegisterWeldJobRequest::new("BAY-9").with_device_name("Line 9");

    let first = service
        .register(request())
        .await
        .expect("first registration should succeed");
    let second = service
        .register(request())
        .await
        .expect("second registration should succeed");

    assert_eq!(second.sequence_id, first.sequence_id);
    let open = repository
        .list_by_device_name(&device_name("Line 9"))
        .await
        .expect("listing should succeed")
        .into_iter()
        .filter(|record| record.is_open())
        .count();
    assert_eq!(open, 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn device_name_lookup_follows_newest_record(context: MemoryContext) {
    let MemoryContext { service, .. } = context;
    service
        .register(RegisterWeldJobRequest::new("OLD-UNIT").with_device_name("Station A"))
        .await
        .expect("registration should succeed");
    service
        .complete(&device("OLD-UNIT"))
        .await
        .expect("completion should succeed");
    service
        .register(RegisterWeldJobRequest::new("NEW-UNIT").with_device_name("Station A"))
        .await
        .expect("registration should succeed");

    let latest = service
        .latest_device_id_for_name(&device_name("Station A"))
        .await
        .expect("lookup should succeed");

    assert_eq!(latest, Some(device("NEW-UNIT")));
}
