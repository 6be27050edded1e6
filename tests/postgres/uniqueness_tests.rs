//! Constraint enforcement by `PostgreSQL`.

use std::sync::Arc;

use super::helpers::migrated_schema;
use mockable::DefaultClock;
use rstest::rstest;
use weldtrack::weld_job::{
    domain::{BusinessId, DeviceId, DeviceName, NewWeldJob, WeldJobDetails},
    ports::{WeldJobRepository, WeldJobRepositoryError, WeldJobSchema},
    services::{RegisterWeldJobRequest, WeldJobLifecycleError},
};

fn job(business_id: &str, device: &str) -> NewWeldJob {
    NewWeldJob::new(
        BusinessId::new(business_id).expect("valid business id"),
        DeviceId::new(device).expect("valid device id"),
        None,
        WeldJobDetails::default(),
        &DefaultClock,
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_business_id_is_reported() {
    let Some(schema) = migrated_schema().await else {
        return;
    };
    let service = schema.service();
    service
        .register(RegisterWeldJobRequest::new("BAY-1").with_business_id("TAKEN"))
        .await
        .expect("first registration should succeed");

    let err = service
        .register(RegisterWeldJobRequest::new("BAY-2").with_business_id("TAKEN"))
        .await
        .expect_err("second holder of the identifier should be rejected");

    assert!(err.is_unique_violation());
    assert!(matches!(
        err,
        WeldJobLifecycleError::Repository(WeldJobRepositoryError::DuplicateBusinessId(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_open_job_for_device_is_rejected() {
    let Some(schema) = migrated_schema().await else {
        return;
    };
    let repository = schema.repository();
    repository
        .insert(&job("FIRST", "BAY-4"))
        .await
        .expect("first insert should succeed");

    let result = repository.insert(&job("SECND", "BAY-4")).await;

    assert!(
        matches!(result, Err(WeldJobRepositoryError::OpenJobConflict(ref device)) if device.as_str() == "BAY-4"),
        "unexpected result: {result:?}"
    );
    assert!(
        !repository
            .business_id_exists(&BusinessId::new("SECND").expect("valid business id"))
            .await
            .expect("lookup should succeed")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_is_reported_under_a_differently_named_constraint() {
    let Some(schema) = migrated_schema().await else {
        return;
    };
    schema.execute(
        "ALTER TABLE weld_details DROP CONSTRAINT weld_details_business_id_key; \
         ALTER TABLE weld_details ADD CONSTRAINT unique_uniq_id UNIQUE (business_id)",
    );
    let report = schema
        .repository()
        .ensure_schema()
        .await
        .expect("guard should accept the renamed constraint");
    assert!(report.is_noop(), "guard applied {:?}", report.applied);

    let service = schema.service();
    service
        .register(RegisterWeldJobRequest::new("BAY-5").with_business_id("TWICE"))
        .await
        .expect("first registration should succeed");
    let err = service
        .register(RegisterWeldJobRequest::new("BAY-6").with_business_id("TWICE"))
        .await
        .expect_err("second holder of the identifier should be rejected");

    assert!(err.is_unique_violation(), "unexpected failure: {err}");
    assert!(matches!(
        err,
        WeldJobLifecycleError::Repository(WeldJobRepositoryError::DuplicateBusinessId(ref id))
            if id.as_str() == "TWICE"
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn racing_registrations_leave_one_open_job() {
    let Some(schema) = migrated_schema().await else {
        return;
    };
    let service = Arc::new(schema.service());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let worker = Arc::clone(&service);
            tokio::spawn(async move {
                worker
                    .register(RegisterWeldJobRequest::new("BAY-9").with_device_name("Line 9"))
                    .await
            })
        })
        .collect();

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.expect("registration task should not panic") {
            Ok(_) => succeeded += 1,
            Err(err) => assert!(err.is_unique_violation(), "unexpected failure: {err}"),
        }
    }
    assert!(succeeded >= 1);

    let open = service
        .list_by_device_name(&DeviceName::new("Line 9").expect("valid device name"))
        .await
        .expect("listing should succeed")
        .into_iter()
        .filter(|record| record.is_open())
        .count();
    assert_eq!(open, 1);
}
