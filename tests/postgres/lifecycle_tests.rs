//! Weld job lifecycle against `PostgreSQL`.

use super::helpers::migrated_schema;
use rstest::rstest;
use weldtrack::weld_job::{
    domain::{BusinessId, DeviceId, DeviceName, LastJobStatus, WeldJobDetails},
    services::{EditWeldJobRequest, RegisterWeldJobRequest, RegistrationDisposition},
};

fn device(raw: &str) -> DeviceId {
    DeviceId::new(raw).expect("valid device id")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_resume_complete_cycle() {
    let Some(schema) = migrated_schema().await else {
        return;
    };
    let service = schema.service();

    let created = service
        .register(RegisterWeldJobRequest::new("BAY-7").with_device_name("Line 7"))
        .await
        .expect("registration should succeed");
    let resumed = service
        .register(RegisterWeldJobRequest::new("BAY-7").with_details(WeldJobDetails {
            welder_name: Some("R. Osei".to_owned()),
            current: Some(180),
            ..WeldJobDetails::default()
        }))
        .await
        .expect("registration should succeed");

    assert_eq!(created.disposition, RegistrationDisposition::Created);
    assert_eq!(resumed.disposition, RegistrationDisposition::Resumed);
    assert_eq!(resumed.sequence_id, created.sequence_id);
    assert_eq!(resumed.business_id, created.business_id);

    let stored = service
        .find(created.sequence_id)
        .await
        .expect("lookup should succeed")
        .expect("registered record should exist");
    assert_eq!(stored.details().current, Some(180));
    assert_eq!(stored.device_name().map(DeviceName::as_str), Some("Line 7"));

    let completed = service
        .complete(&device("BAY-7"))
        .await
        .expect("completion should succeed");
    assert_eq!(completed, Some(created.sequence_id));
    assert_eq!(
        service
            .last_job_status(&device("BAY-7"))
            .await
            .expect("status lookup should succeed"),
        LastJobStatus::Completed
    );
    assert_eq!(
        service
            .complete(&device("BAY-7"))
            .await
            .expect("completion should succeed"),
        None
    );

    let next = service
        .register(RegisterWeldJobRequest::new("BAY-7"))
        .await
        .expect("registration should succeed");
    assert_eq!(next.disposition, RegistrationDisposition::Created);
    assert_ne!(next.business_id, created.business_id);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edit_clear_and_delete_by_identity() {
    let Some(schema) = migrated_schema().await else {
        return;
    };
    let service = schema.service();
    let created = service
        .register(RegisterWeldJobRequest::new("BAY-3"))
        .await
        .expect("registration should succeed");

    let edited = service
        .edit(
            created.sequence_id,
            EditWeldJobRequest::new(WeldJobDetails {
                remarks: Some("porosity at root".to_owned()),
                ..WeldJobDetails::default()
            }),
        )
        .await
        .expect("edit should succeed")
        .expect("edited record should exist");
    assert_eq!(edited.details().remarks.as_deref(), Some("porosity at root"));
    assert_eq!(edited.business_id(), Some(&created.business_id));

    let cleared = service
        .clear(created.sequence_id)
        .await
        .expect("clear should succeed")
        .expect("cleared record should exist");
    assert!(cleared.details().is_empty());
    assert!(!cleared.is_open());

    assert!(
        service
            .delete(created.sequence_id)
            .await
            .expect("delete should succeed")
    );
    assert!(
        !service
            .delete(created.sequence_id)
            .await
            .expect("delete should succeed")
    );
    assert!(
        service
            .find(created.sequence_id)
            .await
            .expect("lookup should succeed")
            .is_none()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_by_name_is_newest_first() {
    let Some(schema) = migrated_schema().await else {
        return;
    };
    let service = schema.service();
    let older = service
        .register(RegisterWeldJobRequest::new("OLD-UNIT").with_device_name("Station B"))
        .await
        .expect("registration should succeed");
    service
        .complete(&device("OLD-UNIT"))
        .await
        .expect("completion should succeed");
    let newer = service
        .register(RegisterWeldJobRequest::new("NEW-UNIT").with_device_name("Station B"))
        .await
        .expect("registration should succeed");

    let name = DeviceName::new("Station B").expect("valid device name");
    let listed: Vec<_> = service
        .list_by_device_name(&name)
        .await
        .expect("listing should succeed")
        .iter()
        .map(weldtrack::weld_job::domain::WeldJobRecord::sequence_id)
        .collect();

    assert_eq!(listed, vec![newer.sequence_id, older.sequence_id]);
    assert_eq!(
        service
            .latest_device_id_for_name(&name)
            .await
            .expect("lookup should succeed"),
        Some(device("NEW-UNIT"))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn record_is_found_by_business_id() {
    let Some(schema) = migrated_schema().await else {
        return;
    };
    let service = schema.service();
    let created = service
        .register(RegisterWeldJobRequest::new("BAY-2").with_business_id("LOOKS"))
        .await
        .expect("registration should succeed");

    let found = service
        .find_by_business_id(&BusinessId::new("LOOKS").expect("valid business id"))
        .await
        .expect("lookup should succeed")
        .expect("record should exist");
    assert_eq!(found.sequence_id(), created.sequence_id);
    assert_eq!(found.device_id(), &device("BAY-2"));

    let missing = service
        .find_by_business_id(&BusinessId::new("NOONE").expect("valid business id"))
        .await
        .expect("lookup should succeed");
    assert!(missing.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lowercase_stored_flag_reads_as_completed() {
    let Some(schema) = migrated_schema().await else {
        return;
    };
    schema.execute(
        "INSERT INTO weld_details (business_id, device_id, completion_flag) \
         VALUES ('LOWER', 'BAY-8', 'no')",
    );
    let service = schema.service();

    let status = service
        .last_job_status(&device("BAY-8"))
        .await
        .expect("status lookup should succeed");
    assert_eq!(status, LastJobStatus::Completed);

    let outcome = service
        .register(RegisterWeldJobRequest::new("BAY-8"))
        .await
        .expect("registration should succeed");
    assert_eq!(outcome.disposition, RegistrationDisposition::Created);
    assert_ne!(outcome.business_id.as_str(), "LOWER");
}
