//! Schema guard behaviour observed through the lifecycle service.

use super::helpers::MemoryContext;
use rstest::rstest;
use weldtrack::weld_job::{
    domain::{
        SchemaStep, TableSnapshot,
        schema::{BUSINESS_ID_COLUMN, COMPLETION_FLAG_COLUMN, DEVICE_ID_COLUMN, DEVICE_NAME_COLUMN},
    },
    services::{RegisterWeldJobRequest, RegistrationDisposition, WeldJobLifecycleError},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn registration_works_once_guard_has_created_table() {
    let MemoryContext { service, .. } = MemoryContext::with_schema(TableSnapshot::missing());

    let before = service.register(RegisterWeldJobRequest::new("BAY-1")).await;
    assert!(matches!(before, Err(WeldJobLifecycleError::Repository(_))));

    service
        .ensure_schema()
        .await
        .expect("schema guard should succeed");
    let after = service
        .register(RegisterWeldJobRequest::new("BAY-1"))
        .await
        .expect("registration should succeed");

    assert_eq!(after.disposition, RegistrationDisposition::Created);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn legacy_table_is_upgraded_in_order() {
    let legacy = TableSnapshot::current()
        .without_column(DEVICE_ID_COLUMN)
        .without_column(DEVICE_NAME_COLUMN)
        .without_column(COMPLETION_FLAG_COLUMN)
        .with_column("machine_id", Some(50))
        .with_column(BUSINESS_ID_COLUMN, Some(10))
        .with_constraints(false, false);
    let MemoryContext {
        repository,
        service,
    } = MemoryContext::with_schema(legacy);

    let report = service
        .ensure_schema()
        .await
        .expect("schema guard should succeed");

    assert_eq!(
        report.applied,
        vec![
            SchemaStep::RenameLegacyDeviceColumn {
                from: "machine_id".to_owned(),
            },
            SchemaStep::AddDeviceName,
            SchemaStep::AddCompletionFlag,
            SchemaStep::ResizeBusinessId { from: Some(10) },
            SchemaStep::AddBusinessIdUnique,
            SchemaStep::AddOpenJobIndex,
        ]
    );
    assert!(report.warnings.is_empty());
    assert_eq!(
        repository.schema_snapshot().expect("snapshot should load"),
        TableSnapshot::current()
    );
    assert!(
        service
            .ensure_schema()
            .await
            .expect("schema guard should succeed")
            .is_noop()
    );
}
