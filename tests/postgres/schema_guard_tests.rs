//! Schema guard runs against real `PostgreSQL` catalogs.

use super::helpers::TestSchema;
use rstest::rstest;
use weldtrack::weld_job::{
    domain::SchemaStep,
    ports::WeldJobSchema,
    services::{RegisterWeldJobRequest, RegistrationDisposition},
};

const LEGACY_TABLE_SQL: &str = "CREATE TABLE weld_details (\
    sequence_id SERIAL PRIMARY KEY, \
    business_id VARCHAR(10), \
    deviceid VARCHAR(50) NOT NULL, \
    contractor_name VARCHAR(100), \
    block_number VARCHAR(50), \
    welder_name VARCHAR(100), \
    badge_number VARCHAR(50), \
    material_type VARCHAR(100), \
    thickness INTEGER, \
    type_of_weld VARCHAR(10), \
    no_of_passes INTEGER, \
    weld_length INTEGER, \
    current INTEGER, \
    voltage INTEGER, \
    travel_speed INTEGER, \
    filler_material VARCHAR(100), \
    wps_code VARCHAR(100), \
    remarks TEXT, \
    created_at TIMESTAMPTZ NOT NULL DEFAULT now())";

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn guard_creates_table_and_is_idempotent() {
    let Some(schema) = TestSchema::create() else {
        return;
    };
    let repository = schema.repository();

    let first = repository
        .ensure_schema()
        .await
        .expect("first guard run should succeed");
    let second = repository
        .ensure_schema()
        .await
        .expect("second guard run should succeed");

    assert_eq!(
        first.applied,
        vec![SchemaStep::CreateTable, SchemaStep::AddOpenJobIndex]
    );
    assert!(second.is_noop(), "second run applied {:?}", second.applied);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn guard_upgrades_legacy_table() {
    let Some(schema) = TestSchema::create() else {
        return;
    };
    schema.execute(LEGACY_TABLE_SQL);
    schema.execute("INSERT INTO weld_details (business_id, deviceid) VALUES ('ABCDE', 'BAY-1')");

    let report = schema
        .repository()
        .ensure_schema()
        .await
        .expect("guard should succeed");

    assert_eq!(
        report.applied,
        vec![
            SchemaStep::RenameLegacyDeviceColumn {
                from: "deviceid".to_owned(),
            },
            SchemaStep::AddDeviceName,
            SchemaStep::AddCompletionFlag,
            SchemaStep::ResizeBusinessId { from: Some(10) },
            SchemaStep::AddBusinessIdUnique,
            SchemaStep::AddOpenJobIndex,
        ]
    );

    let outcome = schema
        .service()
        .register(RegisterWeldJobRequest::new("BAY-1"))
        .await
        .expect("registration should succeed");
    assert_eq!(outcome.disposition, RegistrationDisposition::Resumed);
    assert_eq!(outcome.business_id.as_str(), "ABCDE");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_data_turns_constraints_into_warnings() {
    let Some(schema) = TestSchema::create() else {
        return;
    };
    schema.execute(LEGACY_TABLE_SQL);
    schema.execute(
        "INSERT INTO weld_details (business_id, deviceid) \
         VALUES ('DUPED', 'BAY-1'), ('DUPED', 'BAY-1')",
    );

    let report = schema
        .repository()
        .ensure_schema()
        .await
        .expect("soft failures should not abort the guard");

    let skipped: Vec<SchemaStep> = report
        .warnings
        .iter()
        .map(|warning| warning.step.clone())
        .collect();
    assert_eq!(
        skipped,
        vec![SchemaStep::AddBusinessIdUnique, SchemaStep::AddOpenJobIndex]
    );
    assert!(
        report
            .applied
            .contains(&SchemaStep::ResizeBusinessId { from: Some(10) })
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn guard_truncates_overlong_legacy_identifiers() {
    let Some(schema) = TestSchema::create() else {
        return;
    };
    schema.execute(&LEGACY_TABLE_SQL.replacen(
        "business_id VARCHAR(10)",
        "business_id VARCHAR(8)",
        1,
    ));
    schema.execute("INSERT INTO weld_details (business_id, deviceid) VALUES ('ABCDEFGH', 'BAY-3')");

    let report = schema
        .repository()
        .ensure_schema()
        .await
        .expect("guard should resize a column holding long values");
    assert!(
        report
            .applied
            .contains(&SchemaStep::ResizeBusinessId { from: Some(8) })
    );

    let outcome = schema
        .service()
        .register(RegisterWeldJobRequest::new("BAY-3"))
        .await
        .expect("registration should succeed");
    assert_eq!(outcome.disposition, RegistrationDisposition::Resumed);
    assert_eq!(outcome.business_id.as_str(), "ABCDE");
}
