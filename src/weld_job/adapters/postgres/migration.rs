//! Schema guard executor for `PostgreSQL`.
//!
//! Introspects `information_schema` into a [`TableSnapshot`], plans the
//! missing steps and runs each one as its own auto-committed statement.

use super::{
    PostgresWeldJobRepository,
    models::{ColumnRow, CountRow},
};
use crate::weld_job::{
    domain::{
        SchemaStep, TableSnapshot, plan_schema_steps,
        schema::{
            BUSINESS_ID_COLUMN, BUSINESS_ID_UNIQUE_CONSTRAINT, COMPLETION_FLAG_COLUMN,
            DEVICE_ID_COLUMN, DEVICE_NAME_COLUMN, OPEN_JOB_INDEX, TABLE_NAME, business_id_width,
        },
    },
    ports::{SchemaGuardError, SchemaReport, SchemaWarning, WeldJobSchema},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::Text;
use std::sync::Arc;
use tracing::{info, warn};

#[async_trait]
impl WeldJobSchema for PostgresWeldJobRepository {
    async fn ensure_schema(&self) -> Result<SchemaReport, SchemaGuardError> {
        let database_url = self.database_url().to_owned();
        tokio::task::spawn_blocking(move || {
            let mut connection = PgConnection::establish(&database_url)
                .map_err(|err| SchemaGuardError::Connection(Arc::new(err)))?;
            run_guard(&mut connection)
        })
        .await
        .map_err(|err| SchemaGuardError::Inspect(Arc::new(err)))?
    }
}

fn run_guard(connection: &mut PgConnection) -> Result<SchemaReport, SchemaGuardError> {
    let snapshot = inspect(connection)?;
    let mut report = SchemaReport::default();

    for step in plan_schema_steps(&snapshot) {
        match execute_step(connection, &step) {
            Ok(()) => {
                info!(step = %step, "applied schema step");
                report.applied.push(step);
            }
            Err(err) if step.is_soft() => {
                warn!(step = %step, error = %err, "schema step skipped");
                report.warnings.push(SchemaWarning {
                    step,
                    reason: err.to_string(),
                });
            }
            Err(err) => {
                return Err(SchemaGuardError::Step {
                    step,
                    cause: Arc::new(err),
                });
            }
        }
    }
    Ok(report)
}

fn execute_step(connection: &mut PgConnection, step: &SchemaStep) -> QueryResult<()> {
    diesel::sql_query(step_statement(step))
        .execute(connection)
        .map(|_| ())
}

fn step_statement(step: &SchemaStep) -> String {
    let width = business_id_width();
    match step {
        SchemaStep::CreateTable => format!(
            "CREATE TABLE IF NOT EXISTS {TABLE_NAME} (\
             sequence_id SERIAL PRIMARY KEY, \
             {BUSINESS_ID_COLUMN} CHAR({width}), \
             {DEVICE_NAME_COLUMN} VARCHAR(50), \
             {DEVICE_ID_COLUMN} VARCHAR(50) NOT NULL, \
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
             {COMPLETION_FLAG_COLUMN} VARCHAR(3) DEFAULT 'NO', \
             created_at TIMESTAMPTZ NOT NULL DEFAULT now(), \
             CONSTRAINT {BUSINESS_ID_UNIQUE_CONSTRAINT} UNIQUE ({BUSINESS_ID_COLUMN}))"
        ),
        SchemaStep::RenameLegacyDeviceColumn { from } => format!(
            "ALTER TABLE {TABLE_NAME} RENAME COLUMN {from} TO {DEVICE_ID_COLUMN}"
        ),
        SchemaStep::AddDeviceName => format!(
            "ALTER TABLE {TABLE_NAME} ADD COLUMN IF NOT EXISTS {DEVICE_NAME_COLUMN} VARCHAR(50)"
        ),
        SchemaStep::AddCompletionFlag => format!(
            "ALTER TABLE {TABLE_NAME} ADD COLUMN IF NOT EXISTS {COMPLETION_FLAG_COLUMN} \
             VARCHAR(3) DEFAULT 'NO'"
        ),
        SchemaStep::ResizeBusinessId { .. } => format!(
            "ALTER TABLE {TABLE_NAME} ALTER COLUMN {BUSINESS_ID_COLUMN} TYPE CHAR({width}) \
             USING left(btrim({BUSINESS_ID_COLUMN}::text), {width})"
        ),
        SchemaStep::AddBusinessIdUnique => format!(
            "ALTER TABLE {TABLE_NAME} ADD CONSTRAINT {BUSINESS_ID_UNIQUE_CONSTRAINT} \
             UNIQUE ({BUSINESS_ID_COLUMN})"
        ),
        SchemaStep::AddOpenJobIndex => format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS {OPEN_JOB_INDEX} ON {TABLE_NAME} \
             ({DEVICE_ID_COLUMN}) WHERE {COMPLETION_FLAG_COLUMN} = 'NO'"
        ),
    }
}

fn inspect(connection: &mut PgConnection) -> Result<TableSnapshot, SchemaGuardError> {
    let inspect_err = |err: diesel::result::Error| SchemaGuardError::Inspect(Arc::new(err));

    let tables = diesel::sql_query(
        "SELECT COUNT(*) AS count FROM information_schema.tables \
         WHERE table_schema = current_schema() AND table_name = $1",
    )
    .bind::<Text, _>(TABLE_NAME)
    .get_result::<CountRow>(connection)
    .map_err(inspect_err)?;
    if tables.count == 0 {
        return Ok(TableSnapshot::missing());
    }

    let columns = diesel::sql_query(
        "SELECT column_name::text AS column_name, \
         character_maximum_length::int4 AS max_length \
         FROM information_schema.columns \
         WHERE table_schema = current_schema() AND table_name = $1",
    )
    .bind::<Text, _>(TABLE_NAME)
    .load::<ColumnRow>(connection)
    .map_err(inspect_err)?;

    let unique = diesel::sql_query(
        "SELECT COUNT(*) AS count \
         FROM information_schema.table_constraints tc \
         JOIN information_schema.constraint_column_usage ccu \
           ON tc.constraint_name = ccu.constraint_name \
          AND tc.table_schema = ccu.table_schema \
         WHERE tc.table_schema = current_schema() \
           AND tc.table_name = $1 \
           AND tc.constraint_type = 'UNIQUE' \
           AND ccu.column_name = $2",
    )
    .bind::<Text, _>(TABLE_NAME)
    .bind::<Text, _>(BUSINESS_ID_COLUMN)
    .get_result::<CountRow>(connection)
    .map_err(inspect_err)?;

    let index = diesel::sql_query(
        "SELECT COUNT(*) AS count FROM pg_indexes \
         WHERE schemaname = current_schema() AND tablename = $1 AND indexname = $2",
    )
    .bind::<Text, _>(TABLE_NAME)
    .bind::<Text, _>(OPEN_JOB_INDEX)
    .get_result::<CountRow>(connection)
    .map_err(inspect_err)?;

    Ok(TableSnapshot {
        table_exists: true,
        columns: columns
            .into_iter()
            .map(|column| (column.column_name, column.max_length))
            .collect(),
        business_id_unique: unique.count > 0,
        open_job_index: index.count > 0,
    })
}
