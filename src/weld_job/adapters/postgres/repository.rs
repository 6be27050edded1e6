//! `PostgreSQL` repository implementation for weld job storage.
//!
//! Every operation opens its own connection on a blocking thread and drops
//! it on return; no connection outlives a single request.

use super::{
    models::{NewWeldJobRow, WeldJobChangeset, WeldJobRow},
    schema::weld_details,
};
use crate::weld_job::{
    domain::{
        BusinessId, CompletionFlag, DeviceId, DeviceName, NewWeldJob, PersistedWeldJobData,
        SequenceId, WeldJobDetails, WeldJobRecord,
        schema::OPEN_JOB_INDEX,
    },
    ports::{WeldJobRepository, WeldJobRepositoryError, WeldJobRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

const PRIMARY_KEY_SUFFIX: &str = "_pkey";

/// `PostgreSQL`-backed weld job repository.
#[derive(Debug, Clone)]
pub struct PostgresWeldJobRepository {
    database_url: String,
}

impl PostgresWeldJobRepository {
    /// Creates a repository connecting to `database_url` per operation.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    pub(super) fn database_url(&self) -> &str {
        &self.database_url
    }

    async fn run_blocking<F, T>(&self, f: F) -> WeldJobRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> WeldJobRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let database_url = self.database_url.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = PgConnection::establish(&database_url)
                .map_err(WeldJobRepositoryError::connection)?;
            f(&mut connection)
        })
        .await
        .map_err(WeldJobRepositoryError::persistence)?
    }
}

#[async_trait]
impl WeldJobRepository for PostgresWeldJobRepository {
    async fn insert(&self, job: &NewWeldJob) -> WeldJobRepositoryResult<WeldJobRecord> {
        let new_row = to_new_row(job);
        let business_id = job.business_id().clone();
        let device_id = job.device_id().clone();

        self.run_blocking(move |connection| {
            let row = diesel::insert_into(weld_details::table)
                .values(&new_row)
                .returning(WeldJobRow::as_returning())
                .get_result::<WeldJobRow>(connection)
                .map_err(|err| map_write_error(err, Some(&business_id), &device_id))?;
            row_to_record(row)
        })
        .await
    }

    async fn update(&self, record: &WeldJobRecord) -> WeldJobRepositoryResult<()> {
        let sequence_id = record.sequence_id();
        let business_id = record.business_id().cloned();
        let device_id = record.device_id().clone();
        let changeset = to_changeset(record);

        self.run_blocking(move |connection| {
            let updated = diesel::update(weld_details::table.find(sequence_id.value()))
                .set(&changeset)
                .execute(connection)
                .map_err(|err| map_write_error(err, business_id.as_ref(), &device_id))?;
            if updated == 0 {
                return Err(WeldJobRepositoryError::NotFound(sequence_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, sequence_id: SequenceId) -> WeldJobRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(weld_details::table.find(sequence_id.value()))
                .execute(connection)
                .map_err(map_read_error)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn find_by_sequence_id(
        &self,
        sequence_id: SequenceId,
    ) -> WeldJobRepositoryResult<Option<WeldJobRecord>> {
        self.run_blocking(move |connection| {
            let row = weld_details::table
                .find(sequence_id.value())
                .select(WeldJobRow::as_select())
                .first::<WeldJobRow>(connection)
                .optional()
                .map_err(map_read_error)?;
            row.map(row_to_record).transpose()
        })
        .await
    }

    async fn find_by_business_id(
        &self,
        business_id: &BusinessId,
    ) -> WeldJobRepositoryResult<Option<WeldJobRecord>> {
        let lookup = business_id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = weld_details::table
                .filter(weld_details::business_id.eq(lookup))
                .order((
                    weld_details::created_at.asc(),
                    weld_details::sequence_id.asc(),
                ))
                .select(WeldJobRow::as_select())
                .first::<WeldJobRow>(connection)
                .optional()
                .map_err(map_read_error)?;
            row.map(row_to_record).transpose()
        })
        .await
    }

    async fn find_oldest_open(
        &self,
        device_id: &DeviceId,
    ) -> WeldJobRepositoryResult<Option<WeldJobRecord>> {
        let lookup = device_id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = weld_details::table
                .filter(weld_details::device_id.eq(lookup))
                .filter(weld_details::completion_flag.eq(CompletionFlag::No.as_str()))
                .order((
                    weld_details::created_at.asc(),
                    weld_details::sequence_id.asc(),
                ))
                .select(WeldJobRow::as_select())
                .first::<WeldJobRow>(connection)
                .optional()
                .map_err(map_read_error)?;
            row.map(row_to_record).transpose()
        })
        .await
    }

    async fn find_newest_open(
        &self,
        device_id: &DeviceId,
    ) -> WeldJobRepositoryResult<Option<WeldJobRecord>> {
        let lookup = device_id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = weld_details::table
                .filter(weld_details::device_id.eq(lookup))
                .filter(weld_details::completion_flag.eq(CompletionFlag::No.as_str()))
                .order((
                    weld_details::created_at.desc(),
                    weld_details::sequence_id.desc(),
                ))
                .select(WeldJobRow::as_select())
                .first::<WeldJobRow>(connection)
                .optional()
                .map_err(map_read_error)?;
            row.map(row_to_record).transpose()
        })
        .await
    }

    async fn find_latest_for_device(
        &self,
        device_id: &DeviceId,
    ) -> WeldJobRepositoryResult<Option<WeldJobRecord>> {
        let lookup = device_id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = weld_details::table
                .filter(weld_details::device_id.eq(lookup))
                .order((
                    weld_details::created_at.desc(),
                    weld_details::sequence_id.desc(),
                ))
                .select(WeldJobRow::as_select())
                .first::<WeldJobRow>(connection)
                .optional()
                .map_err(map_read_error)?;
            row.map(row_to_record).transpose()
        })
        .await
    }

    async fn list_by_device_name(
        &self,
        device_name: &DeviceName,
    ) -> WeldJobRepositoryResult<Vec<WeldJobRecord>> {
        let lookup = device_name.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = weld_details::table
                .filter(weld_details::device_name.eq(lookup))
                .order((
                    weld_details::created_at.desc(),
                    weld_details::sequence_id.desc(),
                ))
                .select(WeldJobRow::as_select())
                .load::<WeldJobRow>(connection)
                .map_err(map_read_error)?;
            rows.into_iter().map(row_to_record).collect()
        })
        .await
    }

    async fn business_id_exists(&self, business_id: &BusinessId) -> WeldJobRepositoryResult<bool> {
        let lookup = business_id.as_str().to_owned();
        self.run_blocking(move |connection| {
            diesel::select(diesel::dsl::exists(
                weld_details::table.filter(weld_details::business_id.eq(lookup)),
            ))
            .get_result::<bool>(connection)
            .map_err(map_read_error)
        })
        .await
    }
}

fn to_new_row(job: &NewWeldJob) -> NewWeldJobRow {
    let details = job.details().clone();
    NewWeldJobRow {
        business_id: Some(job.business_id().as_str().to_owned()),
        device_name: job.device_name().map(|name| name.as_str().to_owned()),
        device_id: job.device_id().as_str().to_owned(),
        contractor_name: details.contractor_name,
        block_number: details.block_number,
        welder_name: details.welder_name,
        badge_number: details.badge_number,
        material_type: details.material_type,
        thickness: details.thickness,
        type_of_weld: details.type_of_weld,
        no_of_passes: details.no_of_passes,
        weld_length: details.weld_length,
        current: details.current,
        voltage: details.voltage,
        travel_speed: details.travel_speed,
        filler_material: details.filler_material,
        wps_code: details.wps_code,
        remarks: details.remarks,
        completion_flag: Some(job.completion_flag().as_str().to_owned()),
        created_at: job.created_at(),
    }
}

fn to_changeset(record: &WeldJobRecord) -> WeldJobChangeset {
    let details = record.details().clone();
    WeldJobChangeset {
        business_id: record.business_id().map(|id| id.as_str().to_owned()),
        device_name: record.device_name().map(|name| name.as_str().to_owned()),
        contractor_name: details.contractor_name,
        block_number: details.block_number,
        welder_name: details.welder_name,
        badge_number: details.badge_number,
        material_type: details.material_type,
        thickness: details.thickness,
        type_of_weld: details.type_of_weld,
        no_of_passes: details.no_of_passes,
        weld_length: details.weld_length,
        current: details.current,
        voltage: details.voltage,
        travel_speed: details.travel_speed,
        filler_material: details.filler_material,
        wps_code: details.wps_code,
        remarks: details.remarks,
        completion_flag: Some(record.completion_flag().as_str().to_owned()),
    }
}

fn row_to_record(row: WeldJobRow) -> WeldJobRepositoryResult<WeldJobRecord> {
    let WeldJobRow {
        sequence_id,
        business_id: stored_business_id,
        device_name: stored_device_name,
        device_id: stored_device_id,
        contractor_name,
        block_number,
        welder_name,
        badge_number,
        material_type,
        thickness,
        type_of_weld,
        no_of_passes,
        weld_length,
        current,
        voltage,
        travel_speed,
        filler_material,
        wps_code,
        remarks,
        completion_flag: stored_flag,
        created_at,
    } = row;

    let business_id = stored_business_id
        .filter(|raw| !raw.trim().is_empty())
        .map(BusinessId::new)
        .transpose()
        .map_err(WeldJobRepositoryError::persistence)?;
    let device_name = stored_device_name
        .filter(|raw| !raw.trim().is_empty())
        .map(DeviceName::new)
        .transpose()
        .map_err(WeldJobRepositoryError::persistence)?;
    let device_id = DeviceId::new(stored_device_id).map_err(WeldJobRepositoryError::persistence)?;

    let data = PersistedWeldJobData {
        sequence_id: SequenceId::new(sequence_id),
        business_id,
        device_id,
        device_name,
        details: WeldJobDetails {
            contractor_name,
            block_number,
            welder_name,
            badge_number,
            material_type,
            thickness,
            type_of_weld,
            no_of_passes,
            weld_length,
            current,
            voltage,
            travel_speed,
            filler_material,
            wps_code,
            remarks,
        },
        completion_flag: CompletionFlag::from_stored(stored_flag.as_deref()),
        created_at,
    };
    Ok(WeldJobRecord::from_persisted(data))
}

/// Maps a failed insert or update to a repository error.
///
/// The open-job index is recognised by name. Any other unique violation,
/// apart from the primary key, is attributed to the business id when the
/// write carried one, because the guard accepts a unique constraint on that
/// column whatever it is called.
fn map_write_error(
    err: DieselError,
    business_id: Option<&BusinessId>,
    device_id: &DeviceId,
) -> WeldJobRepositoryError {
    let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &err else {
        return map_read_error(err);
    };
    let violated = violated_constraint(info.as_ref());
    match (violated.as_deref(), business_id) {
        (Some(OPEN_JOB_INDEX), _) => WeldJobRepositoryError::OpenJobConflict(device_id.clone()),
        (Some(name), _) if name.ends_with(PRIMARY_KEY_SUFFIX) => map_read_error(err),
        (_, Some(id)) => WeldJobRepositoryError::DuplicateBusinessId(id.clone()),
        (_, None) => map_read_error(err),
    }
}

fn map_read_error(err: DieselError) -> WeldJobRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            WeldJobRepositoryError::connection(err)
        }
        other => WeldJobRepositoryError::persistence(other),
    }
}

fn violated_constraint(info: &dyn DatabaseErrorInformation) -> Option<String> {
    info.constraint_name().map(str::to_owned)
}
