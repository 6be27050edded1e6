//! In-memory weld job store for lifecycle tests.
//!
//! The store tracks a [`TableSnapshot`] alongside its rows so the schema
//! guard can be exercised without a database: uniqueness is only enforced
//! once the matching constraint exists, exactly as the table would behave.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};

use crate::weld_job::{
    domain::{
        BusinessId, DeviceId, DeviceName, NewWeldJob, SchemaStep, SequenceId, TableSnapshot,
        WeldJobRecord, plan_schema_steps, schema::TABLE_NAME,
    },
    ports::{
        SchemaGuardError, SchemaReport, SchemaWarning, WeldJobRepository, WeldJobRepositoryError,
        WeldJobRepositoryResult, WeldJobSchema,
    },
};

/// Thread-safe in-memory weld job repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWeldJobRepository {
    state: Arc<RwLock<InMemoryWeldJobState>>,
}

#[derive(Debug)]
struct InMemoryWeldJobState {
    records: BTreeMap<SequenceId, WeldJobRecord>,
    next_sequence: i32,
    schema: TableSnapshot,
}

impl Default for InMemoryWeldJobState {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
            next_sequence: 1,
            schema: TableSnapshot::current(),
        }
    }
}

impl InMemoryWeldJobRepository {
    /// Creates an empty repository whose table already has the current shape.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty repository starting from the given table shape.
    #[must_use]
    pub fn with_schema(schema: TableSnapshot) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryWeldJobState {
                schema,
                ..InMemoryWeldJobState::default()
            })),
        }
    }

    /// Returns the current table shape.
    ///
    /// # Errors
    ///
    /// Returns [`WeldJobRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn schema_snapshot(&self) -> WeldJobRepositoryResult<TableSnapshot> {
        Ok(self.read()?.schema.clone())
    }

    fn read(&self) -> WeldJobRepositoryResult<RwLockReadGuard<'_, InMemoryWeldJobState>> {
        self.state
            .read()
            .map_err(|err| WeldJobRepositoryError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> WeldJobRepositoryResult<RwLockWriteGuard<'_, InMemoryWeldJobState>> {
        self.state
            .write()
            .map_err(|err| WeldJobRepositoryError::persistence(std::io::Error::other(err.to_string())))
    }
}

fn missing_table() -> WeldJobRepositoryError {
    WeldJobRepositoryError::persistence(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("relation \"{TABLE_NAME}\" does not exist"),
    ))
}

impl InMemoryWeldJobState {
    fn require_table(&self) -> WeldJobRepositoryResult<()> {
        if self.schema.table_exists {
            Ok(())
        } else {
            Err(missing_table())
        }
    }

    /// Checks the constraints the table currently carries against a row
    /// about to be written under `sequence_id`.
    fn check_constraints(
        &self,
        sequence_id: Option<SequenceId>,
        business_id: Option<&BusinessId>,
        device_id: &DeviceId,
        is_open: bool,
    ) -> WeldJobRepositoryResult<()> {
        let others = || {
            self.records
                .values()
                .filter(move |record| Some(record.sequence_id()) != sequence_id)
        };
        if self.schema.business_id_unique {
            if let Some(candidate) = business_id {
                if others().any(|record| record.business_id() == Some(candidate)) {
                    return Err(WeldJobRepositoryError::DuplicateBusinessId(
                        candidate.clone(),
                    ));
                }
            }
        }
        if self.schema.open_job_index
            && is_open
            && others().any(|record| record.is_open() && record.device_id() == device_id)
        {
            return Err(WeldJobRepositoryError::OpenJobConflict(device_id.clone()));
        }
        Ok(())
    }

    fn open_for_device<'a>(
        &'a self,
        device_id: &'a DeviceId,
    ) -> impl Iterator<Item = &'a WeldJobRecord> + 'a {
        self.records
            .values()
            .filter(move |record| record.is_open() && record.device_id() == device_id)
    }

    fn duplicate_business_ids(&self) -> Vec<BusinessId> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for business_id in self.records.values().filter_map(WeldJobRecord::business_id) {
            if !seen.insert(business_id) && !duplicates.contains(business_id) {
                duplicates.push(business_id.clone());
            }
        }
        duplicates
    }

    fn devices_with_several_open_jobs(&self) -> Vec<DeviceId> {
        let mut seen = HashSet::new();
        let mut conflicting = Vec::new();
        for record in self.records.values().filter(|record| record.is_open()) {
            let device_id = record.device_id();
            if !seen.insert(device_id) && !conflicting.contains(device_id) {
                conflicting.push(device_id.clone());
            }
        }
        conflicting
    }

    /// Returns why the store would refuse a constraint step, if it would.
    fn soft_step_refusal(&self, step: &SchemaStep) -> Option<String> {
        match step {
            SchemaStep::AddBusinessIdUnique => {
                let duplicates = self.duplicate_business_ids();
                (!duplicates.is_empty()).then(|| {
                    format!("duplicate business identifiers: {}", join(&duplicates))
                })
            }
            SchemaStep::AddOpenJobIndex => {
                let devices = self.devices_with_several_open_jobs();
                (!devices.is_empty())
                    .then(|| format!("devices with several open jobs: {}", join(&devices)))
            }
            _ => None,
        }
    }
}

fn join<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn newest_first(left: &&WeldJobRecord, right: &&WeldJobRecord) -> std::cmp::Ordering {
    (right.created_at(), right.sequence_id()).cmp(&(left.created_at(), left.sequence_id()))
}

#[async_trait]
impl WeldJobRepository for InMemoryWeldJobRepository {
    async fn insert(&self, job: &NewWeldJob) -> WeldJobRepositoryResult<WeldJobRecord> {
        let mut state = self.write()?;
        state.require_table()?;
        state.check_constraints(
            None,
            Some(job.business_id()),
            job.device_id(),
            job.completion_flag().is_open(),
        )?;

        let sequence_id = SequenceId::new(state.next_sequence);
        state.next_sequence += 1;
        let record = job.clone().into_record(sequence_id);
        state.records.insert(sequence_id, record.clone());
        Ok(record)
    }

    async fn update(&self, record: &WeldJobRecord) -> WeldJobRepositoryResult<()> {
        let mut state = self.write()?;
        state.require_table()?;
        if !state.records.contains_key(&record.sequence_id()) {
            return Err(WeldJobRepositoryError::NotFound(record.sequence_id()));
        }
        state.check_constraints(
            Some(record.sequence_id()),
            record.business_id(),
            record.device_id(),
            record.is_open(),
        )?;
        state.records.insert(record.sequence_id(), record.clone());
        Ok(())
    }

    async fn delete(&self, sequence_id: SequenceId) -> WeldJobRepositoryResult<bool> {
        let mut state = self.write()?;
        state.require_table()?;
        Ok(state.records.remove(&sequence_id).is_some())
    }

    async fn find_by_sequence_id(
        &self,
        sequence_id: SequenceId,
    ) -> WeldJobRepositoryResult<Option<WeldJobRecord>> {
        let state = self.read()?;
        state.require_table()?;
        Ok(state.records.get(&sequence_id).cloned())
    }

    async fn find_by_business_id(
        &self,
        business_id: &BusinessId,
    ) -> WeldJobRepositoryResult<Option<WeldJobRecord>> {
        let state = self.read()?;
        state.require_table()?;
        Ok(state
            .records
            .values()
            .filter(|record| record.business_id() == Some(business_id))
            .min_by_key(|record| (record.created_at(), record.sequence_id()))
            .cloned())
    }

    async fn find_oldest_open(
        &self,
        device_id: &DeviceId,
    ) -> WeldJobRepositoryResult<Option<WeldJobRecord>> {
        let state = self.read()?;
        state.require_table()?;
        Ok(state
            .open_for_device(device_id)
            .min_by_key(|record| (record.created_at(), record.sequence_id()))
            .cloned())
    }

    async fn find_newest_open(
        &self,
        device_id: &DeviceId,
    ) -> WeldJobRepositoryResult<Option<WeldJobRecord>> {
        let state = self.read()?;
        state.require_table()?;
        Ok(state
            .open_for_device(device_id)
            .max_by_key(|record| (record.created_at(), record.sequence_id()))
            .cloned())
    }

    async fn find_latest_for_device(
        &self,
        device_id: &DeviceId,
    ) -> WeldJobRepositoryResult<Option<WeldJobRecord>> {
        let state = self.read()?;
        state.require_table()?;
        Ok(state
            .records
            .values()
            .filter(|record| record.device_id() == device_id)
            .max_by_key(|record| (record.created_at(), record.sequence_id()))
            .cloned())
    }

    async fn list_by_device_name(
        &self,
        device_name: &DeviceName,
    ) -> WeldJobRepositoryResult<Vec<WeldJobRecord>> {
        let state = self.read()?;
        state.require_table()?;
        let mut matching: Vec<&WeldJobRecord> = state
            .records
            .values()
            .filter(|record| record.device_name() == Some(device_name))
            .collect();
        matching.sort_by(newest_first);
        Ok(matching.into_iter().cloned().collect())
    }

    async fn business_id_exists(&self, business_id: &BusinessId) -> WeldJobRepositoryResult<bool> {
        let state = self.read()?;
        state.require_table()?;
        Ok(state
            .records
            .values()
            .any(|record| record.business_id() == Some(business_id)))
    }
}

#[async_trait]
impl WeldJobSchema for InMemoryWeldJobRepository {
    async fn ensure_schema(&self) -> Result<SchemaReport, SchemaGuardError> {
        let mut state = self.state.write().map_err(|err| {
            SchemaGuardError::Inspect(Arc::new(std::io::Error::other(err.to_string())))
        })?;

        let mut report = SchemaReport::default();
        for step in plan_schema_steps(&state.schema) {
            if let Some(reason) = state.soft_step_refusal(&step) {
                warn!(step = %step, reason = %reason, "schema step skipped");
                report.warnings.push(SchemaWarning { step, reason });
                continue;
            }
            step.apply_to(&mut state.schema);
            info!(step = %step, "applied schema step");
            report.applied.push(step);
        }
        Ok(report)
    }
}
