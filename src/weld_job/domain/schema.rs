//! Expected shape of the `weld_details` table and the steps that reach it.
//!
//! Planning is pure: adapters describe what they found in a
//! [`TableSnapshot`], [`plan_schema_steps`] returns the ordered alterations
//! needed, and each adapter executes them in its own medium. Applying the
//! plan to the snapshot yields a snapshot for which the plan is empty.

use super::BusinessId;
use std::collections::BTreeMap;
use std::fmt;

/// Name of the persisted weld job table.
pub const TABLE_NAME: &str = "weld_details";

/// Column holding the device identifier.
pub const DEVICE_ID_COLUMN: &str = "device_id";

/// Column holding the descriptive device label.
pub const DEVICE_NAME_COLUMN: &str = "device_name";

/// Column holding the completion flag.
pub const COMPLETION_FLAG_COLUMN: &str = "completion_flag";

/// Column holding the business identifier.
pub const BUSINESS_ID_COLUMN: &str = "business_id";

/// Earlier names of the device identifier column, in rename priority order.
pub const LEGACY_DEVICE_ID_COLUMNS: [&str; 2] = ["machine_id", "deviceid"];

/// Name of the business identifier uniqueness constraint.
pub const BUSINESS_ID_UNIQUE_CONSTRAINT: &str = "weld_details_business_id_key";

/// Name of the partial unique index allowing one open job per device.
pub const OPEN_JOB_INDEX: &str = "weld_details_open_job_per_device";

/// Columns of the current table shape with their declared character widths.
pub const CURRENT_COLUMNS: [(&str, Option<i32>); 21] = [
    ("sequence_id", None),
    (BUSINESS_ID_COLUMN, Some(5)),
    (DEVICE_NAME_COLUMN, Some(50)),
    (DEVICE_ID_COLUMN, Some(50)),
    ("contractor_name", Some(100)),
    ("block_number", Some(50)),
    ("welder_name", Some(100)),
    ("badge_number", Some(50)),
    ("material_type", Some(100)),
    ("thickness", None),
    ("type_of_weld", Some(10)),
    ("no_of_passes", None),
    ("weld_length", None),
    ("current", None),
    ("voltage", None),
    ("travel_speed", None),
    ("filler_material", Some(100)),
    ("wps_code", Some(100)),
    ("remarks", None),
    (COMPLETION_FLAG_COLUMN, Some(3)),
    ("created_at", None),
];

/// Observed state of the weld job table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSnapshot {
    /// Whether the table exists at all.
    pub table_exists: bool,
    /// Column names mapped to their declared character width, if any.
    pub columns: BTreeMap<String, Option<i32>>,
    /// Whether a uniqueness constraint covers the business identifier.
    pub business_id_unique: bool,
    /// Whether the one-open-job-per-device index exists.
    pub open_job_index: bool,
}

impl TableSnapshot {
    /// Snapshot of a database without the table.
    #[must_use]
    pub fn missing() -> Self {
        Self::default()
    }

    /// Snapshot of a table in the current expected shape.
    #[must_use]
    pub fn current() -> Self {
        Self {
            table_exists: true,
            columns: CURRENT_COLUMNS
                .iter()
                .map(|(name, width)| ((*name).to_owned(), *width))
                .collect(),
            business_id_unique: true,
            open_job_index: true,
        }
    }

    /// Returns `true` when the named column exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Returns the declared width of a column; `None` when absent.
    #[must_use]
    pub fn column_width(&self, name: &str) -> Option<Option<i32>> {
        self.columns.get(name).copied()
    }

    /// Returns a copy with a column added or replaced.
    #[must_use]
    pub fn with_column(mut self, name: &str, width: Option<i32>) -> Self {
        self.columns.insert(name.to_owned(), width);
        self
    }

    /// Returns a copy without the named column.
    #[must_use]
    pub fn without_column(mut self, name: &str) -> Self {
        self.columns.remove(name);
        self
    }

    /// Returns a copy with the constraint flags set.
    #[must_use]
    pub const fn with_constraints(mut self, business_id_unique: bool, open_job_index: bool) -> Self {
        self.business_id_unique = business_id_unique;
        self.open_job_index = open_job_index;
        self
    }
}

/// A single idempotent schema alteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaStep {
    /// Create the table with every current column and constraint.
    CreateTable,
    /// Rename a legacy device identifier column, preserving data.
    RenameLegacyDeviceColumn {
        /// Legacy column name.
        from: String,
    },
    /// Add the nullable device name column.
    AddDeviceName,
    /// Add the completion flag column defaulting to `NO`.
    AddCompletionFlag,
    /// Resize the business identifier column to the fixed length.
    ResizeBusinessId {
        /// Width found before resizing; `None` for unbounded.
        from: Option<i32>,
    },
    /// Add the business identifier uniqueness constraint.
    AddBusinessIdUnique,
    /// Add the partial unique index on open jobs per device.
    AddOpenJobIndex,
}

impl SchemaStep {
    /// Returns `true` when failure of this step must not abort the guard.
    ///
    /// Constraint additions fail on pre-existing duplicate data; the guard
    /// records the failure and continues.
    #[must_use]
    pub const fn is_soft(&self) -> bool {
        matches!(self, Self::AddBusinessIdUnique | Self::AddOpenJobIndex)
    }

    /// Applies the step to a snapshot.
    pub fn apply_to(&self, snapshot: &mut TableSnapshot) {
        match self {
            Self::CreateTable => {
                *snapshot = TableSnapshot::current().with_constraints(true, false);
            }
            Self::RenameLegacyDeviceColumn { from } => {
                let width = snapshot.columns.remove(from).flatten();
                snapshot
                    .columns
                    .insert(DEVICE_ID_COLUMN.to_owned(), width);
            }
            Self::AddDeviceName => {
                snapshot
                    .columns
                    .insert(DEVICE_NAME_COLUMN.to_owned(), Some(50));
            }
            Self::AddCompletionFlag => {
                snapshot
                    .columns
                    .insert(COMPLETION_FLAG_COLUMN.to_owned(), Some(3));
            }
            Self::ResizeBusinessId { .. } => {
                snapshot
                    .columns
                    .insert(BUSINESS_ID_COLUMN.to_owned(), Some(business_id_width()));
            }
            Self::AddBusinessIdUnique => snapshot.business_id_unique = true,
            Self::AddOpenJobIndex => snapshot.open_job_index = true,
        }
    }
}

impl fmt::Display for SchemaStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateTable => write!(f, "create table {TABLE_NAME}"),
            Self::RenameLegacyDeviceColumn { from } => {
                write!(f, "rename column {from} to {DEVICE_ID_COLUMN}")
            }
            Self::AddDeviceName => write!(f, "add column {DEVICE_NAME_COLUMN}"),
            Self::AddCompletionFlag => write!(f, "add column {COMPLETION_FLAG_COLUMN}"),
            Self::ResizeBusinessId { from } => match from {
                Some(width) => write!(
                    f,
                    "resize {BUSINESS_ID_COLUMN} from {width} to {}",
                    business_id_width()
                ),
                None => write!(
                    f,
                    "resize {BUSINESS_ID_COLUMN} from unbounded to {}",
                    business_id_width()
                ),
            },
            Self::AddBusinessIdUnique => {
                write!(f, "add constraint {BUSINESS_ID_UNIQUE_CONSTRAINT}")
            }
            Self::AddOpenJobIndex => write!(f, "add index {OPEN_JOB_INDEX}"),
        }
    }
}

/// Declared width the business identifier column must have.
#[must_use]
pub fn business_id_width() -> i32 {
    i32::try_from(BusinessId::LENGTH).unwrap_or(i32::MAX)
}

/// Plans the ordered steps that bring `snapshot` to the current shape.
#[must_use]
pub fn plan_schema_steps(snapshot: &TableSnapshot) -> Vec<SchemaStep> {
    let mut working = snapshot.clone();
    let mut steps = Vec::new();
    let mut push = |step: SchemaStep, working: &mut TableSnapshot| {
        step.apply_to(working);
        steps.push(step);
    };

    if !working.table_exists {
        push(SchemaStep::CreateTable, &mut working);
    }

    if !working.has_column(DEVICE_ID_COLUMN) {
        let legacy = LEGACY_DEVICE_ID_COLUMNS
            .iter()
            .find(|name| working.has_column(name));
        if let Some(from) = legacy {
            push(
                SchemaStep::RenameLegacyDeviceColumn {
                    from: (*from).to_owned(),
                },
                &mut working,
            );
        }
    }

    if !working.has_column(DEVICE_NAME_COLUMN) {
        push(SchemaStep::AddDeviceName, &mut working);
    }

    if !working.has_column(COMPLETION_FLAG_COLUMN) {
        push(SchemaStep::AddCompletionFlag, &mut working);
    }

    if let Some(width) = working.column_width(BUSINESS_ID_COLUMN) {
        if width != Some(business_id_width()) {
            push(SchemaStep::ResizeBusinessId { from: width }, &mut working);
        }
        if !working.business_id_unique {
            push(SchemaStep::AddBusinessIdUnique, &mut working);
        }
    }

    if !working.open_job_index
        && working.has_column(DEVICE_ID_COLUMN)
        && working.has_column(COMPLETION_FLAG_COLUMN)
    {
        push(SchemaStep::AddOpenJobIndex, &mut working);
    }

    steps
}
