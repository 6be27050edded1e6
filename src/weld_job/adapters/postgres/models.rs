//! Diesel row models for weld job persistence and schema introspection.

use super::schema::weld_details;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer, Nullable, Text};

/// Query result row for weld job records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = weld_details)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WeldJobRow {
    pub sequence_id: i32,
    pub business_id: Option<String>,
    pub device_name: Option<String>,
    pub device_id: String,
    pub contractor_name: Option<String>,
    pub block_number: Option<String>,
    pub welder_name: Option<String>,
    pub badge_number: Option<String>,
    pub material_type: Option<String>,
    pub thickness: Option<i32>,
    pub type_of_weld: Option<String>,
    pub no_of_passes: Option<i32>,
    pub weld_length: Option<i32>,
    pub current: Option<i32>,
    pub voltage: Option<i32>,
    pub travel_speed: Option<i32>,
    pub filler_material: Option<String>,
    pub wps_code: Option<String>,
    pub remarks: Option<String>,
    pub completion_flag: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert model for a fresh open job.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = weld_details)]
pub struct NewWeldJobRow {
    pub business_id: Option<String>,
    pub device_name: Option<String>,
    pub device_id: String,
    pub contractor_name: Option<String>,
    pub block_number: Option<String>,
    pub welder_name: Option<String>,
    pub badge_number: Option<String>,
    pub material_type: Option<String>,
    pub thickness: Option<i32>,
    pub type_of_weld: Option<String>,
    pub no_of_passes: Option<i32>,
    pub weld_length: Option<i32>,
    pub current: Option<i32>,
    pub voltage: Option<i32>,
    pub travel_speed: Option<i32>,
    pub filler_material: Option<String>,
    pub wps_code: Option<String>,
    pub remarks: Option<String>,
    pub completion_flag: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Update model for the mutable columns of an existing record.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = weld_details)]
#[diesel(treat_none_as_null = true)]
pub struct WeldJobChangeset {
    pub business_id: Option<String>,
    pub device_name: Option<String>,
    pub contractor_name: Option<String>,
    pub block_number: Option<String>,
    pub welder_name: Option<String>,
    pub badge_number: Option<String>,
    pub material_type: Option<String>,
    pub thickness: Option<i32>,
    pub type_of_weld: Option<String>,
    pub no_of_passes: Option<i32>,
    pub weld_length: Option<i32>,
    pub current: Option<i32>,
    pub voltage: Option<i32>,
    pub travel_speed: Option<i32>,
    pub filler_material: Option<String>,
    pub wps_code: Option<String>,
    pub remarks: Option<String>,
    pub completion_flag: Option<String>,
}

/// Column description read from `information_schema.columns`.
#[derive(Debug, Clone, QueryableByName)]
pub struct ColumnRow {
    #[diesel(sql_type = Text)]
    pub column_name: String,
    #[diesel(sql_type = Nullable<Integer>)]
    pub max_length: Option<i32>,
}

/// Single-count introspection result.
#[derive(Debug, Clone, Copy, QueryableByName)]
pub struct CountRow {
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}
