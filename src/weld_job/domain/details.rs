//! Operator-entered weld parameters attached to a job record.

use super::WeldJobDomainError;
use serde::{Deserialize, Serialize};

const NAME_WIDTH: usize = 100;
const CODE_WIDTH: usize = 50;
const WELD_TYPE_WIDTH: usize = 10;

/// Optional domain fields of a weld job.
///
/// Every field may be overwritten while the job is open and is nulled when
/// the record is cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeldJobDetails {
    /// Contractor performing the weld.
    pub contractor_name: Option<String>,
    /// Hull block number.
    pub block_number: Option<String>,
    /// Welder performing the job.
    pub welder_name: Option<String>,
    /// Welder badge number.
    pub badge_number: Option<String>,
    /// Base material.
    pub material_type: Option<String>,
    /// Plate thickness in millimetres.
    pub thickness: Option<i32>,
    /// Weld type code, for example `BUTT` or `FILLET`.
    pub type_of_weld: Option<String>,
    /// Number of passes.
    pub no_of_passes: Option<i32>,
    /// Weld length in millimetres.
    pub weld_length: Option<i32>,
    /// Welding current in amperes.
    pub current: Option<i32>,
    /// Arc voltage in volts.
    pub voltage: Option<i32>,
    /// Travel speed in millimetres per minute.
    pub travel_speed: Option<i32>,
    /// Filler wire or electrode.
    pub filler_material: Option<String>,
    /// Welding procedure specification code.
    pub wps_code: Option<String>,
    /// Free-text remarks.
    pub remarks: Option<String>,
}

impl WeldJobDetails {
    /// Normalizes and validates the details against their storage widths.
    ///
    /// Text fields are trimmed and blank values become `None`.
    ///
    /// # Errors
    ///
    /// Returns [`WeldJobDomainError::FieldTooLong`] when a text field exceeds
    /// its column width, or [`WeldJobDomainError::NegativeMeasurement`] when a
    /// numeric field is negative.
    pub fn validated(self) -> Result<Self, WeldJobDomainError> {
        Ok(Self {
            contractor_name: text("contractor_name", self.contractor_name, Some(NAME_WIDTH))?,
            block_number: text("block_number", self.block_number, Some(CODE_WIDTH))?,
            welder_name: text("welder_name", self.welder_name, Some(NAME_WIDTH))?,
            badge_number: text("badge_number", self.badge_number, Some(CODE_WIDTH))?,
            material_type: text("material_type", self.material_type, Some(NAME_WIDTH))?,
            thickness: measurement("thickness", self.thickness)?,
            type_of_weld: text("type_of_weld", self.type_of_weld, Some(WELD_TYPE_WIDTH))?,
            no_of_passes: measurement("no_of_passes", self.no_of_passes)?,
            weld_length: measurement("weld_length", self.weld_length)?,
            current: measurement("current", self.current)?,
            voltage: measurement("voltage", self.voltage)?,
            travel_speed: measurement("travel_speed", self.travel_speed)?,
            filler_material: text("filler_material", self.filler_material, Some(NAME_WIDTH))?,
            wps_code: text("wps_code", self.wps_code, Some(NAME_WIDTH))?,
            remarks: text("remarks", self.remarks, None)?,
        })
    }

    /// Returns `true` when no field carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn text(
    field: &'static str,
    value: Option<String>,
    max: Option<usize>,
) -> Result<Option<String>, WeldJobDomainError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Some(width) = max {
        if trimmed.chars().count() > width {
            return Err(WeldJobDomainError::FieldTooLong { field, max: width });
        }
    }
    Ok(Some(trimmed.to_owned()))
}

const fn measurement(
    field: &'static str,
    value: Option<i32>,
) -> Result<Option<i32>, WeldJobDomainError> {
    match value {
        Some(v) if v < 0 => Err(WeldJobDomainError::NegativeMeasurement { field, value: v }),
        other => Ok(other),
    }
}
