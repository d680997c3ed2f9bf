//! Row types for the project-management tables.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub project_name: String,
    pub client_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub percent_complete: i64,
}

/// A persisted project, as read back for seeding and reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRecord {
    pub project_id: i64,
    pub project_name: String,
    pub client_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub percent_complete: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AstmTest {
    pub test_name: String,
    pub test_date: NaiveDate,
    pub test_type: String,
    pub result_value: Option<f64>,
    pub result_unit: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    pub total_budget: f64,
    pub spent_amount: f64,
    pub last_updated: NaiveDate,
}

impl Budget {
    pub fn remaining_amount(&self) -> f64 {
        self.total_budget - self.spent_amount
    }
}

/// Absorption data for room treatments, isolation ratings for underlayments.
#[derive(Debug, Clone, PartialEq)]
pub struct AcousticMaterial {
    pub material_name: String,
    pub material_type: String,
    pub nrc_single_value: Option<f64>,
    /// NRC at 125, 250, 500, 1000, 2000 and 4000 Hz.
    pub nrc_bands: [Option<f64>; 6],
    pub stc_rating: Option<i64>,
    pub iic_rating: Option<i64>,
    pub cost_per_sqft: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentItem {
    pub equipment_name: String,
    pub equipment_type: String,
    /// Sound power level (dB) at 125 Hz through 8000 Hz octave bands.
    pub sound_power: [f64; 7],
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentSpace {
    pub space_name: String,
    pub space_type: String,
    pub length_ft: f64,
    pub width_ft: f64,
    pub height_ft: f64,
    pub nc_requirement: Option<i64>,
    pub rt60_500hz: Option<f64>,
    pub rt60_1000hz: Option<f64>,
    pub rt60_2000hz: Option<f64>,
    pub background_noise_dba: Option<f64>,
    pub notes: Option<String>,
}

impl EquipmentSpace {
    pub fn volume_cubic_ft(&self) -> f64 {
        self.length_ft * self.width_ft * self.height_ft
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub content: String,
    pub sent_date: NaiveDateTime,
    pub is_read: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Deliverable {
    pub deliverable_name: String,
    pub deliverable_type: String,
    pub due_date: NaiveDate,
    pub submission_date: Option<NaiveDate>,
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Milestone {
    pub milestone_name: String,
    pub milestone_type: String,
    pub planned_date: NaiveDate,
    pub actual_date: Option<NaiveDate>,
    pub status: String,
    pub notes: Option<String>,
}

/// One noise-sensitive space joined with its project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomVolumeRow {
    pub project_name: String,
    pub client_name: String,
    pub space_name: String,
    pub space_type: String,
    pub volume_cubic_ft: f64,
    pub nc_requirement: Option<i64>,
    pub rt60_500hz: Option<f64>,
    pub background_noise_dba: Option<f64>,
}

/// One acoustic material joined with its project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialRow {
    pub project_name: String,
    pub client_name: String,
    pub material_name: String,
    pub material_type: String,
    pub nrc_single_value: Option<f64>,
    pub stc_rating: Option<i64>,
    pub iic_rating: Option<i64>,
    pub cost_per_sqft: f64,
}
