//! Shared DTOs for the nestling child health tracker.
//!
//! These types cross the REST boundary between the backend and any client.
//! All dates are naive local `YYYY-MM-DD` strings and all times-of-day are
//! naive local `HH:MM` strings; the backend is responsible for validating
//! and parsing them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Children
// ---------------------------------------------------------------------------

/// Child as exposed over the API. `id` is in the format "child::<epoch_millis>".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildDto {
    pub id: String,
    pub name: String,
    pub sex: String,
    /// Birth date as YYYY-MM-DD
    pub date_of_birth: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateChildRequest {
    pub name: String,
    pub sex: String,
    pub date_of_birth: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateChildRequest {
    pub name: Option<String>,
    pub sex: Option<String>,
    pub date_of_birth: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildListResponse {
    pub children: Vec<ChildDto>,
}

// ---------------------------------------------------------------------------
// Event records
// ---------------------------------------------------------------------------

/// Kind of a sleep interval. Serialized with the display tags the app has
/// always stored ("Day time nap" / "Night sleep").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SleepType {
    #[serde(rename = "Day time nap")]
    DayTimeNap,
    #[serde(rename = "Night sleep")]
    NightSleep,
}

impl SleepType {
    pub fn is_nap(&self) -> bool {
        matches!(self, SleepType::DayTimeNap)
    }
}

impl fmt::Display for SleepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SleepType::DayTimeNap => write!(f, "Day time nap"),
            SleepType::NightSleep => write!(f, "Night sleep"),
        }
    }
}

impl FromStr for SleepType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Day time nap" => Ok(SleepType::DayTimeNap),
            "Night sleep" => Ok(SleepType::NightSleep),
            other => Err(format!("unknown sleep type: {other}")),
        }
    }
}

/// A sleep interval. `end_time` numerically before `start_time` means the
/// interval crosses midnight (e.g. 22:00 -> 06:00), not a bad record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepRecord {
    pub id: String,
    pub child_id: String,
    pub sleep_date: String,
    pub sleep_type: SleepType,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingRecord {
    pub id: String,
    pub child_id: String,
    pub feed_date: String,
    pub feed_time: String,
    pub feed_type: String,
    pub food_name: Option<String>,
    pub feed_amount: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NappyChangeRecord {
    pub id: String,
    pub child_id: String,
    pub change_date: String,
    pub change_time: String,
    pub change_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationRecord {
    pub id: String,
    pub child_id: String,
    pub medication_date: String,
    pub medication_time: String,
    pub medication_type: String,
    pub dosage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRecord {
    pub id: String,
    pub child_id: String,
    pub date: String,
    pub temperature_time: String,
    pub temperature: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRecord {
    pub id: String,
    pub child_id: String,
    pub growth_date: String,
    pub weight: String,
    pub height: String,
}

// ---------------------------------------------------------------------------
// Record ingest requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddSleepRequest {
    pub sleep_date: String,
    pub sleep_type: SleepType,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddFeedingRequest {
    pub feed_date: String,
    pub feed_time: String,
    pub feed_type: String,
    pub food_name: Option<String>,
    pub feed_amount: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddNappyChangeRequest {
    pub change_date: String,
    pub change_time: String,
    pub change_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddMedicationRequest {
    pub medication_date: String,
    pub medication_time: String,
    pub medication_type: String,
    pub dosage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddTemperatureRequest {
    pub date: String,
    pub temperature_time: String,
    pub temperature: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddGrowthRequest {
    pub growth_date: String,
    pub weight: String,
    pub height: String,
}

// ---------------------------------------------------------------------------
// Daily report
// ---------------------------------------------------------------------------

/// Child header of a daily report, with the age computed for the report date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildSummary {
    pub id: String,
    pub name: String,
    pub sex: String,
    pub date_of_birth: String,
    pub age_months: i32,
}

/// Counts and flags for the report's target date only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodaySummary {
    pub sleep_hours: f64,
    pub naps_count: u32,
    pub feeds_count: u32,
    pub nappy_changes: u32,
    pub medication_given: bool,
    pub temperature_taken: bool,
}

/// Sleep trend over the 7 days ending on the report date. Averages divide by
/// the number of distinct dates that have at least one sleep record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySleepStats {
    pub total_sleep_minutes: i64,
    pub avg_naps_per_day: f64,
    pub avg_sleep_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyStats {
    pub sleep: WeeklySleepStats,
}

/// Sleep record as it appears inside a daily report, with its duration
/// derived by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepReportEntry {
    pub id: String,
    pub sleep_type: SleepType,
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingReportEntry {
    pub id: String,
    pub feed_time: String,
    pub feed_type: String,
    pub food_name: Option<String>,
    pub feed_amount: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NappyChangeReportEntry {
    pub id: String,
    pub change_time: String,
    pub change_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationReportEntry {
    pub id: String,
    pub medication_time: String,
    pub medication_type: String,
    pub dosage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReportEntry {
    pub id: String,
    pub temperature_time: String,
    pub temperature: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthReportEntry {
    pub id: String,
    pub weight: String,
    pub height: String,
}

/// Same-day records of every kind, grouped for the report response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordsByKind {
    pub sleep: Vec<SleepReportEntry>,
    pub feeding: Vec<FeedingReportEntry>,
    pub nappy: Vec<NappyChangeReportEntry>,
    pub medication: Vec<MedicationReportEntry>,
    pub temperature: Vec<TemperatureReportEntry>,
    pub growth: Vec<GrowthReportEntry>,
}

/// Full daily report for one child and one date. Produced fresh on every
/// request and never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    pub child: ChildSummary,
    pub date: String,
    pub today_summary: TodaySummary,
    pub weekly_stats: WeeklyStats,
    pub records: RecordsByKind,
}
