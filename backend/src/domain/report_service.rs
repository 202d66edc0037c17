use anyhow::{Context, Result};
use chrono::{Duration, Local};
use std::sync::Arc;
use tracing::info;

use crate::domain::report::{self, DayRecords, DATE_FORMAT};
use crate::storage::csv::{ChildRepository, CsvConnection, RecordRepository};
use crate::storage::traits::{ChildStorage, RecordStorage};
use shared::{
    DailyReport, FeedingRecord, GrowthRecord, MedicationRecord, NappyChangeRecord, SleepRecord,
    TemperatureRecord,
};

/// Service that assembles daily reports: resolves the child, gathers the
/// same-day collections and the trailing 7-day sleep window from storage,
/// then hands everything to the pure report engine.
#[derive(Clone)]
pub struct ReportService {
    child_repository: ChildRepository,
    sleep_repository: RecordRepository<SleepRecord>,
    feeding_repository: RecordRepository<FeedingRecord>,
    nappy_repository: RecordRepository<NappyChangeRecord>,
    medication_repository: RecordRepository<MedicationRecord>,
    temperature_repository: RecordRepository<TemperatureRecord>,
    growth_repository: RecordRepository<GrowthRecord>,
}

impl ReportService {
    /// Create a new ReportService
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self {
            child_repository: ChildRepository::new(connection.clone()),
            sleep_repository: RecordRepository::new(connection.clone()),
            feeding_repository: RecordRepository::new(connection.clone()),
            nappy_repository: RecordRepository::new(connection.clone()),
            medication_repository: RecordRepository::new(connection.clone()),
            temperature_repository: RecordRepository::new(connection.clone()),
            growth_repository: RecordRepository::new(connection),
        }
    }

    /// Compute the daily report for a child. `date` defaults to today
    /// (local time) when not given.
    pub fn daily_report(&self, child_id: &str, date: Option<String>) -> Result<DailyReport> {
        let date = date.unwrap_or_else(|| Local::now().format(DATE_FORMAT).to_string());
        info!("Computing daily report for child {} on {}", child_id, date);

        let child = self
            .child_repository
            .get_child(child_id)?
            .ok_or_else(|| anyhow::anyhow!("Child not found: {}", child_id))?;

        let target_date = report::parse_date("date", &date)?;
        let window_start = (target_date - Duration::days(7))
            .format(DATE_FORMAT)
            .to_string();

        let day = DayRecords {
            sleep: self.sleep_repository.records_on_date(child_id, &date)?,
            feeding: self.feeding_repository.records_on_date(child_id, &date)?,
            nappy: self.nappy_repository.records_on_date(child_id, &date)?,
            medication: self.medication_repository.records_on_date(child_id, &date)?,
            temperature: self.temperature_repository.records_on_date(child_id, &date)?,
            growth: self.growth_repository.records_on_date(child_id, &date)?,
        };

        let weekly_sleep = self
            .sleep_repository
            .records_in_range(child_id, &window_start, &date)?;

        let daily_report = report::build_daily_report(&child, &date, &day, &weekly_sleep)
            .with_context(|| format!("daily report for child {} on {}", child_id, date))?;

        info!(
            "Daily report for {} on {}: {} sleep, {} feeding, {} weekly sleep records",
            child_id,
            date,
            day.sleep.len(),
            day.feeding.len(),
            weekly_sleep.len()
        );

        Ok(daily_report)
    }
}
