use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::report::{DATE_FORMAT, TIME_FORMAT};
use crate::storage::csv::{CsvConnection, RecordRepository};
use crate::storage::traits::RecordStorage;
use shared::{
    AddFeedingRequest, AddGrowthRequest, AddMedicationRequest, AddNappyChangeRequest,
    AddSleepRequest, AddTemperatureRequest, FeedingRecord, GrowthRecord, MedicationRecord,
    NappyChangeRecord, SleepRecord, TemperatureRecord,
};

/// Service for the six event record kinds: add, list (newest first), and
/// delete. Validation happens here on ingest so that stored files only
/// ever contain well-formed dates and times.
#[derive(Clone)]
pub struct RecordService {
    sleep_repository: RecordRepository<SleepRecord>,
    feeding_repository: RecordRepository<FeedingRecord>,
    nappy_repository: RecordRepository<NappyChangeRecord>,
    medication_repository: RecordRepository<MedicationRecord>,
    temperature_repository: RecordRepository<TemperatureRecord>,
    growth_repository: RecordRepository<GrowthRecord>,
}

impl RecordService {
    /// Create a new RecordService
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self {
            sleep_repository: RecordRepository::new(connection.clone()),
            feeding_repository: RecordRepository::new(connection.clone()),
            nappy_repository: RecordRepository::new(connection.clone()),
            medication_repository: RecordRepository::new(connection.clone()),
            temperature_repository: RecordRepository::new(connection.clone()),
            growth_repository: RecordRepository::new(connection),
        }
    }

    // --- sleep ---

    pub fn add_sleep(&self, child_id: &str, request: AddSleepRequest) -> Result<SleepRecord> {
        validate_date("sleep_date", &request.sleep_date)?;
        validate_time("start_time", &request.start_time)?;
        // An end time before the start time is a valid overnight interval
        validate_time("end_time", &request.end_time)?;

        let record = SleepRecord {
            id: generate_record_id("sleep"),
            child_id: child_id.to_string(),
            sleep_date: request.sleep_date,
            sleep_type: request.sleep_type,
            start_time: request.start_time,
            end_time: request.end_time,
        };
        self.sleep_repository.store_record(child_id, &record)?;
        info!("Added sleep record {} for child {}", record.id, child_id);
        Ok(record)
    }

    pub fn list_sleep(&self, child_id: &str) -> Result<Vec<SleepRecord>> {
        self.sleep_repository.list_records(child_id)
    }

    pub fn delete_sleep(&self, child_id: &str, record_id: &str) -> Result<bool> {
        self.sleep_repository.delete_record(child_id, record_id)
    }

    // --- feeding ---

    pub fn add_feeding(&self, child_id: &str, request: AddFeedingRequest) -> Result<FeedingRecord> {
        validate_date("feed_date", &request.feed_date)?;
        validate_time("feed_time", &request.feed_time)?;
        validate_not_empty("feed_type", &request.feed_type)?;

        let record = FeedingRecord {
            id: generate_record_id("feeding"),
            child_id: child_id.to_string(),
            feed_date: request.feed_date,
            feed_time: request.feed_time,
            feed_type: request.feed_type,
            food_name: request.food_name,
            feed_amount: request.feed_amount,
        };
        self.feeding_repository.store_record(child_id, &record)?;
        info!("Added feeding record {} for child {}", record.id, child_id);
        Ok(record)
    }

    pub fn list_feeding(&self, child_id: &str) -> Result<Vec<FeedingRecord>> {
        self.feeding_repository.list_records(child_id)
    }

    pub fn delete_feeding(&self, child_id: &str, record_id: &str) -> Result<bool> {
        self.feeding_repository.delete_record(child_id, record_id)
    }

    // --- nappy changes ---

    pub fn add_nappy_change(
        &self,
        child_id: &str,
        request: AddNappyChangeRequest,
    ) -> Result<NappyChangeRecord> {
        validate_date("change_date", &request.change_date)?;
        validate_time("change_time", &request.change_time)?;
        validate_not_empty("change_type", &request.change_type)?;

        let record = NappyChangeRecord {
            id: generate_record_id("nappy"),
            child_id: child_id.to_string(),
            change_date: request.change_date,
            change_time: request.change_time,
            change_type: request.change_type,
        };
        self.nappy_repository.store_record(child_id, &record)?;
        info!("Added nappy change record {} for child {}", record.id, child_id);
        Ok(record)
    }

    pub fn list_nappy_changes(&self, child_id: &str) -> Result<Vec<NappyChangeRecord>> {
        self.nappy_repository.list_records(child_id)
    }

    pub fn delete_nappy_change(&self, child_id: &str, record_id: &str) -> Result<bool> {
        self.nappy_repository.delete_record(child_id, record_id)
    }

    // --- medication ---

    pub fn add_medication(
        &self,
        child_id: &str,
        request: AddMedicationRequest,
    ) -> Result<MedicationRecord> {
        validate_date("medication_date", &request.medication_date)?;
        validate_time("medication_time", &request.medication_time)?;
        validate_not_empty("medication_type", &request.medication_type)?;
        validate_not_empty("dosage", &request.dosage)?;

        let record = MedicationRecord {
            id: generate_record_id("medication"),
            child_id: child_id.to_string(),
            medication_date: request.medication_date,
            medication_time: request.medication_time,
            medication_type: request.medication_type,
            dosage: request.dosage,
        };
        self.medication_repository.store_record(child_id, &record)?;
        info!("Added medication record {} for child {}", record.id, child_id);
        Ok(record)
    }

    pub fn list_medication(&self, child_id: &str) -> Result<Vec<MedicationRecord>> {
        self.medication_repository.list_records(child_id)
    }

    pub fn delete_medication(&self, child_id: &str, record_id: &str) -> Result<bool> {
        self.medication_repository.delete_record(child_id, record_id)
    }

    // --- temperature ---

    pub fn add_temperature(
        &self,
        child_id: &str,
        request: AddTemperatureRequest,
    ) -> Result<TemperatureRecord> {
        validate_date("date", &request.date)?;
        validate_time("temperature_time", &request.temperature_time)?;
        validate_not_empty("temperature", &request.temperature)?;

        let record = TemperatureRecord {
            id: generate_record_id("temperature"),
            child_id: child_id.to_string(),
            date: request.date,
            temperature_time: request.temperature_time,
            temperature: request.temperature,
        };
        self.temperature_repository.store_record(child_id, &record)?;
        info!("Added temperature record {} for child {}", record.id, child_id);
        Ok(record)
    }

    pub fn list_temperature(&self, child_id: &str) -> Result<Vec<TemperatureRecord>> {
        self.temperature_repository.list_records(child_id)
    }

    pub fn delete_temperature(&self, child_id: &str, record_id: &str) -> Result<bool> {
        self.temperature_repository.delete_record(child_id, record_id)
    }

    // --- growth ---

    pub fn add_growth(&self, child_id: &str, request: AddGrowthRequest) -> Result<GrowthRecord> {
        validate_date("growth_date", &request.growth_date)?;
        validate_not_empty("weight", &request.weight)?;
        validate_not_empty("height", &request.height)?;

        let record = GrowthRecord {
            id: generate_record_id("growth"),
            child_id: child_id.to_string(),
            growth_date: request.growth_date,
            weight: request.weight,
            height: request.height,
        };
        self.growth_repository.store_record(child_id, &record)?;
        info!("Added growth record {} for child {}", record.id, child_id);
        Ok(record)
    }

    pub fn list_growth(&self, child_id: &str) -> Result<Vec<GrowthRecord>> {
        self.growth_repository.list_records(child_id)
    }

    pub fn delete_growth(&self, child_id: &str, record_id: &str) -> Result<bool> {
        self.growth_repository.delete_record(child_id, record_id)
    }
}

fn generate_record_id(kind: &str) -> String {
    format!("{}::{}", kind, Uuid::new_v4())
}

fn validate_date(field: &str, value: &str) -> Result<()> {
    let parsed = NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| anyhow::anyhow!("Invalid {} '{}'. Use YYYY-MM-DD.", field, value))?;
    // Zero padding matters: date range filtering compares strings
    if parsed.format(DATE_FORMAT).to_string() != value {
        return Err(anyhow::anyhow!(
            "Invalid {} '{}'. Use zero-padded YYYY-MM-DD.",
            field,
            value
        ));
    }
    Ok(())
}

fn validate_time(field: &str, value: &str) -> Result<()> {
    let parsed = NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|_| anyhow::anyhow!("Invalid {} '{}'. Use HH:MM.", field, value))?;
    if parsed.format(TIME_FORMAT).to_string() != value {
        return Err(anyhow::anyhow!(
            "Invalid {} '{}'. Use zero-padded HH:MM.",
            field,
            value
        ));
    }
    Ok(())
}

fn validate_not_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(anyhow::anyhow!("{} cannot be empty", field));
    }
    Ok(())
}
