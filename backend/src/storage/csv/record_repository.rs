use anyhow::{Context, Result};
use csv::{Reader, StringRecord, Writer};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::marker::PhantomData;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

use super::child_repository::ChildRepository;
use super::connection::CsvConnection;
use crate::storage::traits::RecordStorage;
use shared::{
    FeedingRecord, GrowthRecord, MedicationRecord, NappyChangeRecord, SleepRecord, SleepType,
    TemperatureRecord,
};

/// Row mapping for one event record kind: which file it lives in, its
/// header, and how a record converts to and from a CSV row.
pub trait CsvRecord: Clone + Send + Sync {
    /// CSV file name inside the child's directory, e.g. "sleep.csv"
    const FILE_NAME: &'static str;
    /// Header row, written when the file is (re)created
    const HEADERS: &'static [&'static str];

    fn id(&self) -> &str;
    /// The record's calendar date (zero-padded YYYY-MM-DD)
    fn date(&self) -> &str;
    /// Time-of-day used for newest-first ordering; empty when the kind has
    /// no time field
    fn time(&self) -> &str;

    fn to_row(&self) -> Vec<String>;
    fn from_row(row: &StringRecord) -> Result<Self>;
}

fn column(row: &StringRecord, index: usize, name: &str) -> Result<String> {
    row.get(index)
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("missing column '{}' in row {:?}", name, row))
}

fn optional_column(row: &StringRecord, index: usize) -> Option<String> {
    match row.get(index) {
        Some("") | None => None,
        Some(value) => Some(value.to_string()),
    }
}

impl CsvRecord for SleepRecord {
    const FILE_NAME: &'static str = "sleep.csv";
    const HEADERS: &'static [&'static str] =
        &["id", "child_id", "sleep_date", "sleep_type", "start_time", "end_time"];

    fn id(&self) -> &str {
        &self.id
    }

    fn date(&self) -> &str {
        &self.sleep_date
    }

    fn time(&self) -> &str {
        &self.start_time
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.child_id.clone(),
            self.sleep_date.clone(),
            self.sleep_type.to_string(),
            self.start_time.clone(),
            self.end_time.clone(),
        ]
    }

    fn from_row(row: &StringRecord) -> Result<Self> {
        let sleep_type = column(row, 3, "sleep_type")?;
        Ok(Self {
            id: column(row, 0, "id")?,
            child_id: column(row, 1, "child_id")?,
            sleep_date: column(row, 2, "sleep_date")?,
            sleep_type: SleepType::from_str(&sleep_type).map_err(|e| anyhow::anyhow!(e))?,
            start_time: column(row, 4, "start_time")?,
            end_time: column(row, 5, "end_time")?,
        })
    }
}

impl CsvRecord for FeedingRecord {
    const FILE_NAME: &'static str = "feeding.csv";
    const HEADERS: &'static [&'static str] = &[
        "id", "child_id", "feed_date", "feed_time", "feed_type", "food_name", "feed_amount",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn date(&self) -> &str {
        &self.feed_date
    }

    fn time(&self) -> &str {
        &self.feed_time
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.child_id.clone(),
            self.feed_date.clone(),
            self.feed_time.clone(),
            self.feed_type.clone(),
            self.food_name.clone().unwrap_or_default(),
            self.feed_amount.clone().unwrap_or_default(),
        ]
    }

    fn from_row(row: &StringRecord) -> Result<Self> {
        Ok(Self {
            id: column(row, 0, "id")?,
            child_id: column(row, 1, "child_id")?,
            feed_date: column(row, 2, "feed_date")?,
            feed_time: column(row, 3, "feed_time")?,
            feed_type: column(row, 4, "feed_type")?,
            food_name: optional_column(row, 5),
            feed_amount: optional_column(row, 6),
        })
    }
}

impl CsvRecord for NappyChangeRecord {
    const FILE_NAME: &'static str = "nappy.csv";
    const HEADERS: &'static [&'static str] =
        &["id", "child_id", "change_date", "change_time", "change_type"];

    fn id(&self) -> &str {
        &self.id
    }

    fn date(&self) -> &str {
        &self.change_date
    }

    fn time(&self) -> &str {
        &self.change_time
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.child_id.clone(),
            self.change_date.clone(),
            self.change_time.clone(),
            self.change_type.clone(),
        ]
    }

    fn from_row(row: &StringRecord) -> Result<Self> {
        Ok(Self {
            id: column(row, 0, "id")?,
            child_id: column(row, 1, "child_id")?,
            change_date: column(row, 2, "change_date")?,
            change_time: column(row, 3, "change_time")?,
            change_type: column(row, 4, "change_type")?,
        })
    }
}

impl CsvRecord for MedicationRecord {
    const FILE_NAME: &'static str = "medication.csv";
    const HEADERS: &'static [&'static str] = &[
        "id", "child_id", "medication_date", "medication_time", "medication_type", "dosage",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn date(&self) -> &str {
        &self.medication_date
    }

    fn time(&self) -> &str {
        &self.medication_time
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.child_id.clone(),
            self.medication_date.clone(),
            self.medication_time.clone(),
            self.medication_type.clone(),
            self.dosage.clone(),
        ]
    }

    fn from_row(row: &StringRecord) -> Result<Self> {
        Ok(Self {
            id: column(row, 0, "id")?,
            child_id: column(row, 1, "child_id")?,
            medication_date: column(row, 2, "medication_date")?,
            medication_time: column(row, 3, "medication_time")?,
            medication_type: column(row, 4, "medication_type")?,
            dosage: column(row, 5, "dosage")?,
        })
    }
}

impl CsvRecord for TemperatureRecord {
    const FILE_NAME: &'static str = "temperature.csv";
    const HEADERS: &'static [&'static str] =
        &["id", "child_id", "date", "temperature_time", "temperature"];

    fn id(&self) -> &str {
        &self.id
    }

    fn date(&self) -> &str {
        &self.date
    }

    fn time(&self) -> &str {
        &self.temperature_time
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.child_id.clone(),
            self.date.clone(),
            self.temperature_time.clone(),
            self.temperature.clone(),
        ]
    }

    fn from_row(row: &StringRecord) -> Result<Self> {
        Ok(Self {
            id: column(row, 0, "id")?,
            child_id: column(row, 1, "child_id")?,
            date: column(row, 2, "date")?,
            temperature_time: column(row, 3, "temperature_time")?,
            temperature: column(row, 4, "temperature")?,
        })
    }
}

impl CsvRecord for GrowthRecord {
    const FILE_NAME: &'static str = "growth.csv";
    const HEADERS: &'static [&'static str] = &["id", "child_id", "growth_date", "weight", "height"];

    fn id(&self) -> &str {
        &self.id
    }

    fn date(&self) -> &str {
        &self.growth_date
    }

    fn time(&self) -> &str {
        ""
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.child_id.clone(),
            self.growth_date.clone(),
            self.weight.clone(),
            self.height.clone(),
        ]
    }

    fn from_row(row: &StringRecord) -> Result<Self> {
        Ok(Self {
            id: column(row, 0, "id")?,
            child_id: column(row, 1, "child_id")?,
            growth_date: column(row, 2, "growth_date")?,
            weight: column(row, 3, "weight")?,
            height: column(row, 4, "height")?,
        })
    }
}

/// CSV-based event record repository, one instance per record kind.
pub struct RecordRepository<R: CsvRecord> {
    connection: Arc<CsvConnection>,
    child_repository: ChildRepository,
    _kind: PhantomData<fn() -> R>,
}

impl<R: CsvRecord> Clone for RecordRepository<R> {
    fn clone(&self) -> Self {
        Self {
            connection: self.connection.clone(),
            child_repository: self.child_repository.clone(),
            _kind: PhantomData,
        }
    }
}

impl<R: CsvRecord> RecordRepository<R> {
    /// Create a new CSV record repository
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        let child_repository = ChildRepository::new(connection.clone());
        Self {
            connection,
            child_repository,
            _kind: PhantomData,
        }
    }

    /// Resolve the data file for a child, failing when the child does not
    /// exist (records never live outside a child directory). The directory
    /// is found by id scan, not derived from the child's current name.
    fn record_file_path(&self, child_id: &str) -> Result<PathBuf> {
        let dir_name = self
            .child_repository
            .find_directory_by_child_id(child_id)?
            .ok_or_else(|| anyhow::anyhow!("Child not found: {}", child_id))?;
        Ok(self.connection.child_directory(&dir_name).join(R::FILE_NAME))
    }

    /// Read all records of this kind for a child from their CSV file
    fn read_records(&self, child_id: &str) -> Result<Vec<R>> {
        let file_path = self.record_file_path(child_id)?;

        if !file_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)?;
        let reader = BufReader::new(file);
        let mut csv_reader = Reader::from_reader(reader);

        let mut records = Vec::new();
        for result in csv_reader.records() {
            let row = result?;
            let record = R::from_row(&row)
                .with_context(|| format!("bad row in {} for child {}", R::FILE_NAME, child_id))?;
            records.push(record);
        }

        debug!("Read {} records from {} for {}", records.len(), R::FILE_NAME, child_id);
        Ok(records)
    }

    /// Write all records of this kind for a child to their CSV file
    fn write_records(&self, child_id: &str, records: &[R]) -> Result<()> {
        let file_path = self.record_file_path(child_id)?;

        // Atomic write using temp file
        let temp_path = file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;

            let writer = BufWriter::new(file);
            let mut csv_writer = Writer::from_writer(writer);

            csv_writer.write_record(R::HEADERS)?;
            for record in records {
                csv_writer.write_record(record.to_row())?;
            }

            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &file_path)?;

        Ok(())
    }
}

impl<R: CsvRecord> RecordStorage<R> for RecordRepository<R> {
    fn store_record(&self, child_id: &str, record: &R) -> Result<()> {
        let mut records = self.read_records(child_id)?;
        records.push(record.clone());
        self.write_records(child_id, &records)
    }

    fn list_records(&self, child_id: &str) -> Result<Vec<R>> {
        let mut records = self.read_records(child_id)?;
        // Newest first, by date then time-of-day
        records.sort_by(|a, b| (b.date(), b.time()).cmp(&(a.date(), a.time())));
        Ok(records)
    }

    fn records_on_date(&self, child_id: &str, date: &str) -> Result<Vec<R>> {
        let records = self.read_records(child_id)?;
        Ok(records.into_iter().filter(|r| r.date() == date).collect())
    }

    fn records_in_range(&self, child_id: &str, start_date: &str, end_date: &str) -> Result<Vec<R>> {
        let records = self.read_records(child_id)?;
        Ok(records
            .into_iter()
            .filter(|r| r.date() >= start_date && r.date() <= end_date)
            .collect())
    }

    fn delete_record(&self, child_id: &str, record_id: &str) -> Result<bool> {
        let records = self.read_records(child_id)?;
        let before = records.len();
        let remaining: Vec<R> = records.into_iter().filter(|r| r.id() != record_id).collect();

        if remaining.len() == before {
            return Ok(false);
        }

        self.write_records(child_id, &remaining)?;
        Ok(true)
    }
}
