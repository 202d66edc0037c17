//! Daily report engine.
//!
//! Pure functions that turn a child plus raw event collections into a
//! `DailyReport`: same-day counts and sleep totals, a trailing 7-day sleep
//! trend, and the child's age in whole months. Nothing here touches
//! storage; the service layer hands in already-materialized collections
//! and every invocation is independent and reentrant.

use chrono::{Datelike, NaiveDate, NaiveTime};
use std::collections::HashSet;
use thiserror::Error;

use crate::domain::models::child::Child;
use shared::{
    ChildSummary, DailyReport, FeedingRecord, FeedingReportEntry, GrowthRecord, GrowthReportEntry,
    MedicationRecord, MedicationReportEntry, NappyChangeRecord, NappyChangeReportEntry,
    RecordsByKind, SleepRecord, SleepReportEntry, TemperatureRecord, TemperatureReportEntry,
    TodaySummary, WeeklySleepStats, WeeklyStats,
};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Errors intrinsic to report computation. A single malformed date or time
/// fails the whole report; skipping the record would silently corrupt the
/// totals and averages built from it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("malformed {field} value {value:?}, expected {expected}")]
    MalformedTemporalValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Parse a zero-padded ISO calendar date.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ReportError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        ReportError::MalformedTemporalValue {
            field,
            value: value.to_string(),
            expected: "YYYY-MM-DD",
        }
    })
}

fn parse_time(field: &'static str, value: &str) -> Result<NaiveTime, ReportError> {
    NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|_| {
        ReportError::MalformedTemporalValue {
            field,
            value: value.to_string(),
            expected: "HH:MM",
        }
    })
}

/// Minutes between two times-of-day. An end time numerically before the
/// start time means the interval crosses midnight, so a day is added.
/// This one routine feeds today's total, the weekly total, and the
/// per-record durations in the report body.
pub fn duration_minutes(start: &str, end: &str) -> Result<i64, ReportError> {
    let start = parse_time("start_time", start)?;
    let end = parse_time("end_time", end)?;
    let mut minutes = (end - start).num_minutes();
    if minutes < 0 {
        minutes += 24 * 60;
    }
    Ok(minutes)
}

/// Age in whole months at `on` for a child born on `birth`.
///
/// Decrements by one whenever the day-of-month hasn't been reached yet,
/// regardless of how long the months involved actually are. Known
/// approximation kept for compatibility with historical reports.
pub fn age_in_months(birth: NaiveDate, on: NaiveDate) -> i32 {
    let mut months = (on.year() - birth.year()) * 12 + (on.month() as i32 - birth.month() as i32);
    if on.day() < birth.day() {
        months -= 1;
    }
    months
}

/// Aggregate the weekly sleep window. Averages divide by the number of
/// distinct dates that have at least one record; with no records at all
/// the denominator clamps to 1 and both averages come out 0.
pub fn weekly_sleep_stats(intervals: &[SleepRecord]) -> Result<WeeklySleepStats, ReportError> {
    let mut total_minutes: i64 = 0;
    let mut nap_count: u32 = 0;
    let mut active_days: HashSet<&str> = HashSet::new();

    for record in intervals {
        active_days.insert(record.sleep_date.as_str());
        total_minutes += duration_minutes(&record.start_time, &record.end_time)?;
        if record.sleep_type.is_nap() {
            nap_count += 1;
        }
    }

    let day_count = active_days.len().max(1) as f64;

    Ok(WeeklySleepStats {
        total_sleep_minutes: total_minutes,
        avg_naps_per_day: round1(f64::from(nap_count) / day_count),
        avg_sleep_hours: round1(total_minutes as f64 / day_count / 60.0),
    })
}

/// Raw same-day record collections, one field per event kind.
#[derive(Debug, Clone, Default)]
pub struct DayRecords {
    pub sleep: Vec<SleepRecord>,
    pub feeding: Vec<FeedingRecord>,
    pub nappy: Vec<NappyChangeRecord>,
    pub medication: Vec<MedicationRecord>,
    pub temperature: Vec<TemperatureRecord>,
    pub growth: Vec<GrowthRecord>,
}

fn today_summary(day: &DayRecords) -> Result<TodaySummary, ReportError> {
    let mut sleep_minutes: i64 = 0;
    for record in &day.sleep {
        sleep_minutes += duration_minutes(&record.start_time, &record.end_time)?;
    }

    Ok(TodaySummary {
        sleep_hours: round1(sleep_minutes as f64 / 60.0),
        naps_count: day.sleep.iter().filter(|r| r.sleep_type.is_nap()).count() as u32,
        feeds_count: day.feeding.len() as u32,
        nappy_changes: day.nappy.len() as u32,
        medication_given: !day.medication.is_empty(),
        temperature_taken: !day.temperature.is_empty(),
    })
}

/// Build the full daily report for one child and one target date.
///
/// `weekly_sleep` must already be restricted to the 7-day window ending on
/// `date`; the caller does that selection against storage. Fails on the
/// first unparseable date or time rather than producing a partial report.
pub fn build_daily_report(
    child: &Child,
    date: &str,
    day: &DayRecords,
    weekly_sleep: &[SleepRecord],
) -> Result<DailyReport, ReportError> {
    let target_date = parse_date("date", date)?;

    let sleep_entries = day
        .sleep
        .iter()
        .map(|r| {
            Ok(SleepReportEntry {
                id: r.id.clone(),
                sleep_type: r.sleep_type,
                start_time: r.start_time.clone(),
                end_time: r.end_time.clone(),
                duration_minutes: duration_minutes(&r.start_time, &r.end_time)?,
            })
        })
        .collect::<Result<Vec<_>, ReportError>>()?;

    Ok(DailyReport {
        child: ChildSummary {
            id: child.id.clone(),
            name: child.name.clone(),
            sex: child.sex.clone(),
            date_of_birth: child.date_of_birth.format(DATE_FORMAT).to_string(),
            age_months: age_in_months(child.date_of_birth, target_date),
        },
        date: date.to_string(),
        today_summary: today_summary(day)?,
        weekly_stats: WeeklyStats {
            sleep: weekly_sleep_stats(weekly_sleep)?,
        },
        records: RecordsByKind {
            sleep: sleep_entries,
            feeding: day
                .feeding
                .iter()
                .map(|r| FeedingReportEntry {
                    id: r.id.clone(),
                    feed_time: r.feed_time.clone(),
                    feed_type: r.feed_type.clone(),
                    food_name: r.food_name.clone(),
                    feed_amount: r.feed_amount.clone(),
                })
                .collect(),
            nappy: day
                .nappy
                .iter()
                .map(|r| NappyChangeReportEntry {
                    id: r.id.clone(),
                    change_time: r.change_time.clone(),
                    change_type: r.change_type.clone(),
                })
                .collect(),
            medication: day
                .medication
                .iter()
                .map(|r| MedicationReportEntry {
                    id: r.id.clone(),
                    medication_time: r.medication_time.clone(),
                    medication_type: r.medication_type.clone(),
                    dosage: r.dosage.clone(),
                })
                .collect(),
            temperature: day
                .temperature
                .iter()
                .map(|r| TemperatureReportEntry {
                    id: r.id.clone(),
                    temperature_time: r.temperature_time.clone(),
                    temperature: r.temperature.clone(),
                })
                .collect(),
            growth: day
                .growth
                .iter()
                .map(|r| GrowthReportEntry {
                    id: r.id.clone(),
                    weight: r.weight.clone(),
                    height: r.height.clone(),
                })
                .collect(),
        },
    })
}

// Ties round to even, the way every historical report was rounded.
fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::SleepType;

    fn test_child() -> Child {
        let now = Utc::now();
        Child {
            id: "child::1".to_string(),
            name: "Test Child".to_string(),
            sex: "F".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2023, 5, 15).unwrap(),
            created_at: now,
            updated_at: now,
        }
    }

    fn sleep(date: &str, sleep_type: SleepType, start: &str, end: &str) -> SleepRecord {
        SleepRecord {
            id: format!("sleep::{}-{}", date, start),
            child_id: "child::1".to_string(),
            sleep_date: date.to_string(),
            sleep_type,
            start_time: start.to_string(),
            end_time: end.to_string(),
        }
    }

    #[test]
    fn test_duration_handles_midnight_wrap() {
        assert_eq!(duration_minutes("22:00", "06:00").unwrap(), 480);
        assert_eq!(duration_minutes("08:00", "09:30").unwrap(), 90);
        assert_eq!(duration_minutes("09:00", "09:00").unwrap(), 0);
    }

    #[test]
    fn test_duration_rejects_malformed_time() {
        let err = duration_minutes("not-a-time", "06:00").unwrap_err();
        assert_eq!(
            err,
            ReportError::MalformedTemporalValue {
                field: "start_time",
                value: "not-a-time".to_string(),
                expected: "HH:MM",
            }
        );
        assert!(duration_minutes("22:00", "24:61").is_err());
    }

    #[test]
    fn test_age_in_months_day_shortfall() {
        let birth = NaiveDate::from_ymd_opt(2023, 5, 15).unwrap();
        let day_before = NaiveDate::from_ymd_opt(2024, 5, 14).unwrap();
        let birthday = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        assert_eq!(age_in_months(birth, day_before), 11);
        assert_eq!(age_in_months(birth, birthday), 12);
    }

    #[test]
    fn test_age_in_months_decrements_across_short_months() {
        // Born on the 30th: Feb 28 is the end of the month but the rule
        // still sees day 28 < day 30 and decrements.
        let birth = NaiveDate::from_ymd_opt(2023, 1, 30).unwrap();
        let on = NaiveDate::from_ymd_opt(2023, 2, 28).unwrap();
        assert_eq!(age_in_months(birth, on), 0);
    }

    #[test]
    fn test_weekly_stats_average_over_active_days_only() {
        // 900 minutes across 2 distinct dates, 3 day-naps.
        let intervals = vec![
            sleep("2024-03-01", SleepType::DayTimeNap, "09:00", "10:00"), // 60
            sleep("2024-03-01", SleepType::DayTimeNap, "13:00", "15:00"), // 120
            sleep("2024-03-04", SleepType::DayTimeNap, "12:00", "14:00"), // 120
            sleep("2024-03-04", SleepType::NightSleep, "20:00", "06:00"), // 600
        ];
        let stats = weekly_sleep_stats(&intervals).unwrap();
        assert_eq!(stats.total_sleep_minutes, 900);
        assert_eq!(stats.avg_sleep_hours, 7.5);
        assert_eq!(stats.avg_naps_per_day, 1.5);
    }

    #[test]
    fn test_weekly_stats_round_ties_to_even() {
        // 5 naps over 4 active days: 1.25 rounds down to 1.2, not up.
        let intervals = vec![
            sleep("2024-03-01", SleepType::DayTimeNap, "09:00", "10:00"),
            sleep("2024-03-01", SleepType::DayTimeNap, "13:00", "14:00"),
            sleep("2024-03-02", SleepType::DayTimeNap, "09:00", "10:00"),
            sleep("2024-03-03", SleepType::DayTimeNap, "09:00", "10:00"),
            sleep("2024-03-04", SleepType::DayTimeNap, "09:00", "10:00"),
        ];
        let stats = weekly_sleep_stats(&intervals).unwrap();
        assert_eq!(stats.avg_naps_per_day, 1.2);
        // 300 minutes / 4 days / 60 = 1.25 hours as well
        assert_eq!(stats.avg_sleep_hours, 1.2);
    }

    #[test]
    fn test_weekly_stats_empty_window_guard() {
        let stats = weekly_sleep_stats(&[]).unwrap();
        assert_eq!(stats.total_sleep_minutes, 0);
        assert_eq!(stats.avg_sleep_hours, 0.0);
        assert_eq!(stats.avg_naps_per_day, 0.0);
    }

    #[test]
    fn test_today_summary_counts_and_flags() {
        let day = DayRecords {
            sleep: vec![
                sleep("2024-03-04", SleepType::DayTimeNap, "09:00", "10:30"),
                sleep("2024-03-04", SleepType::NightSleep, "20:00", "06:00"),
            ],
            feeding: vec![
                FeedingRecord {
                    id: "feeding::1".to_string(),
                    child_id: "child::1".to_string(),
                    feed_date: "2024-03-04".to_string(),
                    feed_time: "08:00".to_string(),
                    feed_type: "Bottle".to_string(),
                    food_name: None,
                    feed_amount: Some("120ml".to_string()),
                },
                FeedingRecord {
                    id: "feeding::2".to_string(),
                    child_id: "child::1".to_string(),
                    feed_date: "2024-03-04".to_string(),
                    feed_time: "12:00".to_string(),
                    feed_type: "Solid".to_string(),
                    food_name: Some("Porridge".to_string()),
                    feed_amount: None,
                },
            ],
            temperature: vec![
                TemperatureRecord {
                    id: "temperature::1".to_string(),
                    child_id: "child::1".to_string(),
                    date: "2024-03-04".to_string(),
                    temperature_time: "07:30".to_string(),
                    temperature: "36.8".to_string(),
                },
                TemperatureRecord {
                    id: "temperature::2".to_string(),
                    child_id: "child::1".to_string(),
                    date: "2024-03-04".to_string(),
                    temperature_time: "19:00".to_string(),
                    temperature: "37.1".to_string(),
                },
            ],
            ..DayRecords::default()
        };

        let report = build_daily_report(&test_child(), "2024-03-04", &day, &[]).unwrap();
        let summary = &report.today_summary;
        // 90 + 600 minutes, the night interval wrapping midnight.
        assert_eq!(summary.sleep_hours, 11.5);
        assert_eq!(summary.naps_count, 1);
        assert_eq!(summary.feeds_count, 2);
        assert_eq!(summary.nappy_changes, 0);
        assert!(!summary.medication_given);
        assert!(summary.temperature_taken);
    }

    #[test]
    fn test_report_echoes_date_and_carries_per_record_durations() {
        let day = DayRecords {
            sleep: vec![sleep("2024-03-04", SleepType::NightSleep, "22:00", "06:00")],
            ..DayRecords::default()
        };
        let report = build_daily_report(&test_child(), "2024-03-04", &day, &day.sleep).unwrap();
        assert_eq!(report.date, "2024-03-04");
        assert_eq!(report.child.age_months, 9);
        assert_eq!(report.records.sleep.len(), 1);
        assert_eq!(report.records.sleep[0].duration_minutes, 480);
    }

    #[test]
    fn test_report_is_idempotent() {
        let day = DayRecords {
            sleep: vec![
                sleep("2024-03-04", SleepType::DayTimeNap, "09:00", "10:00"),
                sleep("2024-03-04", SleepType::NightSleep, "20:30", "05:45"),
            ],
            ..DayRecords::default()
        };
        let weekly = vec![
            sleep("2024-03-01", SleepType::DayTimeNap, "13:00", "14:10"),
            sleep("2024-03-04", SleepType::NightSleep, "20:30", "05:45"),
        ];
        let first = build_daily_report(&test_child(), "2024-03-04", &day, &weekly).unwrap();
        let second = build_daily_report(&test_child(), "2024-03-04", &day, &weekly).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_malformed_record_fails_whole_report() {
        let day = DayRecords {
            sleep: vec![
                sleep("2024-03-04", SleepType::DayTimeNap, "09:00", "10:00"),
                sleep("2024-03-04", SleepType::DayTimeNap, "not-a-time", "15:00"),
            ],
            ..DayRecords::default()
        };
        let err = build_daily_report(&test_child(), "2024-03-04", &day, &[]).unwrap_err();
        assert!(matches!(
            err,
            ReportError::MalformedTemporalValue { field: "start_time", .. }
        ));
    }

    #[test]
    fn test_malformed_target_date_is_rejected() {
        let err = build_daily_report(&test_child(), "04/03/2024", &DayRecords::default(), &[])
            .unwrap_err();
        assert!(matches!(
            err,
            ReportError::MalformedTemporalValue { field: "date", .. }
        ));
    }

    #[test]
    fn test_malformed_weekly_record_fails_whole_report() {
        let weekly = vec![sleep("2024-03-02", SleepType::NightSleep, "21:00", "bad")];
        let err = build_daily_report(&test_child(), "2024-03-04", &DayRecords::default(), &weekly)
            .unwrap_err();
        assert!(matches!(
            err,
            ReportError::MalformedTemporalValue { field: "end_time", .. }
        ));
    }
}
