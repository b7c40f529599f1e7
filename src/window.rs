use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

use crate::holidays::{HolidayEntry, HolidayTable};
use crate::model::{Category, PriorityTier, RawRecord};

/// Turns recurring holidays into dated records relative to a reference day.
///
/// A holiday falling on `today` yields an immediate record. A holiday
/// `1..=horizon_days` ahead yields an "upcoming" advisory record, but only
/// when its tier is at least `advisory_min_tier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookaheadWindow {
    pub horizon_days: u32,
    pub advisory_min_tier: PriorityTier,
}

impl Default for LookaheadWindow {
    fn default() -> Self {
        Self {
            horizon_days: 7,
            advisory_min_tier: PriorityTier::High,
        }
    }
}

impl LookaheadWindow {
    pub fn new(horizon_days: u32, advisory_min_tier: PriorityTier) -> Self {
        Self {
            horizon_days,
            advisory_min_tier,
        }
    }

    pub fn scan(&self, table: &HolidayTable, today: NaiveDate) -> Vec<RawRecord> {
        let records: Vec<RawRecord> = table
            .entries()
            .iter()
            .filter_map(|entry| self.record_for(entry, today))
            .collect();
        debug!(
            %today,
            horizon_days = self.horizon_days,
            count = records.len(),
            "scanned holiday table"
        );
        records
    }

    fn record_for(&self, entry: &HolidayEntry, today: NaiveDate) -> Option<RawRecord> {
        let occurrence = entry.date.next_occurrence(today)?;
        let days_until = days_until(occurrence, today)?;

        if days_until == 0 {
            return Some(immediate_record(entry, occurrence));
        }
        if days_until <= self.horizon_days && entry.tier() >= self.advisory_min_tier {
            return Some(advisory_record(entry, occurrence, days_until));
        }
        None
    }
}

/// Whole days from `today` to `date`, or `None` if `date` is in the past.
pub fn days_until(date: NaiveDate, today: NaiveDate) -> Option<u32> {
    u32::try_from((date - today).num_days()).ok()
}

fn immediate_record(entry: &HolidayEntry, date: NaiveDate) -> RawRecord {
    base_record(entry, date, entry.categories.iter().map(|c| c.to_string()).collect())
        .with("id", format!("holiday_{}", entry.date))
        .with("name", entry.name.as_str())
        .with("name_en", entry.name_en.as_str())
        .with("lookahead_days", 0)
}

fn advisory_record(entry: &HolidayEntry, date: NaiveDate, days_until: u32) -> RawRecord {
    let categories = entry
        .categories
        .iter()
        .chain(std::iter::once(&Category::EarlyWarning))
        .map(|c| c.to_string())
        .collect();
    base_record(entry, date, categories)
        .with("id", format!("holiday_upcoming_{}", entry.date))
        .with("name", format!("即将到来: {}", entry.name))
        .with("name_en", format!("Upcoming: {}", entry.name_en))
        .with("lookahead_days", days_until)
}

fn base_record(entry: &HolidayEntry, date: NaiveDate, categories: Vec<String>) -> RawRecord {
    let mut record = RawRecord::new()
        .with("date", date.format("%Y-%m-%d").to_string())
        .with("categories", categories)
        .with("regions", entry.regions.clone());
    if let Some(tier) = entry.priority {
        record.insert("priority", tier.to_string());
    }
    if let Some(audience) = &entry.target_audience {
        record.insert("target_audience", Value::String(audience.clone()));
    }
    record
}
