use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CalendarError, Result};
use crate::model::{Category, PriorityTier};

const BUILTIN_TABLE: &str = include_str!("../data/holidays.json");

/// A recurring leap day may be up to eight years away.
const MAX_YEARS_AHEAD: i32 = 8;

/// When a holiday takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HolidayDate {
    /// Every year on the same month and day (`"12-25"`).
    Recurring { month: u32, day: u32 },
    /// A one-off date (`"2025-11-27"`).
    Fixed(NaiveDate),
}

impl HolidayDate {
    /// The first date on or after `today` the holiday falls on. One-off
    /// dates already in the past have no next occurrence.
    pub fn next_occurrence(&self, today: NaiveDate) -> Option<NaiveDate> {
        match *self {
            HolidayDate::Fixed(date) => (date >= today).then_some(date),
            HolidayDate::Recurring { month, day } => (today.year()
                ..=today.year() + MAX_YEARS_AHEAD)
                .filter_map(|year| NaiveDate::from_ymd_opt(year, month, day))
                .find(|date| *date >= today),
        }
    }
}

impl FromStr for HolidayDate {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(HolidayDate::Fixed(date));
        }
        let invalid = || CalendarError::HolidayTable {
            reason: format!("invalid holiday date {s:?}, expected MM-DD or YYYY-MM-DD"),
        };
        let (month, day) = s
            .split('-')
            .map(|part| part.parse::<u32>())
            .collect_tuple()
            .ok_or_else(invalid)?;
        let (month, day) = (month.map_err(|_| invalid())?, day.map_err(|_| invalid())?);
        // 2000 is a leap year, so 02-29 is accepted here
        NaiveDate::from_ymd_opt(2000, month, day).ok_or_else(invalid)?;
        Ok(HolidayDate::Recurring { month, day })
    }
}

impl TryFrom<String> for HolidayDate {
    type Error = CalendarError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl Display for HolidayDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HolidayDate::Recurring { month, day } => write!(f, "{month:02}-{day:02}"),
            HolidayDate::Fixed(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl From<HolidayDate> for String {
    fn from(date: HolidayDate) -> Self {
        date.to_string()
    }
}

/// One row of the holiday table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolidayEntry {
    pub date: HolidayDate,
    pub name: String,
    pub name_en: String,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub priority: Option<PriorityTier>,
    #[serde(default)]
    pub target_audience: Option<String>,
}

impl HolidayEntry {
    /// Entries without a tier rank as low.
    pub fn tier(&self) -> PriorityTier {
        self.priority.unwrap_or_default()
    }
}

/// Holiday calendar data, loaded from JSON.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HolidayTable {
    entries: Vec<HolidayEntry>,
}

impl HolidayTable {
    /// The table shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_TABLE)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<HolidayEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| CalendarError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let table = Self::from_json(&json)?;
        debug!(path = %path.display(), entries = table.len(), "loaded holiday table");
        Ok(table)
    }

    pub fn new(entries: Vec<HolidayEntry>) -> Result<Self> {
        if let Some(entry) = entries
            .iter()
            .find(|e| e.name.trim().is_empty() && e.name_en.trim().is_empty())
        {
            return Err(CalendarError::HolidayTable {
                reason: format!("entry {} has no name", entry.date),
            });
        }
        if let Some(date) = entries.iter().map(|e| e.date).duplicates().next() {
            return Err(CalendarError::HolidayTable {
                reason: format!("duplicate entry for {date}"),
            });
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[HolidayEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
