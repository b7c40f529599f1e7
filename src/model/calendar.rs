use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::event::{Event, PriorityTier, SourceKind};

/// Event counts keyed by the source kind that produced them.
pub type SourceCounts = BTreeMap<SourceKind, usize>;

/// The generated calendar artifact for one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calendar {
    pub date: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub total_events: usize,
    pub categories: SourceCounts,
    pub events: Vec<Event>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedRecord>,
}

/// A raw record the normalizer rejected, kept for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub source_kind: SourceKind,
    pub index: usize,
    pub reason: String,
}

impl Calendar {
    pub fn new(
        date: NaiveDate,
        generated_at: DateTime<Utc>,
        events: Vec<Event>,
        skipped: Vec<SkippedRecord>,
    ) -> Self {
        Self {
            date,
            generated_at,
            total_events: events.len(),
            categories: count_by_source(&events),
            events,
            skipped,
        }
    }

    pub fn high_priority(&self) -> impl Iterator<Item = &Event> {
        self.events
            .iter()
            .filter(|e| e.priority_tier == PriorityTier::High)
    }
}

/// Tally events per source kind. Every kind is present, possibly with zero.
pub fn count_by_source(events: &[Event]) -> SourceCounts {
    let mut counts: SourceCounts = SourceKind::ALL.iter().map(|k| (*k, 0)).collect();
    for event in events {
        *counts.entry(event.source_kind).or_default() += 1;
    }
    counts
}
