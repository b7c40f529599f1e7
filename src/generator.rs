use chrono::{NaiveDate, Utc};
use tracing::{info, instrument};

use crate::content::TemplateCopywriter;
use crate::error::Result;
use crate::model::{Calendar, Event, SkippedRecord};
use crate::normalize::normalize_batch;
use crate::rank::{ensure_unique_ids, inject_fallback, rank, truncate};
use crate::settings::CalendarConfig;
use crate::sources::{SourceBatch, SourceRegistry};

/// Ranked, capped events for one day and the records rejected on the way.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    pub events: Vec<Event>,
    pub skipped: Vec<SkippedRecord>,
    pub fallback_injected: bool,
}

/// Merge, rank and cap the events from already-fetched source batches.
///
/// Runs normalization per batch, injects the fallback event when too few
/// events remain, de-duplicates ids, sorts and truncates. Pure apart from
/// logging.
pub fn assemble(batches: &[SourceBatch], today: NaiveDate, config: &CalendarConfig) -> Assembly {
    let mut events = Vec::new();
    let mut skipped = Vec::new();
    for batch in batches {
        let normalized = normalize_batch(&batch.records, batch.kind);
        events.extend(normalized.events);
        skipped.extend(normalized.skipped);
    }

    let fallback_injected = inject_fallback(&mut events, today, config.min_events);
    ensure_unique_ids(&mut events);
    let events = truncate(rank(events, config.rank_policy), config.max_events);

    Assembly {
        events,
        skipped,
        fallback_injected,
    }
}

/// Produces a [`Calendar`] from the configured sources.
pub struct CalendarGenerator {
    config: CalendarConfig,
    registry: SourceRegistry,
    copywriter: TemplateCopywriter,
}

impl CalendarGenerator {
    pub fn new(config: CalendarConfig, registry: SourceRegistry) -> Self {
        let copywriter = TemplateCopywriter::new(config.brand.clone());
        Self {
            config,
            registry,
            copywriter,
        }
    }

    /// Build a generator with the sources described by `config`.
    pub fn from_config(config: CalendarConfig) -> Result<Self> {
        config.validate()?;
        let registry = SourceRegistry::from_config(&config)?;
        Ok(Self::new(config, registry))
    }

    pub fn config(&self) -> &CalendarConfig {
        &self.config
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    #[instrument(skip(self))]
    pub async fn generate(&self, today: NaiveDate) -> Calendar {
        let batches = self.registry.collect(today).await;
        let Assembly {
            mut events,
            skipped,
            fallback_injected,
        } = assemble(&batches, today, &self.config);

        for event in &mut events {
            self.copywriter.enrich(event);
        }

        let calendar = Calendar::new(today, Utc::now(), events, skipped);
        info!(
            %today,
            total = calendar.total_events,
            skipped = calendar.skipped.len(),
            fallback_injected,
            "calendar generated"
        );
        calendar
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use itertools::Itertools;
    use serde_json::json;

    use super::*;
    use crate::holidays::HolidayTable;
    use crate::model::{PriorityTier, RawRecord, SourceKind};
    use crate::sources::tests::{FailingSource, StaticSource};
    use crate::sources::{CompetitorWatchSource, HolidaySource};
    use crate::window::LookaheadWindow;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn batch(kind: SourceKind, records: Vec<serde_json::Value>) -> SourceBatch {
        SourceBatch {
            name: kind.to_string(),
            kind,
            records: records
                .into_iter()
                .map(|r| serde_json::from_value::<RawRecord>(r).unwrap())
                .collect(),
            error: None,
        }
    }

    #[test]
    fn test_zero_records_yield_one_fallback() {
        let assembly = assemble(&[], date("2025-08-20"), &CalendarConfig::default());
        assert_eq!(assembly.events.len(), 1);
        assert_eq!(assembly.events[0].source_kind, SourceKind::Fallback);
        assert!(assembly.fallback_injected);
    }

    #[test]
    fn test_cap_and_monotonic_priority() {
        let records = (0..8)
            .map(|i| {
                let tier = ["low", "medium", "high"][i % 3];
                json!({"id": format!("e{i}"), "date": "2025-01-01", "name": format!("event {i}"), "priority": tier, "lookahead_days": i})
            })
            .collect_vec();
        let config = CalendarConfig::default();
        let assembly = assemble(
            &[batch(SourceKind::TrendFeed, records)],
            date("2025-01-01"),
            &config,
        );

        assert_eq!(assembly.events.len(), config.max_events);
        assert!(!assembly.fallback_injected);
        assert!(assembly
            .events
            .iter()
            .tuple_windows()
            .all(|(a, b)| a.priority_tier >= b.priority_tier));
        assert_eq!(
            assembly.events.iter().map(|e| e.id.as_str()).collect_vec(),
            vec!["e5", "e2", "e7", "e4", "e1"]
        );
    }

    #[test]
    fn test_malformed_record_does_not_abort() {
        let records = vec![
            json!({"date": "2025-01-01", "name": "a"}),
            json!({"date": "2025-01-01", "name": "b"}),
            json!({"name": "no date"}),
            json!({"date": "2025-01-01", "name": "d"}),
            json!({"date": "2025-01-01", "name": "e"}),
        ];
        let config = CalendarConfig::default().with_max_events(10);
        let assembly = assemble(
            &[batch(SourceKind::TrendFeed, records)],
            date("2025-01-01"),
            &config,
        );
        assert_eq!(assembly.events.len(), 4);
        assert_eq!(assembly.skipped.len(), 1);
        assert_eq!(assembly.skipped[0].index, 2);
    }

    #[test]
    fn test_merges_sources_before_ranking() {
        let holidays = batch(
            SourceKind::HolidayDb,
            vec![json!({"id": "holiday_upcoming_12-25", "date": "2025-12-25", "name": "即将到来: 圣诞节", "priority": "high", "lookahead_days": 5})],
        );
        let competitors = batch(
            SourceKind::CompetitorWatch,
            vec![
                json!({"id": "competitor_kling", "date": "2025-12-20", "name": "Kling", "priority": "medium"}),
                json!({"id": "competitor_pollo", "date": "2025-12-20", "name": "Pollo", "priority": "medium"}),
            ],
        );
        let assembly = assemble(
            &[competitors, holidays],
            date("2025-12-20"),
            &CalendarConfig::default(),
        );
        assert_eq!(
            assembly.events.iter().map(|e| e.id.as_str()).collect_vec(),
            vec!["holiday_upcoming_12-25", "competitor_kling", "competitor_pollo"]
        );
    }

    fn assert_distinct_ids(events: &[Event]) {
        let distinct = events.iter().map(|e| e.id.as_str()).unique().count();
        assert_eq!(distinct, events.len());
    }

    #[test]
    fn test_renamed_id_does_not_collide_with_source_id() {
        let records = ["a", "a", "a-2"]
            .iter()
            .map(|id| json!({"id": id, "date": "2025-01-02", "name": id}))
            .collect_vec();
        let assembly = assemble(
            &[batch(SourceKind::TrendFeed, records)],
            date("2025-01-02"),
            &CalendarConfig::default(),
        );
        assert_eq!(assembly.events.len(), 3);
        assert_distinct_ids(&assembly.events);
    }

    #[test]
    fn test_source_id_matching_fallback_id() {
        let records = vec![
            json!({"id": "fallback_2025-01-02", "date": "2025-01-02", "name": "trend"}),
        ];
        let assembly = assemble(
            &[batch(SourceKind::TrendFeed, records)],
            date("2025-01-02"),
            &CalendarConfig::default(),
        );
        assert!(assembly.fallback_injected);
        assert_eq!(assembly.events.len(), 2);
        assert_distinct_ids(&assembly.events);
        assert_eq!(
            assembly.events.iter().map(|e| e.id.as_str()).collect_vec(),
            vec!["fallback_2025-01-02-2", "fallback_2025-01-02"]
        );
    }

    #[tokio::test]
    async fn test_generate_end_to_end() {
        let registry = SourceRegistry::new()
            .with_source(HolidaySource::new(
                HolidayTable::builtin().unwrap(),
                LookaheadWindow::default(),
            ))
            .with_source(FailingSource)
            .with_source(CompetitorWatchSource::new(vec![
                "Pollo".to_string(),
                "Kling".to_string(),
            ]));
        let generator = CalendarGenerator::new(CalendarConfig::default(), registry);

        let calendar = generator.generate(date("2025-12-24")).await;

        assert_eq!(calendar.date, date("2025-12-24"));
        assert_eq!(calendar.total_events, 5);
        assert_eq!(
            calendar.events.iter().map(|e| e.id.as_str()).collect_vec(),
            vec![
                "holiday_upcoming_12-31",
                "holiday_upcoming_12-25",
                "holiday_12-24",
                "competitor_pollo_2025-12-24",
                "competitor_kling_2025-12-24",
            ]
        );
        assert!(calendar.events.iter().all(Event::is_enriched));
        assert_eq!(calendar.categories[&SourceKind::HolidayDb], 3);
        assert_eq!(calendar.categories[&SourceKind::CompetitorWatch], 2);
        assert_eq!(calendar.categories[&SourceKind::TrendFeed], 0);
        assert_eq!(calendar.high_priority().count(), 3);
    }

    #[tokio::test]
    async fn test_generate_with_only_failing_sources() {
        let registry = SourceRegistry::new().with_source(FailingSource);
        let generator = CalendarGenerator::new(CalendarConfig::default(), registry);

        let calendar = generator.generate(date("2025-08-20")).await;
        assert_eq!(calendar.total_events, 1);
        assert_eq!(calendar.events[0].source_kind, SourceKind::Fallback);
        assert!(calendar.events[0].is_enriched());
        assert_eq!(calendar.events[0].priority_tier, PriorityTier::Medium);
    }

    #[tokio::test]
    async fn test_generate_uses_configured_cap() {
        let records = (0..4)
            .map(|i| RawRecord::new().with("date", "2025-01-01").with("name", format!("n{i}")))
            .collect();
        let registry = SourceRegistry::new().with_source(StaticSource {
            kind: SourceKind::TrendFeed,
            records,
        });
        let config = CalendarConfig::default().with_max_events(2);
        let generator = CalendarGenerator::new(config, registry);

        let calendar = generator.generate(date("2025-01-01")).await;
        assert_eq!(calendar.total_events, 2);
        assert_eq!(calendar.events[0].display_name, "n0");
    }
}
