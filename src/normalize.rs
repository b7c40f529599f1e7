use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use chrono::NaiveDate;
use itertools::Itertools;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{CalendarError, Result};
use crate::model::{
    Category, Event, ImagePrompt, MarketingCopy, PriorityTier, RawRecord, SkippedRecord,
    SourceKind,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

const ID_KEYS: &[&str] = &["id"];
const DATE_KEYS: &[&str] = &["date"];
const NAME_KEYS: &[&str] = &["display_name", "name", "event_name"];
const NAME_EN_KEYS: &[&str] = &["display_name_en", "name_en", "event_name_en"];
const CATEGORY_KEYS: &[&str] = &["categories", "category", "type"];
const PRIORITY_KEYS: &[&str] = &["priority_tier", "priority"];
const REGION_KEYS: &[&str] = &["regions", "region"];
const AUDIENCE_KEYS: &[&str] = &["target_audience"];
const LOOKAHEAD_KEYS: &[&str] = &["lookahead_days", "alert_days"];
const COPY_KEY: &str = "marketing_copy";
const PROMPTS_KEY: &str = "image_prompts";
const ENRICHMENT_KEYS: &[&str] = &[COPY_KEY, PROMPTS_KEY];
/// Fields carried by other sources that describe the source, not the event.
const IGNORED_KEYS: &[&str] = &["source", "source_kind"];

const GLOBAL_REGION: &str = "global";

/// Events produced from one batch plus the records that were rejected.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub events: Vec<Event>,
    pub skipped: Vec<SkippedRecord>,
}

/// Normalize every record of a batch, skipping malformed ones.
pub fn normalize_batch(records: &[RawRecord], source_kind: SourceKind) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();
    for (index, record) in records.iter().enumerate() {
        match normalize(record, source_kind) {
            Ok(event) => batch.events.push(event),
            Err(e) => {
                warn!(%source_kind, index, error = %e, "skipping malformed record");
                batch.skipped.push(SkippedRecord {
                    source_kind,
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }
    debug!(
        %source_kind,
        events = batch.events.len(),
        skipped = batch.skipped.len(),
        "normalized batch"
    );
    batch
}

/// Convert one raw record into a canonical [`Event`].
///
/// A date and at least one display name are required; every other field
/// falls back to a default.
pub fn normalize(record: &RawRecord, source_kind: SourceKind) -> Result<Event> {
    let date = parse_date(record, source_kind)?;

    let name = record.str_of(NAME_KEYS);
    let name_en = record.str_of(NAME_EN_KEYS);
    let (display_name, display_name_en) = match (name, name_en) {
        (Some(zh), Some(en)) => (zh.to_owned(), en.to_owned()),
        (Some(only), None) | (None, Some(only)) => (only.to_owned(), only.to_owned()),
        (None, None) => {
            return Err(CalendarError::malformed(source_kind, "missing event name"));
        }
    };

    let categories = parse_categories(record);
    let priority_tier = parse_priority(record);
    let regions = parse_regions(record);
    let target_audience = record
        .str_of(AUDIENCE_KEYS)
        .map(str::to_owned)
        .unwrap_or_else(|| default_audience(&categories).to_owned());
    let lookahead_days = record
        .first_of(LOOKAHEAD_KEYS)
        .and_then(Value::as_u64)
        .and_then(|days| u32::try_from(days).ok())
        .unwrap_or(0);
    let id = record
        .str_of(ID_KEYS)
        .map(str::to_owned)
        .unwrap_or_else(|| derive_id(source_kind, date, &display_name_en));

    let marketing_copy = record
        .get(COPY_KEY)
        .filter(|v| !v.is_null())
        .and_then(|v| serde_json::from_value::<MarketingCopy>(v.clone()).ok());
    let image_prompts = record
        .get(PROMPTS_KEY)
        .and_then(|v| serde_json::from_value::<Vec<ImagePrompt>>(v.clone()).ok())
        .unwrap_or_default();

    Ok(Event {
        id,
        date,
        display_name,
        display_name_en,
        categories,
        priority_tier,
        regions,
        target_audience,
        lookahead_days,
        source_kind,
        metadata: collect_metadata(record),
        marketing_copy,
        image_prompts,
    })
}

fn parse_date(record: &RawRecord, source_kind: SourceKind) -> Result<NaiveDate> {
    let raw = record
        .str_of(DATE_KEYS)
        .ok_or_else(|| CalendarError::malformed(source_kind, "missing date"))?;
    // feeds sometimes send full timestamps; only the calendar day matters
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, DATE_FORMAT).map_err(|e| {
        CalendarError::malformed(source_kind, format!("invalid date {raw:?}: {e}"))
    })
}

fn parse_categories(record: &RawRecord) -> BTreeSet<Category> {
    let categories: BTreeSet<Category> = record
        .strings_of(CATEGORY_KEYS)
        .iter()
        .filter_map(|tag| match Category::from_str(tag) {
            Ok(category) => Some(category),
            Err(_) => {
                debug!(tag = %tag, "ignoring unknown category");
                None
            }
        })
        .collect();
    if categories.is_empty() {
        BTreeSet::from([Category::Uncategorized])
    } else {
        categories
    }
}

fn parse_priority(record: &RawRecord) -> PriorityTier {
    record
        .str_of(PRIORITY_KEYS)
        .and_then(|raw| PriorityTier::from_str(raw).ok())
        .unwrap_or_default()
}

fn parse_regions(record: &RawRecord) -> Vec<String> {
    let regions = record
        .strings_of(REGION_KEYS)
        .into_iter()
        .unique()
        .collect_vec();
    if regions.is_empty() {
        vec![GLOBAL_REGION.to_string()]
    } else {
        regions
    }
}

/// Placeholder audience picked from the event's categories, in the
/// calendar's primary (Chinese) locale.
pub fn default_audience(categories: &BTreeSet<Category>) -> &'static str {
    if categories.contains(&Category::EcommerceMilestone) {
        "在线购物者、礼物购买者、电商卖家"
    } else if categories.contains(&Category::HolidayMarketing) {
        "品牌营销人员、社交媒体运营者、内容创作者"
    } else {
        "普通用户、创意设计师"
    }
}

fn derive_id(source_kind: SourceKind, date: NaiveDate, name: &str) -> String {
    let slug = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                '-'
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .join("-");
    format!("{source_kind}_{}_{slug}", date.format(DATE_FORMAT))
}

fn collect_metadata(record: &RawRecord) -> BTreeMap<String, String> {
    let known = [
        ID_KEYS,
        DATE_KEYS,
        NAME_KEYS,
        NAME_EN_KEYS,
        CATEGORY_KEYS,
        PRIORITY_KEYS,
        REGION_KEYS,
        AUDIENCE_KEYS,
        LOOKAHEAD_KEYS,
        IGNORED_KEYS,
        ENRICHMENT_KEYS,
    ];
    record
        .iter()
        .filter(|(key, _)| !known.iter().any(|keys| keys.contains(&key.as_str())))
        .filter_map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key.clone(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> RawRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_full_record() {
        let event = normalize(
            &record(json!({
                "id": "holiday_12-25",
                "date": "2025-12-25",
                "name": "圣诞节",
                "name_en": "Christmas",
                "categories": ["holiday-marketing", "e-commerce-milestone"],
                "priority": "high",
                "regions": ["global"],
                "target_audience": "Everyone",
                "lookahead_days": 0
            })),
            SourceKind::HolidayDb,
        )
        .unwrap();

        assert_eq!(event.id, "holiday_12-25");
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2025, 12, 25).unwrap());
        assert_eq!(event.display_name, "圣诞节");
        assert_eq!(event.display_name_en, "Christmas");
        assert_eq!(event.priority_tier, PriorityTier::High);
        assert_eq!(event.categories.len(), 2);
        assert_eq!(event.target_audience, "Everyone");
        assert_eq!(event.source_kind, SourceKind::HolidayDb);
        assert!(event.metadata.is_empty());
        assert!(event.marketing_copy.is_none());
    }

    #[test]
    fn test_defaults_are_filled() {
        let event = normalize(
            &record(json!({"date": "2025-03-01", "name_en": "Spring Sale"})),
            SourceKind::TrendFeed,
        )
        .unwrap();

        assert_eq!(event.priority_tier, PriorityTier::Low);
        assert_eq!(event.categories, BTreeSet::from([Category::Uncategorized]));
        assert_eq!(event.regions, vec!["global"]);
        assert_eq!(event.target_audience, "普通用户、创意设计师");
        assert_eq!(event.lookahead_days, 0);
        assert_eq!(event.display_name, "Spring Sale");
        assert_eq!(event.id, "trend-feed_2025-03-01_spring-sale");
    }

    #[test]
    fn test_unknown_priority_and_categories() {
        let event = normalize(
            &record(json!({
                "date": "2025-03-01",
                "name": "春季促销",
                "priority": "urgent",
                "type": ["电商节点", "mystery"]
            })),
            SourceKind::TrendFeed,
        )
        .unwrap();

        assert_eq!(event.priority_tier, PriorityTier::Low);
        assert_eq!(
            event.categories,
            BTreeSet::from([Category::EcommerceMilestone])
        );
        assert_eq!(event.target_audience, "在线购物者、礼物购买者、电商卖家");
    }

    #[test]
    fn test_legacy_field_names() {
        let event = normalize(
            &record(json!({
                "id": "youtube_abc",
                "event_name": "YouTube热门: AI art",
                "event_name_en": "YouTube Trending: AI art",
                "source": "youtube_trending",
                "date": "2025-01-23",
                "priority": "中",
                "alert_days": 2,
                "video_url": "https://youtube.com/watch?v=abc",
                "channel": "Creators"
            })),
            SourceKind::TrendFeed,
        )
        .unwrap();

        assert_eq!(event.priority_tier, PriorityTier::Medium);
        assert_eq!(event.lookahead_days, 2);
        assert_eq!(event.metadata.len(), 2);
        assert_eq!(event.metadata["channel"], "Creators");
        assert!(!event.metadata.contains_key("source"));
    }

    #[test]
    fn test_missing_date_is_malformed() {
        let err = normalize(&record(json!({"name": "无日期"})), SourceKind::TrendFeed)
            .unwrap_err();
        assert!(matches!(
            err,
            CalendarError::MalformedRecord {
                source_kind: SourceKind::TrendFeed,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_names_is_malformed() {
        let err = normalize(
            &record(json!({"date": "2025-01-01", "name": "  "})),
            SourceKind::CompetitorWatch,
        )
        .unwrap_err();
        assert!(err.to_string().contains("missing event name"));
    }

    #[test]
    fn test_invalid_date_is_malformed() {
        let err = normalize(
            &record(json!({"date": "25th of December", "name": "圣诞节"})),
            SourceKind::HolidayDb,
        )
        .unwrap_err();
        assert!(matches!(err, CalendarError::MalformedRecord { .. }));
    }

    #[test]
    fn test_timestamp_date_is_truncated_to_day() {
        let event = normalize(
            &record(json!({"date": "2025-01-23T08:30:00Z", "name": "x"})),
            SourceKind::TrendFeed,
        )
        .unwrap();
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2025, 1, 23).unwrap());
    }

    #[test]
    fn test_batch_isolates_malformed_records() {
        let records = vec![
            record(json!({"date": "2025-01-01", "name": "a"})),
            record(json!({"date": "2025-01-01", "name": "b"})),
            record(json!({"name": "c"})),
            record(json!({"date": "2025-01-01", "name": "d"})),
            record(json!({"date": "2025-01-01", "name": "e"})),
        ];
        let batch = normalize_batch(&records, SourceKind::TrendFeed);

        assert_eq!(batch.events.len(), 4);
        assert_eq!(batch.skipped.len(), 1);
        assert_eq!(batch.skipped[0].index, 2);
        assert_eq!(
            batch
                .events
                .iter()
                .map(|e| e.display_name.as_str())
                .collect_vec(),
            vec!["a", "b", "d", "e"]
        );
    }

    #[test]
    fn test_copy_is_passed_through() {
        let copy = json!({
            "zh": {"headline": "标题", "body": "正文", "cta": "立即体验 →", "hashtags": ["#AI设计"]},
            "en": {"headline": "Title", "body": "Body", "cta": "Try Now →", "hashtags": ["#AIDesign"]}
        });
        let event = normalize(
            &record(json!({"date": "2025-01-01", "name": "x", "marketing_copy": copy})),
            SourceKind::TrendFeed,
        )
        .unwrap();
        assert_eq!(event.marketing_copy.unwrap().en.headline, "Title");
    }
}
