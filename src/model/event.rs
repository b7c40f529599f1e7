use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

use super::content::{ImagePrompt, MarketingCopy};

/// Priority classification of an event. Ordered `Low < Medium < High`.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum PriorityTier {
    #[default]
    #[serde(alias = "低")]
    #[strum(to_string = "low", serialize = "低")]
    Low,
    #[serde(alias = "中")]
    #[strum(to_string = "medium", serialize = "中")]
    Medium,
    #[serde(alias = "高")]
    #[strum(to_string = "high", serialize = "高")]
    High,
}

/// Tag from the fixed category vocabulary.
///
/// Both the kebab-case English tags and the Chinese labels used by the
/// operations team are accepted when parsing.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    strum_macros::Display,
)]
#[strum(ascii_case_insensitive)]
pub enum Category {
    #[serde(rename = "holiday-marketing", alias = "节日营销")]
    #[strum(to_string = "holiday-marketing", serialize = "节日营销")]
    HolidayMarketing,
    #[serde(rename = "e-commerce-milestone", alias = "电商节点")]
    #[strum(to_string = "e-commerce-milestone", serialize = "电商节点")]
    EcommerceMilestone,
    #[serde(rename = "user-behavior", alias = "用户行为")]
    #[strum(to_string = "user-behavior", serialize = "用户行为")]
    UserBehavior,
    #[serde(rename = "industry-trend", alias = "行业趋势")]
    #[strum(to_string = "industry-trend", serialize = "行业趋势")]
    IndustryTrend,
    #[serde(rename = "competitor-feature", alias = "竞品功能")]
    #[strum(to_string = "competitor-feature", serialize = "竞品功能")]
    CompetitorFeature,
    #[serde(rename = "early-warning", alias = "提前预警")]
    #[strum(to_string = "early-warning", serialize = "提前预警")]
    EarlyWarning,
    #[serde(rename = "uncategorized")]
    #[strum(to_string = "uncategorized")]
    Uncategorized,
}

/// Which kind of source produced an event.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SourceKind {
    HolidayDb,
    TrendFeed,
    CompetitorWatch,
    Fallback,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::HolidayDb,
        SourceKind::TrendFeed,
        SourceKind::CompetitorWatch,
        SourceKind::Fallback,
    ];
}

/// A single dated, categorized and prioritized marketing opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub date: NaiveDate,
    pub display_name: String,
    pub display_name_en: String,
    pub categories: BTreeSet<Category>,
    pub priority_tier: PriorityTier,
    pub regions: Vec<String>,
    pub target_audience: String,
    /// Days of advance notice; `0` for same-day events and undated feeds.
    pub lookahead_days: u32,
    pub source_kind: SourceKind,
    /// Source-specific scalar fields (video url, channel, competitor name...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    pub marketing_copy: Option<MarketingCopy>,
    #[serde(default)]
    pub image_prompts: Vec<ImagePrompt>,
}

impl Event {
    pub fn has_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    pub fn is_enriched(&self) -> bool {
        self.marketing_copy.is_some() && !self.image_prompts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_priority_order() {
        assert!(PriorityTier::High > PriorityTier::Medium);
        assert!(PriorityTier::Medium > PriorityTier::Low);
        assert_eq!(PriorityTier::default(), PriorityTier::Low);
    }

    #[test]
    fn test_priority_parses_both_vocabularies() {
        assert_eq!(PriorityTier::from_str("HIGH").unwrap(), PriorityTier::High);
        assert_eq!(PriorityTier::from_str("中").unwrap(), PriorityTier::Medium);
        assert_eq!(PriorityTier::Low.to_string(), "low");
        assert!(PriorityTier::from_str("urgent").is_err());
    }

    #[test]
    fn test_category_tags() {
        assert_eq!(
            Category::from_str("电商节点").unwrap(),
            Category::EcommerceMilestone
        );
        assert_eq!(
            Category::from_str("e-commerce-milestone").unwrap(),
            Category::EcommerceMilestone
        );
        assert_eq!(Category::EarlyWarning.to_string(), "early-warning");
        assert_eq!(
            serde_json::to_string(&Category::EcommerceMilestone).unwrap(),
            "\"e-commerce-milestone\""
        );
    }

    #[test]
    fn test_source_kind_serialization() {
        assert_eq!(SourceKind::HolidayDb.to_string(), "holiday-db");
        assert_eq!(
            serde_json::to_string(&SourceKind::CompetitorWatch).unwrap(),
            "\"competitor-watch\""
        );
        assert_eq!(
            SourceKind::from_str("trend-feed").unwrap(),
            SourceKind::TrendFeed
        );
    }
}
