use async_trait::async_trait;
use chrono::NaiveDate;

use super::EventSource;
use crate::error::Result;
use crate::model::{Category, PriorityTier, RawRecord, SourceKind};
use crate::settings::CompetitorConfig;

/// Placeholder watch over competitor products: one medium-tier record per
/// watched competitor, every day.
// TODO: read the competitors' release RSS feeds instead of emitting a daily reminder
#[derive(Debug, Clone)]
pub struct CompetitorWatchSource {
    competitors: Vec<String>,
}

impl CompetitorWatchSource {
    pub fn new(competitors: Vec<String>) -> Self {
        Self { competitors }
    }

    pub fn from_config(config: &CompetitorConfig) -> Self {
        Self::new(config.names.iter().take(config.limit).cloned().collect())
    }
}

#[async_trait]
impl EventSource for CompetitorWatchSource {
    fn name(&self) -> &str {
        "competitor-watch"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::CompetitorWatch
    }

    async fn fetch(&self, today: NaiveDate) -> Result<Vec<RawRecord>> {
        let date = today.format("%Y-%m-%d").to_string();
        Ok(self
            .competitors
            .iter()
            .map(|name| {
                RawRecord::new()
                    .with("id", format!("competitor_{}_{date}", name.to_lowercase()))
                    .with("date", date.as_str())
                    .with("name", format!("{name}可能有新动态"))
                    .with("name_en", format!("{name} Potential Updates"))
                    .with("categories", vec![Category::CompetitorFeature.to_string()])
                    .with("priority", PriorityTier::Medium.to_string())
                    .with("regions", vec!["global"])
                    .with("target_audience", "AI tool users, competitive analysts")
                    .with("competitor_name", name.as_str())
            })
            .collect())
    }
}
