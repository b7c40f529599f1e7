pub(crate) mod competitor;
pub(crate) mod holiday;
pub(crate) mod youtube;

pub use competitor::CompetitorWatchSource;
pub use holiday::HolidaySource;
pub use youtube::YouTubeTrendSource;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use crate::error::{CalendarError, Result};
use crate::holidays::HolidayTable;
use crate::model::{RawRecord, SourceKind};
use crate::settings::CalendarConfig;
use crate::window::LookaheadWindow;

/// An origin of raw event records.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Human-readable name used in logs.
    fn name(&self) -> &str;

    fn kind(&self) -> SourceKind;

    async fn fetch(&self, today: NaiveDate) -> Result<Vec<RawRecord>>;
}

/// Records delivered by one source in one run.
#[derive(Debug)]
pub struct SourceBatch {
    pub name: String,
    pub kind: SourceKind,
    pub records: Vec<RawRecord>,
    /// Set when the source failed; `records` is then empty.
    pub error: Option<CalendarError>,
}

/// The set of sources queried for a run, in registration order.
#[derive(Default)]
pub struct SourceRegistry {
    sources: Vec<Box<dyn EventSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry described by `config`: holidays and competitor
    /// watch always, the YouTube feed only when an api key is configured.
    pub fn from_config(config: &CalendarConfig) -> Result<Self> {
        let table = match &config.holidays_path {
            Some(path) => HolidayTable::load(path)?,
            None => HolidayTable::builtin()?,
        };
        let window = LookaheadWindow::new(config.horizon_days, config.advisory_min_tier);

        let mut registry = Self::new()
            .with_source(HolidaySource::new(table, window))
            .with_source(CompetitorWatchSource::from_config(&config.competitors));

        match config.youtube.api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(api_key) => {
                registry.register(YouTubeTrendSource::from_config(&config.youtube, api_key)?);
            }
            None => info!("no YouTube api key configured, trend feed disabled"),
        }
        Ok(registry)
    }

    pub fn register(&mut self, source: impl EventSource + 'static) -> &mut Self {
        debug!(name = source.name(), kind = %source.kind(), "registering source");
        self.sources.push(Box::new(source));
        self
    }

    pub fn with_source(mut self, source: impl EventSource + 'static) -> Self {
        self.register(source);
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Query every source in turn. A failing source contributes an empty
    /// batch carrying the error; it never aborts the run.
    #[instrument(skip(self))]
    pub async fn collect(&self, today: NaiveDate) -> Vec<SourceBatch> {
        let mut batches = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let name = source.name().to_string();
            let kind = source.kind();
            let batch = match source.fetch(today).await {
                Ok(records) => {
                    debug!(%name, count = records.len(), "source delivered records");
                    SourceBatch {
                        name,
                        kind,
                        records,
                        error: None,
                    }
                }
                Err(e) => {
                    warn!(%name, error = %e, "source unavailable, continuing without it");
                    SourceBatch {
                        error: Some(CalendarError::SourceUnavailable {
                            name: name.clone(),
                            reason: e.to_string(),
                        }),
                        name,
                        kind,
                        records: vec![],
                    }
                }
            };
            batches.push(batch);
        }
        batches
    }
}
