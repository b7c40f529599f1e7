use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File, Map};
use serde::{Deserialize, Serialize};
use strum_macros::EnumString;
use tracing::debug;

use crate::error::{CalendarError, Result};
use crate::model::PriorityTier;

/// Secondary ordering applied among events of equal priority.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RankPolicy {
    /// Events with more advance notice first.
    #[default]
    LookaheadDesc,
    /// Earliest date first.
    DateAsc,
}

/// Settings for one calendar run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Forward horizon for upcoming-holiday advisories.
    pub horizon_days: u32,
    /// Hard cap on the number of events in the artifact.
    pub max_events: usize,
    /// Below this many events a fallback placeholder is injected.
    pub min_events: usize,
    /// Lowest tier that still produces upcoming advisories.
    pub advisory_min_tier: PriorityTier,
    pub rank_policy: RankPolicy,
    /// Brand name used in generated copy.
    pub brand: String,
    /// External holiday table; the embedded table is used when unset.
    pub holidays_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub youtube: YouTubeConfig,
    pub competitors: CompetitorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YouTubeConfig {
    /// The trend feed is only registered when a key is present.
    pub api_key: Option<String>,
    pub query: String,
    pub max_results: u32,
    pub published_within_days: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompetitorConfig {
    pub names: Vec<String>,
    /// How many of `names` are watched per run.
    pub limit: usize,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            horizon_days: 7,
            max_events: 5,
            min_events: 3,
            advisory_min_tier: PriorityTier::High,
            rank_policy: RankPolicy::default(),
            brand: "Haimeta".to_string(),
            holidays_path: None,
            output_dir: PathBuf::from("output"),
            youtube: YouTubeConfig::default(),
            competitors: CompetitorConfig::default(),
        }
    }
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            query: "AI art tools OR AI design OR creative AI OR generative AI".to_string(),
            max_results: 15,
            published_within_days: 7,
            timeout_secs: 10,
        }
    }
}

impl Default for CompetitorConfig {
    fn default() -> Self {
        Self {
            names: ["Pollo", "Higgsfield", "OpenArt", "Pixverse", "Kling", "即梦"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            limit: 2,
        }
    }
}

impl CalendarConfig {
    /// Load settings from an optional TOML file, then `CALENDAR_*`
    /// environment variables (nested keys separated by `__`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`CalendarConfig::load`], reading variables from `env` instead
    /// of the process environment when given.
    fn load_with_env(path: Option<&Path>, env: Option<Map<String, String>>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(File::from(path.to_path_buf()));
        }
        let config: CalendarConfig = builder
            .add_source(
                Environment::with_prefix("CALENDAR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_events == 0 {
            return Err(CalendarError::InvalidConfig(
                "max_events must be at least 1".to_string(),
            ));
        }
        if self.brand.trim().is_empty() {
            return Err(CalendarError::InvalidConfig(
                "brand must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_horizon_days(mut self, horizon_days: u32) -> Self {
        self.horizon_days = horizon_days;
        self
    }

    pub fn with_max_events(mut self, max_events: usize) -> Self {
        self.max_events = max_events;
        self
    }

    pub fn with_min_events(mut self, min_events: usize) -> Self {
        self.min_events = min_events;
        self
    }

    pub fn with_advisory_min_tier(mut self, tier: PriorityTier) -> Self {
        self.advisory_min_tier = tier;
        self
    }

    pub fn with_rank_policy(mut self, policy: RankPolicy) -> Self {
        self.rank_policy = policy;
        self
    }
}
