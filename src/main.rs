use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use marketing_calendar::{
    emit, CalendarConfig, CalendarGenerator, PriorityTier, RankPolicy, SourceKind,
};
use tracing::info;

/// Generate the daily marketing opportunity calendar.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Day to generate for (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Days ahead to look for upcoming holidays
    #[arg(long)]
    horizon_days: Option<u32>,

    /// Maximum number of events in the calendar
    #[arg(long)]
    max_events: Option<usize>,

    /// Lowest tier that raises upcoming-holiday advisories (high, medium, low)
    #[arg(long)]
    advisory_min_tier: Option<PriorityTier>,

    /// Ordering among events of equal priority (lookahead-desc, date-asc)
    #[arg(long)]
    rank_policy: Option<RankPolicy>,

    /// Holiday table JSON replacing the built-in one
    #[arg(long)]
    holidays: Option<PathBuf>,

    /// Directory the calendar files are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// YouTube Data API key; enables the trending feed
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    youtube_api_key: Option<String>,

    /// Print the calendar JSON instead of writing files
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn apply(self, mut config: CalendarConfig) -> CalendarConfig {
        if let Some(days) = self.horizon_days {
            config.horizon_days = days;
        }
        if let Some(max) = self.max_events {
            config.max_events = max;
        }
        if let Some(tier) = self.advisory_min_tier {
            config.advisory_min_tier = tier;
        }
        if let Some(policy) = self.rank_policy {
            config.rank_policy = policy;
        }
        if let Some(path) = self.holidays {
            config.holidays_path = Some(path);
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(key) = self.youtube_api_key {
            config.youtube.api_key = Some(key);
        }
        config
    }
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let today = cli
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let dry_run = cli.dry_run;

    let config = CalendarConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let config = cli.apply(config);
    let output_dir = config.output_dir.clone();

    let generator =
        CalendarGenerator::from_config(config).context("Failed to set up event sources")?;
    info!(%today, sources = ?generator.registry().names(), "generating calendar");

    let calendar = generator.generate(today).await;

    if dry_run {
        println!("{}", emit::to_json(&calendar)?);
        return Ok(());
    }

    let files = emit::JsonEmitter::new(&output_dir)
        .write(&calendar)
        .with_context(|| format!("Failed to write calendar to {:?}", output_dir))?;

    println!("Calendar saved: {}", files.dated.display());
    println!("Latest version: {}", files.latest.display());
    println!();
    println!("Summary:");
    println!("  - Total events: {}", calendar.total_events);
    for kind in SourceKind::ALL {
        println!("  - {kind}: {}", calendar.categories.get(&kind).unwrap_or(&0));
    }
    if !calendar.skipped.is_empty() {
        println!("  - Skipped records: {}", calendar.skipped.len());
    }

    let high_priority: Vec<_> = calendar.high_priority().collect();
    if !high_priority.is_empty() {
        println!();
        println!("High priority events ({}):", high_priority.len());
        for event in high_priority {
            println!("  - {} ({})", event.display_name_en, event.date);
        }
    }

    Ok(())
}
