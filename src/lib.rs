//! Builds a ranked daily marketing opportunity calendar.
//!
//! Raw records from holiday tables, trend feeds and competitor watch are
//! normalized into [`Event`]s, merged, ranked by priority and capped to a
//! fixed size before being written out as JSON.
//!
//! ```no_run
//! # async fn example() -> marketing_calendar::Result<()> {
//! use marketing_calendar::{CalendarConfig, CalendarGenerator};
//!
//! let generator = CalendarGenerator::from_config(CalendarConfig::default())?;
//! let today = chrono::Local::now().date_naive();
//! let calendar = generator.generate(today).await;
//! println!("{} events", calendar.total_events);
//! # Ok(())
//! # }
//! ```

pub use content::TemplateCopywriter;
pub use emit::{EmittedFiles, JsonEmitter};
pub use error::{CalendarError, Result};
pub use generator::{assemble, Assembly, CalendarGenerator};
pub use holidays::{HolidayDate, HolidayEntry, HolidayTable};
pub use model::*;
pub use settings::{CalendarConfig, CompetitorConfig, RankPolicy, YouTubeConfig};
pub use sources::{EventSource, SourceBatch, SourceRegistry};
pub use window::LookaheadWindow;

pub mod content;
pub mod emit;
pub mod error;
pub mod generator;
pub mod holidays;
pub mod model;
pub mod normalize;
pub mod rank;
pub mod settings;
pub mod sources;
pub mod window;
