use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CalendarError, Result};
use crate::model::Calendar;

const LATEST_FILE: &str = "latest.json";

/// Paths written by [`JsonEmitter::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedFiles {
    pub dated: PathBuf,
    pub latest: PathBuf,
}

/// Writes calendars as pretty-printed JSON: `calendar_<date>.json` plus a
/// `latest.json` copy for consumers that always read the newest run.
#[derive(Debug, Clone)]
pub struct JsonEmitter {
    dir: PathBuf,
}

impl JsonEmitter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn write(&self, calendar: &Calendar) -> Result<EmittedFiles> {
        std::fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;

        let json = to_json(calendar)?;
        let dated = self
            .dir
            .join(format!("calendar_{}.json", calendar.date.format("%Y-%m-%d")));
        let latest = self.dir.join(LATEST_FILE);
        for path in [&dated, &latest] {
            std::fs::write(path, &json).map_err(|e| io_error(path, e))?;
            debug!(path = %path.display(), bytes = json.len(), "wrote calendar");
        }
        Ok(EmittedFiles { dated, latest })
    }
}

pub fn to_json(calendar: &Calendar) -> Result<String> {
    Ok(serde_json::to_string_pretty(calendar)?)
}

fn io_error(path: &Path, source: std::io::Error) -> CalendarError {
    CalendarError::Io {
        path: path.to_path_buf(),
        source,
    }
}
