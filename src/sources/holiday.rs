use async_trait::async_trait;
use chrono::NaiveDate;

use super::EventSource;
use crate::error::Result;
use crate::holidays::HolidayTable;
use crate::model::{RawRecord, SourceKind};
use crate::window::LookaheadWindow;

/// Holidays from the static table, seen through the lookahead window.
#[derive(Debug, Clone)]
pub struct HolidaySource {
    table: HolidayTable,
    window: LookaheadWindow,
}

impl HolidaySource {
    pub fn new(table: HolidayTable, window: LookaheadWindow) -> Self {
        Self { table, window }
    }
}

#[async_trait]
impl EventSource for HolidaySource {
    fn name(&self) -> &str {
        "holidays"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::HolidayDb
    }

    async fn fetch(&self, today: NaiveDate) -> Result<Vec<RawRecord>> {
        Ok(self.window.scan(&self.table, today))
    }
}
