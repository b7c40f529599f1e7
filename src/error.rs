use std::path::PathBuf;

use crate::model::SourceKind;

/// All errors that can occur while assembling a calendar.
#[derive(thiserror::Error, Debug)]
pub enum CalendarError {
    /// A raw source record lacks a mandatory field. Recoverable per record.
    #[error("malformed {source_kind} record: {reason}")]
    MalformedRecord {
        source_kind: SourceKind,
        reason: String,
    },

    /// An external source could not deliver records for this run.
    #[error("source {name} unavailable: {reason}")]
    SourceUnavailable { name: String, reason: String },

    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// The holiday table could not be loaded or contains invalid entries.
    #[error("invalid holiday table: {reason}")]
    HolidayTable { reason: String },

    /// Failed to encode or decode JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to parse a date.
    #[error("failed to parse date: {0}")]
    DateParse(#[from] chrono::ParseError),

    /// Reading or writing a file failed.
    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration could not be loaded.
    #[error("failed to load configuration: {0}")]
    Config(#[from] ::config::ConfigError),

    /// Configuration loaded but holds an unusable value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CalendarError {
    pub fn malformed(source_kind: SourceKind, reason: impl Into<String>) -> Self {
        CalendarError::MalformedRecord {
            source_kind,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CalendarError>;
