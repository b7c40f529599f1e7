use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::EventSource;
use crate::error::{CalendarError, Result};
use crate::model::{Category, PriorityTier, RawRecord, SourceKind};
use crate::settings::YouTubeConfig;

const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const TITLE_MAX_CHARS: usize = 50;

/// Trending creative-AI videos from the YouTube search API.
#[derive(Debug, Clone)]
pub struct YouTubeTrendSource {
    http: reqwest::Client,
    api_key: String,
    query: String,
    max_results: u32,
    published_within_days: u32,
}

impl YouTubeTrendSource {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>) -> Self {
        let defaults = YouTubeConfig::default();
        Self {
            http,
            api_key: api_key.into(),
            query: defaults.query,
            max_results: defaults.max_results,
            published_within_days: defaults.published_within_days,
        }
    }

    pub fn from_config(config: &YouTubeConfig, api_key: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CalendarError::Http {
                url: SEARCH_URL.to_owned(),
                source: e,
            })?;
        Ok(Self {
            http,
            api_key: api_key.to_owned(),
            query: config.query.clone(),
            max_results: config.max_results,
            published_within_days: config.published_within_days,
        })
    }

    fn search_url(&self, today: NaiveDate) -> Result<reqwest::Url> {
        let published_after = (today - chrono::Days::new(self.published_within_days.into()))
            .format("%Y-%m-%dT00:00:00Z")
            .to_string();
        let max_results = self.max_results.to_string();
        reqwest::Url::parse_with_params(
            SEARCH_URL,
            &[
                ("part", "snippet"),
                ("q", self.query.as_str()),
                ("type", "video"),
                ("order", "viewCount"),
                ("publishedAfter", published_after.as_str()),
                ("maxResults", max_results.as_str()),
                ("relevanceLanguage", "en"),
                ("key", self.api_key.as_str()),
            ],
        )
        .map_err(|e| CalendarError::SourceUnavailable {
            name: self.name().to_owned(),
            reason: format!("invalid search url: {e}"),
        })
    }
}

#[async_trait]
impl EventSource for YouTubeTrendSource {
    fn name(&self) -> &str {
        "youtube-trending"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::TrendFeed
    }

    #[instrument(skip(self))]
    async fn fetch(&self, today: NaiveDate) -> Result<Vec<RawRecord>> {
        let url = self.search_url(today)?;
        let body = get_text(&self.http, url).await?;
        let records = parse_search_response(&body, today)?;
        debug!(count = records.len(), "parsed trending videos");
        Ok(records)
    }
}

/// Fetch a URL and return the response body. Errors report the endpoint
/// without its query string so the api key never reaches the logs.
async fn get_text(client: &reqwest::Client, url: reqwest::Url) -> Result<String> {
    let endpoint = SEARCH_URL.to_owned();
    debug!(url = %endpoint, "fetching search results");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| CalendarError::Http {
            url: endpoint.clone(),
            source: e.without_url(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CalendarError::UnexpectedStatus {
            url: endpoint,
            status,
        });
    }

    response.text().await.map_err(|e| CalendarError::ResponseBody {
        url: endpoint,
        source: e.without_url(),
    })
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    #[serde(default)]
    channel_title: String,
}

/// Turn a search API response body into trend records dated `today`.
/// Results that are not videos are ignored.
pub(crate) fn parse_search_response(body: &str, today: NaiveDate) -> Result<Vec<RawRecord>> {
    let response: SearchResponse = serde_json::from_str(body)?;
    let date = today.format("%Y-%m-%d").to_string();
    Ok(response
        .items
        .into_iter()
        .filter_map(|item| {
            let video_id = item.id.video_id?;
            let title = shorten(&item.snippet.title, TITLE_MAX_CHARS);
            Some(
                RawRecord::new()
                    .with("id", format!("youtube_{video_id}"))
                    .with("date", date.as_str())
                    .with("name", format!("YouTube热门: {title}"))
                    .with("name_en", format!("YouTube Trending: {title}"))
                    .with(
                        "categories",
                        vec![
                            Category::UserBehavior.to_string(),
                            Category::IndustryTrend.to_string(),
                        ],
                    )
                    .with("priority", PriorityTier::Medium.to_string())
                    .with("regions", vec!["global"])
                    .with("target_audience", "AI creators, designers, tech enthusiasts")
                    .with("video_url", format!("https://youtube.com/watch?v={video_id}"))
                    .with("channel", item.snippet.channel_title),
            )
        })
        .collect())
}

fn shorten(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}
