use serde::{Deserialize, Serialize};

/// Bilingual marketing copy attached to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingCopy {
    pub zh: LocalizedCopy,
    pub en: LocalizedCopy,
}

/// Copy for a single locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizedCopy {
    pub headline: String,
    pub body: String,
    pub cta: String,
    pub hashtags: Vec<String>,
}

/// A text-to-image generation prompt for an event's artwork.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePrompt {
    pub model: String,
    pub style: String,
    pub prompt_zh: String,
    pub prompt_en: String,
    pub hf_model_id: String,
    pub free_api: bool,
    pub api_endpoint: String,
    pub usage_note: String,
}
