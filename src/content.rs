use crate::model::{Category, Event, ImagePrompt, LocalizedCopy, MarketingCopy};

const IMAGE_MODEL: &str = "Stable Diffusion XL (Hugging Face)";
const IMAGE_MODEL_ID: &str = "stabilityai/stable-diffusion-xl-base-1.0";
const IMAGE_API_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/stabilityai/stable-diffusion-xl-base-1.0";

/// Which template family an event is written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Theme {
    Holiday,
    Competitor,
    Generic,
}

impl Theme {
    fn of(event: &Event) -> Self {
        if event.has_category(Category::HolidayMarketing) {
            Theme::Holiday
        } else if event.has_category(Category::CompetitorFeature) {
            Theme::Competitor
        } else {
            Theme::Generic
        }
    }
}

/// Fills in bilingual copy and image prompts from fixed templates.
#[derive(Debug, Clone)]
pub struct TemplateCopywriter {
    brand: String,
}

impl Default for TemplateCopywriter {
    fn default() -> Self {
        Self::new("Haimeta")
    }
}

impl TemplateCopywriter {
    pub fn new(brand: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
        }
    }

    /// Attach copy and prompts to an event. Content already supplied by the
    /// source is kept as is.
    pub fn enrich(&self, event: &mut Event) {
        if event.marketing_copy.is_none() {
            event.marketing_copy = Some(self.marketing_copy(event));
        }
        if event.image_prompts.is_empty() {
            event.image_prompts = self.image_prompts(event);
        }
    }

    pub fn marketing_copy(&self, event: &Event) -> MarketingCopy {
        let brand = &self.brand;
        let name = &event.display_name;
        let name_en = &event.display_name_en;

        let (zh_headline, zh_body, en_headline, en_body) = match Theme::of(event) {
            Theme::Holiday => (
                format!("🎨 {name} | {brand}助你抢占节日营销先机"),
                format!("把握{name}营销窗口,用AI生成惊艳视觉内容。{brand}提供海量模板,一键生成专业级节日海报、视频素材。"),
                format!("🎨 {name_en} | Create Stunning Visuals with {brand}"),
                format!("Leverage AI to create professional designs for {name_en}. {brand} makes holiday marketing easy and impactful."),
            ),
            Theme::Competitor => (
                format!("⚡ 竞品动态: {name}"),
                format!("关注竞品最新功能,{brand}持续创新,保持领先优势。"),
                format!("⚡ Competitor Alert: {name_en}"),
                format!("Stay ahead with {brand}'s continuous innovation."),
            ),
            Theme::Generic => (
                format!("📊 {name} | {brand} AI创意工具"),
                format!("抓住{name}的机会,用{brand} AI工具创作专业内容。"),
                format!("📊 {name_en} | {brand} AI Creative Tools"),
                format!("Seize the opportunity with {brand} AI tools."),
            ),
        };

        MarketingCopy {
            zh: LocalizedCopy {
                headline: zh_headline,
                body: zh_body,
                cta: "立即体验 →".to_string(),
                hashtags: vec![
                    "#AI设计".to_string(),
                    format!("#{}", hashtag(name)),
                    format!("#{brand}"),
                ],
            },
            en: LocalizedCopy {
                headline: en_headline,
                body: en_body,
                cta: "Try Now →".to_string(),
                hashtags: vec![
                    "#AIDesign".to_string(),
                    format!("#{}", hashtag(name_en)),
                    format!("#{brand}"),
                ],
            },
        }
    }

    pub fn image_prompts(&self, event: &Event) -> Vec<ImagePrompt> {
        let (style_zh, style_en) = match Theme::of(event) {
            Theme::Holiday => (
                format!("{}主题,温馨节日氛围,现代扁平设计,明亮色彩", event.display_name),
                format!(
                    "{} theme, festive atmosphere, modern flat design, vibrant colors",
                    event.display_name_en
                ),
            ),
            Theme::Competitor => (
                "科技感,对比分析图,专业商务风格".to_string(),
                "tech aesthetic, comparison chart, professional business style".to_string(),
            ),
            Theme::Generic => (
                "科技感,未来主义,渐变配色,简约设计".to_string(),
                "futuristic tech aesthetic, gradient colors, minimalist design".to_string(),
            ),
        };

        vec![ImagePrompt {
            model: IMAGE_MODEL.to_string(),
            prompt_zh: format!("{style_zh},高清,8K,专业设计,无文字"),
            prompt_en: format!("{style_en}, high quality, 8K, professional design, no text"),
            style: style_zh,
            hf_model_id: IMAGE_MODEL_ID.to_string(),
            free_api: true,
            api_endpoint: IMAGE_API_ENDPOINT.to_string(),
            usage_note: format!("复制prompt到{}平台使用", self.brand),
        }]
    }
}

/// Hashtags cannot contain whitespace.
fn hashtag(text: &str) -> String {
    text.split_whitespace().collect()
}
