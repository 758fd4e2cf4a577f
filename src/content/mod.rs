pub mod hashtags;
pub mod heuristic;
pub mod structured;
pub mod synthetic;

use serde::{Deserialize, Serialize};

use crate::ai::{prompts, AiError, AiRequest, Completer};
use crate::settings::Settings;

// ── Types ─────────────────────────────────────────────

/// One video idea: what the UI shows as a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPackage {
    pub title: String,
    pub description: String,
    pub hashtags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub topic: String,
    pub niche: String,
    pub option_count: usize,
}

impl GenerationRequest {
    /// Validate caller input. Blank niche means no niche; the option count is
    /// clamped to `1..=max_options`.
    pub fn new(
        topic: &str,
        niche: Option<&str>,
        option_count: Option<i64>,
        max_options: usize,
    ) -> Result<Self, String> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err("Topic is required".into());
        }

        let niche = niche
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(prompts::DEFAULT_NICHE);

        let max_options = max_options.max(1);
        let option_count = option_count.unwrap_or(1).clamp(1, max_options as i64) as usize;

        Ok(GenerationRequest {
            topic: topic.to_string(),
            niche: niche.to_string(),
            option_count,
        })
    }
}

pub(crate) fn fallback_title(topic: &str) -> String {
    format!("Video about {}", topic)
}

pub(crate) fn fallback_description(topic: &str) -> String {
    format!("This is a video about {}.", topic)
}

// ── Public API ────────────────────────────────────────

/// Prompt the model and normalize whatever comes back. Only a failed model
/// call is an error; unusable text degrades to generated content.
pub fn generate(
    completer: &dyn Completer,
    settings: &Settings,
    req: &GenerationRequest,
) -> Result<Vec<ContentPackage>, AiError> {
    let per_option = match settings.get_i64("ai_max_tokens") {
        n if n > 0 => u32::try_from(n).unwrap_or(u32::MAX),
        _ => 2048,
    };
    let temperature = settings.get_f64("ai_temperature");

    let ai_req = AiRequest {
        system: prompts::video_system(),
        prompt: prompts::video_content(&req.topic, &req.niche, req.option_count),
        max_tokens: Some(per_option.saturating_mul(req.option_count as u32).min(8192)),
        temperature: if temperature > 0.0 {
            Some(temperature as f32)
        } else {
            None
        },
    };

    log::info!(
        "Generating {} option(s) for topic {:?} (niche {:?})",
        req.option_count,
        req.topic,
        req.niche
    );

    let resp = completer.complete(&ai_req)?;
    Ok(normalize(&resp.text, &req.topic, req.option_count))
}

/// Turn raw model text into exactly `option_count` packages. Never fails.
pub fn normalize(raw: &str, topic: &str, option_count: usize) -> Vec<ContentPackage> {
    let option_count = option_count.max(1);
    log::debug!("AI raw response: {}", excerpt(raw, 500));

    let packages = structured::parse(raw, topic, option_count)
        .or_else(|| {
            log::warn!(
                "Failed to parse AI response as JSON, falling back to text extraction: {}",
                excerpt(raw, 300)
            );
            heuristic::extract(raw, topic, option_count)
        })
        .unwrap_or_else(|| {
            log::warn!("No usable content in AI response, using generated defaults");
            synthetic::packages(topic, option_count)
        });

    debug_assert_eq!(packages.len(), option_count);
    packages
}

/// At most `max` bytes of `text`, cut on a char boundary.
pub fn excerpt(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
