pub mod gemini;
pub mod ollama;
pub mod openai;
pub mod prompts;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::settings::Settings;

// ── Types ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AiError {
    /// Missing credential, model, or an empty provider chain.
    NotConfigured(String),
    /// Transport, HTTP status, or response-shape failure from a provider.
    Provider(String),
}

impl AiError {
    pub fn message(&self) -> &str {
        match self {
            Self::NotConfigured(m) | Self::Provider(m) => m,
        }
    }
}

impl std::fmt::Display for AiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AiError {}

/// Anything that can turn a prompt into raw model text.
pub trait Completer: Send + Sync {
    fn complete(&self, req: &AiRequest) -> Result<AiResponse, AiError>;
}

// ── Provider Enum ─────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Provider {
    Gemini,
    OpenAi,
    Ollama,
}

impl Provider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "gemini" => Some(Self::Gemini),
            "openai" => Some(Self::OpenAi),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
        }
    }

    fn call(&self, settings: &Settings, req: &AiRequest) -> Result<AiResponse, AiError> {
        match self {
            Self::Gemini => gemini::call(settings, req),
            Self::OpenAi => openai::call(settings, req),
            Self::Ollama => ollama::call(settings, req),
        }
    }
}

// ── Failover Chain ────────────────────────────────────

/// Tries each enabled provider in `ai_failover_chain` order.
pub struct FailoverChain {
    settings: Settings,
}

impl FailoverChain {
    pub fn new(settings: Settings) -> Self {
        FailoverChain { settings }
    }

    /// Enabled providers, in the order they will be tried.
    pub fn providers(&self) -> Vec<Provider> {
        enabled_providers(&self.settings)
    }
}

impl Completer for FailoverChain {
    fn complete(&self, req: &AiRequest) -> Result<AiResponse, AiError> {
        let chain = self.providers();
        if chain.is_empty() {
            return Err(AiError::NotConfigured(
                "No AI providers enabled in failover chain".into(),
            ));
        }

        let mut last_error = None;
        for provider in &chain {
            match provider.call(&self.settings, req) {
                Ok(resp) => {
                    log::info!(
                        "AI provider {} ({}) answered ({} bytes)",
                        resp.provider,
                        resp.model,
                        resp.text.len()
                    );
                    return Ok(resp);
                }
                Err(e) => {
                    log::warn!("AI provider {} failed: {}", provider.name(), e);
                    last_error = Some(e);
                }
            }
        }

        // A single provider's error is surfaced as-is; with several, name the last one.
        match last_error {
            Some(e) if chain.len() == 1 => Err(e),
            Some(AiError::NotConfigured(m)) => Err(AiError::NotConfigured(format!(
                "All AI providers failed. Last error: {}",
                m
            ))),
            Some(AiError::Provider(m)) => Err(AiError::Provider(format!(
                "All AI providers failed. Last error: {}",
                m
            ))),
            None => Err(AiError::Provider("All AI providers failed".into())),
        }
    }
}

/// Providers named in the chain whose `ai_<name>_enabled` flag is set.
pub fn enabled_providers(settings: &Settings) -> Vec<Provider> {
    let chain_str = settings.get_or("ai_failover_chain", "gemini");
    let mut chain: Vec<Provider> = Vec::new();
    for provider in chain_str.split(',').filter_map(Provider::from_str) {
        if settings.get_bool(&format!("ai_{}_enabled", provider.name()))
            && !chain.contains(&provider)
        {
            chain.push(provider);
        }
    }
    chain
}

/// Check if any AI provider is enabled
pub fn is_enabled(settings: &Settings) -> bool {
    !enabled_providers(settings).is_empty()
}

// ── Shared HTTP Client ────────────────────────────────

pub(crate) fn http_client(settings: &Settings) -> Result<reqwest::blocking::Client, AiError> {
    let secs = match settings.get_i64("ai_timeout_secs") {
        n if n > 0 => n as u64,
        _ => 120,
    };
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(secs))
        .build()
        .map_err(|e| AiError::Provider(format!("HTTP client error: {}", e)))
}

/// Read the body of a non-2xx response into a provider error.
pub(crate) fn status_error(
    provider: &str,
    resp: reqwest::blocking::Response,
) -> AiError {
    let status = resp.status();
    let text = resp.text().unwrap_or_default();
    AiError::Provider(format!("{} returned {}: {}", provider, status, text))
}
