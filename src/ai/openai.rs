use serde_json::{json, Value};

use super::{http_client, status_error, AiError, AiRequest, AiResponse};
use crate::settings::Settings;

/// Any OpenAI-compatible `/chat/completions` endpoint.
pub fn call(settings: &Settings, req: &AiRequest) -> Result<AiResponse, AiError> {
    let api_key = settings.get_or("ai_openai_api_key", "");
    if api_key.trim().is_empty() {
        return Err(AiError::NotConfigured(
            "OpenAI API key is not configured".into(),
        ));
    }

    let model = settings.get_or("ai_openai_model", "gpt-4o-mini");

    let base_url = settings.get_or("ai_openai_base_url", "");
    let base_url = if base_url.trim().is_empty() {
        "https://api.openai.com/v1".to_string()
    } else {
        base_url.trim().trim_end_matches('/').to_string()
    };

    let url = format!("{}/chat/completions", base_url);

    let body = json!({
        "model": model,
        "messages": [
            {"role": "system", "content": req.system},
            {"role": "user", "content": req.prompt}
        ],
        "max_tokens": req.max_tokens.unwrap_or(2048),
        "temperature": req.temperature.unwrap_or(0.8)
    });

    let client = http_client(settings)?;

    let resp = client
        .post(&url)
        .header("Authorization", format!("Bearer {}", api_key.trim()))
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .map_err(|e| AiError::Provider(format!("OpenAI request failed: {}", e)))?;

    if !resp.status().is_success() {
        return Err(status_error("OpenAI", resp));
    }

    let json: Value = resp
        .json()
        .map_err(|e| AiError::Provider(format!("OpenAI JSON parse error: {}", e)))?;

    let text = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .ok_or_else(|| AiError::Provider("OpenAI response has no choices".into()))?
        .to_string();

    Ok(AiResponse {
        text,
        provider: "openai".into(),
        model,
    })
}
