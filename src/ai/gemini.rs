use serde_json::{json, Value};

use super::{http_client, status_error, AiError, AiRequest, AiResponse};
use crate::settings::Settings;

pub fn call(settings: &Settings, req: &AiRequest) -> Result<AiResponse, AiError> {
    let api_key = settings.get_or("ai_gemini_api_key", "");
    if api_key.trim().is_empty() {
        return Err(AiError::NotConfigured(
            "Gemini API key is not configured".into(),
        ));
    }

    let model = settings.get_or("ai_gemini_model", "gemini-2.0-flash");
    let base_url = settings.get_or(
        "ai_gemini_base_url",
        "https://generativelanguage.googleapis.com",
    );

    let url = format!(
        "{}/v1beta/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    );

    let body = json!({
        "contents": [{"parts": [{"text": format!("{}\n\n{}", req.system, req.prompt)}]}],
        "generationConfig": {
            "maxOutputTokens": req.max_tokens.unwrap_or(2048),
            "temperature": req.temperature.unwrap_or(0.8)
        }
    });

    let client = http_client(settings)?;

    let resp = client
        .post(&url)
        .query(&[("key", api_key.trim())])
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .map_err(|e| AiError::Provider(format!("Gemini request failed: {}", e)))?;

    if !resp.status().is_success() {
        return Err(status_error("Gemini", resp));
    }

    let json: Value = resp
        .json()
        .map_err(|e| AiError::Provider(format!("Gemini JSON parse error: {}", e)))?;

    Ok(AiResponse {
        text: response_text(&json)?,
        provider: "gemini".into(),
        model,
    })
}

/// Concatenate the text parts of the first candidate.
pub(crate) fn response_text(json: &Value) -> Result<String, AiError> {
    if let Some(reason) = json
        .get("promptFeedback")
        .and_then(|f| f.get("blockReason"))
        .and_then(|r| r.as_str())
    {
        return Err(AiError::Provider(format!(
            "Gemini blocked the prompt: {}",
            reason
        )));
    }

    let parts = json
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .ok_or_else(|| AiError::Provider("Gemini response has no candidates".into()))?;

    Ok(parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect::<Vec<_>>()
        .join(""))
}
