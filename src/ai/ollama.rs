use serde_json::{json, Value};

use super::{http_client, status_error, AiError, AiRequest, AiResponse};
use crate::settings::Settings;

pub fn call(settings: &Settings, req: &AiRequest) -> Result<AiResponse, AiError> {
    let base_url = settings.get_or("ai_ollama_url", "http://localhost:11434");
    let model = settings.get_or("ai_ollama_model", "");

    if model.trim().is_empty() {
        return Err(AiError::NotConfigured("Ollama model is not configured".into()));
    }

    let url = format!("{}/api/chat", base_url.trim().trim_end_matches('/'));

    let body = json!({
        "model": model,
        "messages": [
            {"role": "system", "content": req.system},
            {"role": "user", "content": req.prompt}
        ],
        "stream": false,
        "options": {
            "temperature": req.temperature.unwrap_or(0.8),
            "num_predict": req.max_tokens.unwrap_or(2048)
        }
    });

    let client = http_client(settings)?;

    let resp = client
        .post(&url)
        .json(&body)
        .send()
        .map_err(|e| AiError::Provider(format!("Ollama request failed: {}", e)))?;

    if !resp.status().is_success() {
        return Err(status_error("Ollama", resp));
    }

    let json: Value = resp
        .json()
        .map_err(|e| AiError::Provider(format!("Ollama JSON parse error: {}", e)))?;

    let text = json
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .unwrap_or("")
        .to_string();

    Ok(AiResponse {
        text,
        provider: "ollama".into(),
        model,
    })
}
