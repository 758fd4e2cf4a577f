use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use serde::Deserialize;
use serde_json::{json, Value};

use std::sync::Arc;

use crate::ai::Completer;
use crate::content::{self, GenerationRequest};
use crate::settings::Settings;

// ── Request Types ─────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoContentRequest {
    #[serde(default)]
    pub topic: Option<String>,
    pub niche: Option<String>,
    #[serde(alias = "optionCount")]
    pub options_count: Option<i64>,
}

// ── Generate Video Content ────────────────────────────

#[post("/generate-video-content", format = "json", data = "<body>")]
pub async fn generate_video_content(
    settings: &State<Settings>,
    completer: &State<Arc<dyn Completer>>,
    body: Json<GenerateVideoContentRequest>,
) -> (Status, Json<Value>) {
    let max_options = settings.get_i64("content_max_options").max(1) as usize;
    let request = match GenerationRequest::new(
        body.topic.as_deref().unwrap_or(""),
        body.niche.as_deref(),
        body.options_count,
        max_options,
    ) {
        Ok(r) => r,
        Err(e) => {
            return (
                Status::BadRequest,
                Json(json!({"success": false, "error": e})),
            )
        }
    };

    let completer = Arc::clone(completer.inner());
    let settings = settings.inner().clone();
    let job = request.clone();
    let outcome = rocket::tokio::task::spawn_blocking(move || {
        content::generate(completer.as_ref(), &settings, &job)
    })
    .await;

    match outcome {
        Ok(Ok(packages)) => {
            let mut payload = json!({
                "success": true,
                "topic": request.topic,
                "niche": request.niche,
            });
            if request.option_count == 1 {
                payload["content"] = json!(packages.first());
            } else {
                payload["contentOptions"] = json!(packages);
            }
            (Status::Ok, Json(payload))
        }
        Ok(Err(e)) => {
            log::error!("Error in generate-video-content endpoint: {}", e);
            (
                Status::InternalServerError,
                Json(json!({
                    "success": false,
                    "error": format!("Failed to generate content: {}", e),
                })),
            )
        }
        Err(e) => {
            log::error!("Content generation task failed: {}", e);
            (
                Status::InternalServerError,
                Json(json!({"success": false, "error": "Failed to generate content"})),
            )
        }
    }
}
