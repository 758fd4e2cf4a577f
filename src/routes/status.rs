use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use serde_json::{json, Value};

use crate::ai;
use crate::settings::Settings;

#[get("/")]
pub fn index() -> Json<Value> {
    Json(json!({"message": "Welcome to the API"}))
}

// ── Status Check ──────────────────────────────────────

#[get("/ai/status")]
pub fn ai_status(settings: &State<Settings>) -> Json<Value> {
    let providers: Vec<&str> = ai::enabled_providers(settings)
        .iter()
        .map(|p| p.name())
        .collect();
    Json(json!({
        "enabled": ai::is_enabled(settings),
        "providers": providers,
    }))
}

/// CORS preflight for any path.
#[options("/<_..>")]
pub fn preflight() -> Status {
    Status::NoContent
}
