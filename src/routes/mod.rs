pub mod content;
pub mod status;

use rocket::serde::json::Json;
use serde_json::{json, Value};

// ── Route Registration ────────────────────────────────

pub fn routes() -> Vec<rocket::Route> {
    routes![status::index, status::preflight]
}

pub fn api_routes() -> Vec<rocket::Route> {
    routes![content::generate_video_content, status::ai_status]
}

// ── Catchers ──────────────────────────────────────────

#[catch(400)]
fn bad_request() -> Json<Value> {
    Json(json!({"success": false, "error": "Bad request"}))
}

#[catch(404)]
fn not_found() -> Json<Value> {
    Json(json!({"success": false, "error": "Not found"}))
}

#[catch(422)]
fn unprocessable() -> Json<Value> {
    Json(json!({"success": false, "error": "Invalid request body"}))
}

#[catch(500)]
fn server_error() -> Json<Value> {
    Json(json!({"success": false, "error": "Internal server error"}))
}

pub fn catchers() -> Vec<rocket::Catcher> {
    catchers![bad_request, not_found, unprocessable, server_error]
}
