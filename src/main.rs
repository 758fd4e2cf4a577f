#[macro_use]
extern crate rocket;

use std::sync::Arc;

use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::{Build, Rocket};

mod ai;
mod content;
mod routes;
mod settings;


use ai::{Completer, FailoverChain};
use settings::Settings;

const DEFAULT_PORT: u16 = 5000;

/// Adds CORS headers so the browser front end can call the API from another origin.
pub struct Cors {
    allow_origin: String,
}

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "CORS Headers",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _req: &'r rocket::Request<'_>, res: &mut rocket::Response<'r>) {
        res.set_header(Header::new(
            "Access-Control-Allow-Origin",
            self.allow_origin.clone(),
        ));
        res.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "GET, POST, OPTIONS",
        ));
        res.set_header(Header::new("Access-Control-Allow-Headers", "Content-Type"));
    }
}

/// Assemble the server around a completer. Split from `rocket()` so tests can
/// swap in a scripted model.
pub fn build_rocket(settings: Settings, completer: Arc<dyn Completer>) -> Rocket<Build> {
    let port = u16::try_from(settings.get_i64("server_port"))
        .ok()
        .filter(|p| *p > 0)
        .unwrap_or(DEFAULT_PORT);
    let address = settings.get_or("server_address", "0.0.0.0");

    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", address));

    let cors = Cors {
        allow_origin: settings.get_or("cors_allow_origin", "*"),
    };

    rocket::custom(figment)
        .manage(settings)
        .manage(completer)
        .attach(cors)
        .mount("/", routes::routes())
        .mount("/api", routes::api_routes())
        .register("/", routes::catchers())
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    let settings = Settings::load().expect("Failed to load configuration");

    let providers: Vec<&str> = ai::enabled_providers(&settings)
        .iter()
        .map(|p| p.name())
        .collect();
    if providers.is_empty() {
        log::warn!("No AI providers enabled; every generation request will fail");
    } else {
        log::info!("AI failover chain: {}", providers.join(" -> "));
    }
    if settings.get_bool("ai_gemini_enabled")
        && settings.get_or("ai_gemini_api_key", "").trim().is_empty()
    {
        log::warn!("Gemini API key is not configured (set GEMINI_API_KEY)");
    }

    let completer: Arc<dyn Completer> = Arc::new(FailoverChain::new(settings.clone()));
    build_rocket(settings, completer)
}
