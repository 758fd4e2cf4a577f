use std::collections::HashMap;
use std::path::Path;

/// Built-in defaults. Every key the service reads is listed here, which is
/// also the set of keys that may be overridden from the environment.
const DEFAULTS: &[(&str, &str)] = &[
    // Server
    ("server_address", "0.0.0.0"),
    ("server_port", "5000"),
    ("cors_allow_origin", "*"),
    // AI
    ("ai_failover_chain", "gemini,openai,ollama"),
    ("ai_temperature", "0.8"),
    ("ai_max_tokens", "2048"),
    ("ai_timeout_secs", "120"),
    ("ai_gemini_enabled", "true"),
    ("ai_gemini_api_key", ""),
    ("ai_gemini_model", "gemini-2.0-flash"),
    ("ai_gemini_base_url", "https://generativelanguage.googleapis.com"),
    ("ai_openai_enabled", "false"),
    ("ai_openai_api_key", ""),
    ("ai_openai_model", "gpt-4o-mini"),
    ("ai_openai_base_url", ""),
    ("ai_ollama_enabled", "false"),
    ("ai_ollama_url", "http://localhost:11434"),
    ("ai_ollama_model", ""),
    // Content
    ("content_max_options", "5"),
];

/// Environment variables accepted in addition to the upper-cased key names.
const ENV_ALIASES: &[(&str, &str)] = &[
    ("GEMINI_API_KEY", "ai_gemini_api_key"),
    ("OPENAI_API_KEY", "ai_openai_api_key"),
    ("PORT", "server_port"),
];

const CONFIG_ENV: &str = "REELSMITH_CONFIG";
const CONFIG_FILE: &str = "reelsmith.toml";

/// Flat key/value configuration with typed getters.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    values: HashMap<String, String>,
}

impl Settings {
    /// Defaults only. Used by tests and as the base layer of `load`.
    pub fn defaults() -> Self {
        let values = DEFAULTS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings { values }
    }

    /// Defaults, then the TOML file (if any), then `.env` and the process environment.
    pub fn load() -> Result<Self, String> {
        let mut settings = Self::defaults();

        match std::env::var(CONFIG_ENV) {
            Ok(path) => settings.merge_toml_file(Path::new(&path))?,
            Err(_) => {
                let path = Path::new(CONFIG_FILE);
                if path.exists() {
                    settings.merge_toml_file(path)?;
                }
            }
        }

        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(format!("Failed to read .env: {}", e));
            }
        }
        settings.merge_env(std::env::vars());

        Ok(settings)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false)
    }

    pub fn get_i64(&self, key: &str) -> i64 {
        self.get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    pub fn get_f64(&self, key: &str) -> f64 {
        self.get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0.0)
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn merge_toml_file(&mut self, path: &Path) -> Result<(), String> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        self.merge_toml(&raw)
            .map_err(|e| format!("Invalid config {}: {}", path.display(), e))?;
        log::info!("Loaded config from {}", path.display());
        Ok(())
    }

    /// Merge a TOML document. Top-level scalars map to their own key; a table
    /// such as `[ai]` contributes `ai_<key>` entries.
    pub fn merge_toml(&mut self, raw: &str) -> Result<(), String> {
        let table: toml::Table = raw.parse().map_err(|e: toml::de::Error| e.to_string())?;
        for (key, value) in table {
            match value {
                toml::Value::Table(section) => {
                    for (sub, v) in section {
                        if let Some(s) = scalar_to_string(&v) {
                            self.set(&format!("{}_{}", key, sub), &s);
                        }
                    }
                }
                other => {
                    if let Some(s) = scalar_to_string(&other) {
                        self.set(&key, &s);
                    }
                }
            }
        }
        Ok(())
    }

    /// Apply environment overrides for known keys (`AI_GEMINI_MODEL`, ...) and aliases.
    pub fn merge_env<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let env: HashMap<String, String> = vars.into_iter().collect();
        for (alias, key) in ENV_ALIASES {
            if let Some(v) = env.get(*alias) {
                self.set(key, v);
            }
        }
        for (key, _) in DEFAULTS {
            if let Some(v) = env.get(&key.to_uppercase()) {
                self.set(key, v);
            }
        }
    }
}

fn scalar_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(scalar_to_string).collect();
            Some(parts.join(","))
        }
        _ => None,
    }
}
