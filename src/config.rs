use std::env;

/// Runtime configuration, read once in `main` and shared via `web::Data`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL used when building shareable participant links.
    pub base_url: String,
    /// SQLite database path.
    pub database_path: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            base_url: env_or("BASE_URL", "http://127.0.0.1:8080"),
            database_path: env_or("DATABASE_PATH", "data/plenum.db"),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(val) if !val.is_empty() => val,
        _ => {
            log::info!("{key} not set, using default: {default}");
            default.to_string()
        }
    }
}
