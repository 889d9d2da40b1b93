use std::env;

use tracing::info;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Postgres
    pub database_url: String,

    // Vector index
    pub qdrant_url: String,
    pub qdrant_api_key: Option<String>,
    pub qdrant_collection: String,

    // AI providers
    pub gemini_api_key: String,
    pub gemini_model: String,

    // Upstream credentials (optional; the NewsAPI fetcher degrades without it)
    pub news_api_key: Option<String>,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load the full pipeline configuration.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            database_url: required_env("DATABASE_URL"),
            qdrant_url: required_env("QDRANT_URL"),
            qdrant_api_key: env::var("QDRANT_API_KEY").ok(),
            qdrant_collection: env::var("QDRANT_COLLECTION")
                .unwrap_or_else(|_| "news-index".to_string()),
            gemini_api_key: required_env("GEMINI_API_KEY"),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            news_api_key: env::var("NEWS_API_KEY").ok(),
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .expect("WEB_PORT must be a number"),
        }
    }

    /// Log the loaded configuration with secrets masked.
    pub fn log_redacted(&self) {
        info!(
            qdrant_url = %self.qdrant_url,
            qdrant_collection = %self.qdrant_collection,
            gemini_model = %self.gemini_model,
            news_api_key = if self.news_api_key.is_some() { "set" } else { "unset" },
            web_host = %self.web_host,
            web_port = self.web_port,
            "Configuration loaded"
        );
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
