use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Postgres
    pub database_url: String,

    // Gemini
    pub gemini_api_key: String,
    pub gemini_model: String,

    // WhatsApp Cloud API
    pub wp_access_token: String,
    pub wp_phone_number_id: String,
    pub wp_verify_token: String,

    // HTTP server
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            database_url: required_env("DATABASE_URL"),
            gemini_api_key: required_env("GEMINI_API_KEY"),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            wp_access_token: required_env("WP_ACCESS_TOKEN"),
            wp_phone_number_id: required_env("WP_PHONE_NUMBER_ID"),
            wp_verify_token: required_env("WP_VERIFY_TOKEN"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a number"),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
