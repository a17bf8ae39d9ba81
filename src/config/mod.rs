use serde::Deserialize;
use std::env;

// Top-level configuration container
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub log: LogConfig,
}

// Settings for the ticketing API we talk to
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

// Logging settings
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            api: ApiConfig {
                base_url: env::var("API_BASE_URL")
                    .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string()),
                timeout_seconds: env::var("HTTP_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .expect("HTTP_TIMEOUT_SECONDS must be a valid number"),
            },
            log: LogConfig {
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "theater_client=debug".to_string()),
            },
        }
    }
}
