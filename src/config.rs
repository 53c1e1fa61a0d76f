use crate::constants::*;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Base URL of the external trekking API.
    pub trekking_api_url: String,
    /// API key for the trekking API. Imports return no data without one.
    pub trekking_api_key: Option<String>,
    /// Timeout (seconds) applied to every outbound HTTP call.
    pub http_timeout_secs: u64,
    /// Path of the append-only sync history log.
    pub sync_history_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        let http_timeout_secs: u64 = env::var("HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_HTTP_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|_| "Invalid HTTP_TIMEOUT_SECS")?;

        if http_timeout_secs == 0 || http_timeout_secs > 120 {
            return Err("HTTP_TIMEOUT_SECS must be between 1 and 120".to_string());
        }

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            trekking_api_url: env::var("TREKKING_API_URL")
                .unwrap_or_else(|_| DEFAULT_TREKKING_API_URL.to_string()),
            trekking_api_key: env::var("TREKKING_API_KEY").ok(),
            http_timeout_secs,
            sync_history_path: env::var("SYNC_HISTORY_PATH")
                .unwrap_or_else(|_| DEFAULT_SYNC_HISTORY_PATH.to_string()),
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
