use std::time::Duration;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE_NAME: &str = "infinity";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Runtime configuration read from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub mongodb_uri: Option<String>,
    pub database_name: String,
    pub api_key: String,
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Reads configuration from environment variables.
    ///
    /// Panics when `API_KEY` is missing: the whole API is gated on it,
    /// so there is no sensible default.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let mongodb_uri = std::env::var("MONGODB_URI")
            .ok()
            .filter(|uri| !uri.is_empty());

        let database_name =
            std::env::var("MONGODB_DB").unwrap_or_else(|_| DEFAULT_DATABASE_NAME.to_string());

        let api_key = std::env::var("API_KEY").expect("API_KEY must be set");

        let request_timeout = std::env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        Self {
            port,
            mongodb_uri,
            database_name,
            api_key,
            request_timeout,
        }
    }
}
