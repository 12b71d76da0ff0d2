//! Configuration loaded from the environment.

use std::env;
use std::time::Duration;

/// Runtime limits for the core services.
#[derive(Clone, Debug)]
pub struct Config {
    /// Upper bound for the catalog page size; larger requested limits are clamped.
    pub max_page_size: u32,
    /// Deadline applied to every single persistence or asset-store call.
    pub call_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let max_page_size = env::var("MAX_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100);
        let call_timeout_ms = env::var("CALL_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5_000);

        Self {
            max_page_size,
            call_timeout: Duration::from_millis(call_timeout_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_page_size: 100,
            call_timeout: Duration::from_secs(5),
        }
    }
}
