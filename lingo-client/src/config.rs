use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::error::{ClientError, Result};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5001/api";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: None,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Reads `LINGO_API_URL`, `LINGO_TOKEN` and `LINGO_TIMEOUT_SECS`.
    pub fn load() -> Result<Self> {
        let api_url: String = try_load("LINGO_API_URL", DEFAULT_API_URL)?;
        let timeout_secs: u64 = try_load("LINGO_TIMEOUT_SECS", "10")?;
        let mut config = Self::new(api_url);
        config.token = env::var("LINGO_TOKEN").ok().filter(|token| !token.is_empty());
        config.timeout = Duration::from_secs(timeout_secs);
        if !config.api_url.starts_with("http://") && !config.api_url.starts_with("https://") {
            return Err(ClientError::Config(format!("LINGO_API_URL is not an http(s) url: {}", config.api_url)));
        }
        Ok(config)
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            ClientError::Config(format!("invalid {key}: {e}"))
        })
}
