use std::{env, fmt::Display, str::FromStr};

use anyhow::{anyhow, Result};
use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub db_path: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Self {
            port: try_load("LINGO_PORT", "5001")?,
            db_path: try_load("LINGO_DB_PATH", "lingo-db")?,
        })
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
            anyhow!("environment misconfigured: {key}: {e}")
        })
}
