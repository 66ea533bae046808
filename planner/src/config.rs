//! Client configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use shared::{Error, Result};

use crate::sync::DEFAULT_SAVE_DELAY;

pub const DEFAULT_API_URL: &str = "http://localhost:8888";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL serving `/api/get-events` and `/api/save-events`
    pub api_url: String,
    /// Debounce delay before a save
    pub save_delay: Duration,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        let save_delay = match env::var("PLANNER_SAVE_DELAY_MS") {
            Ok(raw) => parse_delay(&raw)?,
            Err(_) => DEFAULT_SAVE_DELAY,
        };

        Ok(Self {
            api_url: env::var("PLANNER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            save_delay,
        })
    }
}

fn parse_delay(raw: &str) -> Result<Duration> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| Error::Config(format!("PLANNER_SAVE_DELAY_MS must be milliseconds, got '{}'", raw)))
}
