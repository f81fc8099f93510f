//! Process-level settings for the HTTP service.

use std::env;

use crate::error::AppError;

pub const DEFAULT_STALE_AFTER_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Base URL of the tournament app; `None` runs with an in-memory directory.
    pub directory_base_url: Option<String>,
    /// Redis URL for change notifications; `None` keeps events in-process.
    pub redis_url: Option<String>,
    pub stale_after_hours: i64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("BACKEND_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("BACKEND_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                AppError::config(format!("BACKEND_PORT must be a valid port number, got '{raw}'"))
            })?,
            None => 3001,
        };
        let stale_after_hours = match lookup("VETO_STALE_AFTER_HOURS") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(h) if h > 0 => h,
                _ => {
                    return Err(AppError::config(format!(
                        "VETO_STALE_AFTER_HOURS must be a positive integer, got '{raw}'"
                    )))
                }
            },
            None => DEFAULT_STALE_AFTER_HOURS,
        };

        Ok(Self {
            host,
            port,
            directory_base_url: lookup("DIRECTORY_BASE_URL").filter(|s| !s.is_empty()),
            redis_url: lookup("REDIS_URL").filter(|s| !s.is_empty()),
            stale_after_hours,
        })
    }
}
