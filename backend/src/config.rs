//! Server settings read from the environment.
//!
//! An optional `.env` file next to the binary is loaded first, so operators
//! can keep the values alongside the launch scripts.

use chrono::TimeDelta;
use log::warn;
use std::env;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_JOB_RETENTION_SECS: u64 = 600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Open the UI in the default browser once the server is up.
    pub open_browser: bool,
    /// Seconds a finished job stays queryable before it is evicted.
    pub job_retention_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            open_browser: true,
            job_retention_secs: DEFAULT_JOB_RETENTION_SECS,
        }
    }
}

impl ServerConfig {
    /// Reads `APP_HOST`, `APP_PORT`, `APP_OPEN_BROWSER` and
    /// `APP_JOB_RETENTION_SECS`, falling back to the defaults for anything
    /// missing or malformed.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let host = lookup("APP_HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or(defaults.host);

        let port = match lookup("APP_PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("Invalid APP_PORT {:?}, using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => defaults.port,
        };

        let open_browser = match lookup("APP_OPEN_BROWSER") {
            Some(raw) => !matches!(raw.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no"),
            None => defaults.open_browser,
        };

        let job_retention_secs = match lookup("APP_JOB_RETENTION_SECS") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(
                    "Invalid APP_JOB_RETENTION_SECS {:?}, using {}",
                    raw, DEFAULT_JOB_RETENTION_SECS
                );
                DEFAULT_JOB_RETENTION_SECS
            }),
            None => defaults.job_retention_secs,
        };

        Self {
            host,
            port,
            open_browser,
            job_retention_secs,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn job_retention(&self) -> TimeDelta {
        i64::try_from(self.job_retention_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX)
    }
}
