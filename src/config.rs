//! Tracker configuration from environment variables

use crate::mpc::identifier::DEFAULT_IDENTIFIER_URL;
use crate::mpc::observations::DEFAULT_OBSERVATIONS_URL;
use crate::tracker::{DEFAULT_PROBE_END, DEFAULT_PROBE_START};
use std::env;
use std::time::Duration;

#[derive(Debug)]
pub enum ConfigError {
    InvalidNumber { var: &'static str, value: String },
    InvalidProbeRange { start: u32, end: u32 },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidNumber { var, value } => {
                write!(f, "{} must be a non-negative integer, got {:?}", var, value)
            }
            ConfigError::InvalidProbeRange { start, end } => write!(
                f,
                "probe range {}..={} is invalid (start must be >= 1 and <= end)",
                start, end
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration for one tracking run
///
/// Loaded from environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Path to the catalog CSV file
    pub catalog_path: String,

    /// MPC identifier endpoint
    pub identifier_url: String,

    /// MPC observations endpoint
    pub observations_url: String,

    /// Discord webhook; `None` disables delivery
    pub discord_webhook_url: Option<String>,

    /// First index probed in each half-month block
    pub probe_start: u32,

    /// Last index probed in each half-month block
    pub probe_end: u32,

    /// Minimum delay between observation requests in milliseconds
    pub observation_fetch_delay_ms: u64,

    /// HTTP request timeout in seconds
    pub http_timeout_secs: u64,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn number_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => match value.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(_) => Err(ConfigError::InvalidNumber { var: name, value }),
        },
        _ => Ok(default),
    }
}

impl TrackerConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `COMET_CATALOG_PATH` (default: known_comets.csv)
    /// - `MPC_IDENTIFIER_URL` (default: MPC query-identifier API)
    /// - `MPC_OBSERVATIONS_URL` (default: MPC get-obs API)
    /// - `DISCORD_WEBHOOK_URL` (default: unset, notifications disabled)
    /// - `PROBE_START_INDEX` (default: 1)
    /// - `PROBE_END_INDEX` (default: 5)
    /// - `OBSERVATION_FETCH_DELAY_MS` (default: 1000)
    /// - `HTTP_TIMEOUT_SECS` (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            catalog_path: var_or("COMET_CATALOG_PATH", "known_comets.csv"),
            identifier_url: var_or("MPC_IDENTIFIER_URL", DEFAULT_IDENTIFIER_URL),
            observations_url: var_or("MPC_OBSERVATIONS_URL", DEFAULT_OBSERVATIONS_URL),
            discord_webhook_url: env::var("DISCORD_WEBHOOK_URL").ok(),
            probe_start: number_or("PROBE_START_INDEX", DEFAULT_PROBE_START)?,
            probe_end: number_or("PROBE_END_INDEX", DEFAULT_PROBE_END)?,
            observation_fetch_delay_ms: number_or("OBSERVATION_FETCH_DELAY_MS", 1_000)?,
            http_timeout_secs: number_or("HTTP_TIMEOUT_SECS", 10)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.probe_start == 0 || self.probe_start > self.probe_end {
            return Err(ConfigError::InvalidProbeRange {
                start: self.probe_start,
                end: self.probe_end,
            });
        }
        Ok(())
    }

    pub fn fetch_interval(&self) -> Duration {
        Duration::from_millis(self.observation_fetch_delay_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 8] = [
        "COMET_CATALOG_PATH",
        "MPC_IDENTIFIER_URL",
        "MPC_OBSERVATIONS_URL",
        "DISCORD_WEBHOOK_URL",
        "PROBE_START_INDEX",
        "PROBE_END_INDEX",
        "OBSERVATION_FETCH_DELAY_MS",
        "HTTP_TIMEOUT_SECS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    // Env vars are process-wide, so all cases run in one test
    #[test]
    fn test_config_from_env() {
        // Defaults
        clear_env();
        let config = TrackerConfig::from_env().unwrap();
        assert_eq!(config.catalog_path, "known_comets.csv");
        assert_eq!(config.identifier_url, DEFAULT_IDENTIFIER_URL);
        assert_eq!(config.observations_url, DEFAULT_OBSERVATIONS_URL);
        assert!(config.discord_webhook_url.is_none());
        assert_eq!(config.probe_start, 1);
        assert_eq!(config.probe_end, 5);
        assert_eq!(config.fetch_interval(), Duration::from_millis(1_000));
        assert_eq!(config.http_timeout(), Duration::from_secs(10));

        // Custom values
        env::set_var("COMET_CATALOG_PATH", "/tmp/comets.csv");
        env::set_var("PROBE_END_INDEX", "9");
        env::set_var("OBSERVATION_FETCH_DELAY_MS", "250");
        let config = TrackerConfig::from_env().unwrap();
        assert_eq!(config.catalog_path, "/tmp/comets.csv");
        assert_eq!(config.probe_end, 9);
        assert_eq!(config.fetch_interval(), Duration::from_millis(250));

        // Bad number
        env::set_var("HTTP_TIMEOUT_SECS", "soon");
        assert!(matches!(
            TrackerConfig::from_env(),
            Err(ConfigError::InvalidNumber { var: "HTTP_TIMEOUT_SECS", .. })
        ));
        env::remove_var("HTTP_TIMEOUT_SECS");

        // Inverted probe range
        env::set_var("PROBE_START_INDEX", "10");
        assert!(matches!(
            TrackerConfig::from_env(),
            Err(ConfigError::InvalidProbeRange { start: 10, end: 9 })
        ));

        clear_env();
    }

    #[test]
    fn test_zero_start_index_is_invalid() {
        let config = TrackerConfig {
            catalog_path: String::new(),
            identifier_url: String::new(),
            observations_url: String::new(),
            discord_webhook_url: None,
            probe_start: 0,
            probe_end: 5,
            observation_fetch_delay_ms: 0,
            http_timeout_secs: 1,
        };
        assert!(config.validate().is_err());
    }
}
