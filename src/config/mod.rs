//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;

use crate::util::time::{DEFAULT_SIMULATION_TPS, MAX_SIMULATION_TPS};

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Bridge binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// Allowed front-end origin for CORS
    pub client_origin: String,
    /// Start the first round without waiting for a start trigger
    pub auto_start: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            log_level: "info".to_string(),
            tick_rate: DEFAULT_SIMULATION_TPS,
            client_origin: "http://localhost:3000".to_string(),
            auto_start: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // PORT wins over SERVER_ADDR so hosted runners can pick the port
        let server_addr = match (lookup("PORT"), lookup("SERVER_ADDR")) {
            (Some(port), _) => format!("127.0.0.1:{}", port)
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,
            (None, Some(addr)) => addr.parse().map_err(|_| ConfigError::InvalidAddress)?,
            (None, None) => defaults.server_addr,
        };

        let tick_rate = match lookup("TICK_RATE") {
            Some(raw) => {
                let rate: u32 = raw
                    .parse()
                    .map_err(|_| ConfigError::Invalid("TICK_RATE", raw.clone()))?;
                if rate == 0 || rate > MAX_SIMULATION_TPS {
                    return Err(ConfigError::Invalid("TICK_RATE", raw));
                }
                rate
            }
            None => defaults.tick_rate,
        };

        let auto_start = match lookup("AUTO_START") {
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => return Err(ConfigError::Invalid("AUTO_START", raw)),
            },
            None => defaults.auto_start,
        };

        Ok(Self {
            server_addr,
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            tick_rate,
            client_origin: lookup("CLIENT_ORIGIN").unwrap_or(defaults.client_origin),
            auto_start,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    Invalid(&'static str, String),

    #[error("Invalid server address format")]
    InvalidAddress,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.server_addr.port(), 8080);
        assert_eq!(config.tick_rate, 60);
        assert_eq!(config.log_level, "info");
        assert!(!config.auto_start);
    }

    #[test]
    fn port_overrides_server_addr() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "9000"),
            ("SERVER_ADDR", "0.0.0.0:7000"),
        ]))
        .unwrap();
        assert_eq!(config.server_addr.port(), 9000);
    }

    #[test]
    fn rejects_out_of_range_tick_rate() {
        let err = Config::from_lookup(lookup_from(&[("TICK_RATE", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("TICK_RATE", _)));

        let err = Config::from_lookup(lookup_from(&[("TICK_RATE", "fast")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("TICK_RATE", _)));
    }

    #[test]
    fn parses_auto_start_flag() {
        let config = Config::from_lookup(lookup_from(&[("AUTO_START", "TRUE")])).unwrap();
        assert!(config.auto_start);

        let err = Config::from_lookup(lookup_from(&[("AUTO_START", "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("AUTO_START", _)));
    }

    #[test]
    fn rejects_malformed_address() {
        let err = Config::from_lookup(lookup_from(&[("SERVER_ADDR", "nowhere")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAddress));
    }
}
