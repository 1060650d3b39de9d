use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::domain::order::TransitionPolicy;

// ============================================================================
// Runtime Configuration
// ============================================================================
//
// Read once at startup from the process environment:
// - DEALERSHIP_BIND_ADDR          - listen address (default 127.0.0.1)
// - DEALERSHIP_PORT               - listen port (default 8080)
// - DEALERSHIP_TRANSITION_POLICY  - permissive | strict
// - DEALERSHIP_SEED_DEMO          - true | false
//
// ============================================================================

pub const ENV_BIND_ADDR: &str = "DEALERSHIP_BIND_ADDR";
pub const ENV_PORT: &str = "DEALERSHIP_PORT";
pub const ENV_TRANSITION_POLICY: &str = "DEALERSHIP_TRANSITION_POLICY";
pub const ENV_SEED_DEMO: &str = "DEALERSHIP_SEED_DEMO";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid IP address: {value:?}")]
    InvalidBindAddr { var: &'static str, value: String },

    #[error("{var} is not a valid port: {value:?}")]
    InvalidPort { var: &'static str, value: String },

    #[error("{var} must be \"permissive\" or \"strict\", got {value:?}")]
    InvalidPolicy { var: &'static str, value: String },

    #[error("{var} must be \"true\" or \"false\", got {value:?}")]
    InvalidFlag { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub transition_policy: TransitionPolicy,
    pub seed_demo: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
            transition_policy: TransitionPolicy::Permissive,
            seed_demo: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        if let Some(value) = get(ENV_BIND_ADDR) {
            config.bind_addr = value
                .parse()
                .map_err(|_| ConfigError::InvalidBindAddr { var: ENV_BIND_ADDR, value })?;
        }

        if let Some(value) = get(ENV_PORT) {
            config.port = value
                .parse()
                .map_err(|_| ConfigError::InvalidPort { var: ENV_PORT, value })?;
        }

        if let Some(value) = get(ENV_TRANSITION_POLICY) {
            config.transition_policy = match value.to_ascii_lowercase().as_str() {
                "permissive" => TransitionPolicy::Permissive,
                "strict" => TransitionPolicy::Strict,
                _ => return Err(ConfigError::InvalidPolicy { var: ENV_TRANSITION_POLICY, value }),
            };
        }

        if let Some(value) = get(ENV_SEED_DEMO) {
            config.seed_demo = match value.to_ascii_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                _ => return Err(ConfigError::InvalidFlag { var: ENV_SEED_DEMO, value }),
            };
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
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
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_BIND_ADDR, "0.0.0.0"),
            (ENV_PORT, "9000"),
            (ENV_TRANSITION_POLICY, "Strict"),
            (ENV_SEED_DEMO, "true"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:9000");
        assert_eq!(config.transition_policy, TransitionPolicy::Strict);
        assert!(config.seed_demo);
    }

    #[test]
    fn test_blank_values_keep_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[(ENV_PORT, "  ")])).unwrap();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_malformed_values() {
        let err = AppConfig::from_lookup(lookup_from(&[(ENV_PORT, "80a")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidPort { var: ENV_PORT, value: "80a".to_string() }
        );

        let err = AppConfig::from_lookup(lookup_from(&[(ENV_TRANSITION_POLICY, "loose")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPolicy { .. }));

        let err = AppConfig::from_lookup(lookup_from(&[(ENV_SEED_DEMO, "yes")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "DEALERSHIP_SEED_DEMO must be \"true\" or \"false\", got \"yes\""
        );

        let err = AppConfig::from_lookup(lookup_from(&[(ENV_BIND_ADDR, "localhost")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));
    }
}
