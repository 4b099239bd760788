//! Server Configuration
//!
//! Read from the environment (after `.env` has been loaded).

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3002;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORT: {0}")]
    InvalidPort(String),

    #[error("unknown PAYMENT_PROCESSOR: {0} (expected \"stripe\" or \"mock\")")]
    UnknownProcessor(String),
}

/// Which processor backs the gateway
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessorMode {
    Stripe,
    /// In-memory processor, for local demos
    Mock,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub processor: ProcessorMode,
    pub stripe_secret_key: Option<String>,

    /// Bearer token required on payment routes, if set
    pub api_key: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // Empty values count as unset
        let get = |key: &str| get(key).filter(|value| !value.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let processor = match get("PAYMENT_PROCESSOR").map(|p| p.trim().to_lowercase()) {
            None => ProcessorMode::Stripe,
            Some(p) if p == "stripe" => ProcessorMode::Stripe,
            Some(p) if p == "mock" => ProcessorMode::Mock,
            Some(other) => return Err(ConfigError::UnknownProcessor(other)),
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
            port,
            processor,
            stripe_secret_key: get("STRIPE_SECRET_KEY"),
            api_key: get("GATEWAY_API_KEY"),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:3002");
        assert_eq!(config.processor, ProcessorMode::Stripe);
        assert!(config.stripe_secret_key.is_none());
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("PAYMENT_PROCESSOR", "Mock"),
            ("STRIPE_SECRET_KEY", "sk_test_123"),
            ("GATEWAY_API_KEY", "secret"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.processor, ProcessorMode::Mock);
        assert_eq!(config.stripe_secret_key.as_deref(), Some("sk_test_123"));
        assert_eq!(config.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = config(&[("STRIPE_SECRET_KEY", ""), ("GATEWAY_API_KEY", "  ")]).unwrap();
        assert!(config.stripe_secret_key.is_none());
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            config(&[("PORT", "http")]).unwrap_err(),
            ConfigError::InvalidPort("http".into())
        );
        assert!(matches!(
            config(&[("PAYMENT_PROCESSOR", "paypal")]).unwrap_err(),
            ConfigError::UnknownProcessor(_)
        ));
    }
}
