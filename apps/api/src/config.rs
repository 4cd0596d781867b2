use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_BASE_URL: &str = "https://api.groq.com";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Application configuration loaded from environment variables.
///
/// The inference credential is deliberately optional here: a missing key does not
/// stop the server from starting, but every inference call fails closed until one is set.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: Option<String>,
    pub groq_base_url: String,
    pub inference_timeout: Duration,
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source. `from_env` passes the process environment.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let timeout_secs = match var("INFERENCE_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .context("INFERENCE_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            groq_api_key: var("GROQ_API_KEY"),
            groq_base_url: var("GROQ_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            inference_timeout: Duration::from_secs(timeout_secs),
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: var("PORT")
                .unwrap_or_else(|| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Overrides whatever credential the environment provided with an explicit value.
    #[allow(dead_code)]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.groq_api_key = Some(api_key.into());
        self
    }
}

#[cfg(test)]
impl Config {
    /// Configuration for tests: no environment lookups, no credential.
    pub fn for_tests(base_url: &str) -> Self {
        Config {
            groq_api_key: None,
            groq_base_url: base_url.to_string(),
            inference_timeout: Duration::from_secs(2),
            host: "127.0.0.1".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_explicit_api_key_overrides_environment_value() {
        let config = Config::from_lookup(lookup_from(&[("GROQ_API_KEY", "env-key")]))
            .unwrap()
            .with_api_key("explicit-key");
        assert_eq!(config.groq_api_key.as_deref(), Some("explicit-key"));
    }

    #[test]
    fn test_environment_api_key_used_without_explicit_value() {
        let config = Config::from_lookup(lookup_from(&[("GROQ_API_KEY", " env-key \n")])).unwrap();
        assert_eq!(config.groq_api_key.as_deref(), Some("env-key"));
    }

    #[test]
    fn test_blank_api_key_counts_as_absent() {
        let config = Config::from_lookup(lookup_from(&[("GROQ_API_KEY", "   ")])).unwrap();
        assert!(config.groq_api_key.is_none());
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.groq_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.inference_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8000);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_invalid_port_and_timeout_are_errors() {
        assert!(Config::from_lookup(lookup_from(&[("PORT", "eighty")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("INFERENCE_TIMEOUT_SECS", "-1")])).is_err());
    }

    #[test]
    fn test_test_config_has_no_credential() {
        let config = Config::for_tests(DEFAULT_BASE_URL);
        assert!(config.groq_api_key.is_none());
    }
}
