use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base for the `/humanize` and `/upload` webhooks.
    pub webhook_base_url: String,
    /// GraphQL endpoint of the hosted backend. Not called by the local paths.
    #[allow(dead_code)]
    pub graphql_endpoint: String,
    pub data_dir: PathBuf,
    pub port: u16,
    pub processing_delay: Duration,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            webhook_base_url: "http://localhost:5678/webhook".to_string(),
            graphql_endpoint: "http://localhost:8080/v1/graphql".to_string(),
            data_dir: PathBuf::from("./data"),
            port: 4100,
            processing_delay: Duration::from_millis(2000),
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// An empty `WEBHOOK_BASE_URL` switches humanizing to the local engine.
    pub fn webhook_enabled(&self) -> bool {
        !self.webhook_base_url.trim().is_empty()
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            None => defaults.port,
        };
        let processing_delay = match lookup("PROCESSING_DELAY_MS") {
            Some(raw) => Duration::from_millis(
                raw.parse::<u64>()
                    .context("PROCESSING_DELAY_MS must be a whole number of milliseconds")?,
            ),
            None => defaults.processing_delay,
        };

        Ok(Config {
            webhook_base_url: lookup("WEBHOOK_BASE_URL").unwrap_or(defaults.webhook_base_url),
            graphql_endpoint: lookup("GRAPHQL_ENDPOINT").unwrap_or(defaults.graphql_endpoint),
            data_dir: lookup("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            port,
            processing_delay,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.webhook_base_url, "http://localhost:5678/webhook");
        assert_eq!(config.port, 4100);
        assert_eq!(config.processing_delay, Duration::from_millis(2000));
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("WEBHOOK_BASE_URL", "https://hooks.example.com"),
            ("PORT", "9000"),
            ("PROCESSING_DELAY_MS", "0"),
            ("DATA_DIR", "/tmp/humanizer"),
        ]))
        .unwrap();
        assert_eq!(config.webhook_base_url, "https://hooks.example.com");
        assert_eq!(config.port, 9000);
        assert_eq!(config.processing_delay, Duration::ZERO);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/humanizer"));
    }

    #[test]
    fn test_blank_webhook_url_disables_webhook() {
        assert!(Config::from_lookup(lookup(&[])).unwrap().webhook_enabled());
        let config = Config::from_lookup(lookup(&[("WEBHOOK_BASE_URL", "  ")])).unwrap();
        assert!(!config.webhook_enabled());
    }

    #[test]
    fn test_malformed_numbers_are_errors() {
        assert!(Config::from_lookup(lookup(&[("PORT", "eighty")])).is_err());
        assert!(Config::from_lookup(lookup(&[("PROCESSING_DELAY_MS", "-5")])).is_err());
    }
}
