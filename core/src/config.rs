//! Endpoint and transport settings.

use std::env;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_BASE_PATH: &str = "https://carangas.herokuapp.com/cars";
pub const DEFAULT_BRANDS_URL: &str = "https://fipeapi.appspot.com/api/1/carros/marcas.json";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_CONNECTIONS_PER_HOST: usize = 5;

/// Everything needed to construct a client. Passed in explicitly; there is no
/// process-wide session.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Root collection endpoint for car resources.
    pub base_path: String,
    /// Third-party brand catalog endpoint.
    pub brands_url: String,
    pub timeout: Duration,
    pub max_connections_per_host: usize,
    /// Headers the transport attaches to every request.
    pub default_headers: Vec<(String, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            brands_url: DEFAULT_BRANDS_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_connections_per_host: DEFAULT_MAX_CONNECTIONS_PER_HOST,
            default_headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `CARANGAS_BASE_PATH`, `CARANGAS_BRANDS_URL`,
    /// `CARANGAS_TIMEOUT_SECS` and `CARANGAS_MAX_CONNECTIONS_PER_HOST`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(base_path) = lookup("CARANGAS_BASE_PATH") {
            config.base_path = base_path;
        }
        if let Some(brands_url) = lookup("CARANGAS_BRANDS_URL") {
            config.brands_url = brands_url;
        }
        if let Some(secs) = positive_number(&lookup, "CARANGAS_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(max) = positive_number(&lookup, "CARANGAS_MAX_CONNECTIONS_PER_HOST")? {
            config.max_connections_per_host = max as usize;
        }
        Ok(config)
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_brands_url(mut self, brands_url: impl Into<String>) -> Self {
        self.brands_url = brands_url.into();
        self
    }
}

fn positive_number(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<u64>, ConfigError> {
    let Some(value) = lookup(var) else {
        return Ok(None);
    };
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(ConfigError::InvalidNumber { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_match_transport_policy() {
        let config = ClientConfig::default();
        assert_eq!(config.base_path, DEFAULT_BASE_PATH);
        assert_eq!(config.brands_url, DEFAULT_BRANDS_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_connections_per_host, 5);
        assert_eq!(
            config.default_headers,
            vec![("Content-Type".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("CARANGAS_BASE_PATH", "http://localhost:3000/cars"),
            ("CARANGAS_BRANDS_URL", "http://localhost:3000/brands"),
            ("CARANGAS_TIMEOUT_SECS", "3"),
            ("CARANGAS_MAX_CONNECTIONS_PER_HOST", " 2 "),
        ]))
        .unwrap();
        assert_eq!(config.base_path, "http://localhost:3000/cars");
        assert_eq!(config.brands_url, "http://localhost:3000/brands");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.max_connections_per_host, 2);
    }

    #[test]
    fn zero_or_garbage_numbers_are_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[("CARANGAS_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumber { var: "CARANGAS_TIMEOUT_SECS", .. }
        ));

        let err = ClientConfig::from_lookup(lookup(&[("CARANGAS_MAX_CONNECTIONS_PER_HOST", "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { .. }));
    }

    #[test]
    fn builders_replace_endpoints() {
        let config = ClientConfig::default()
            .with_base_path("http://a/cars")
            .with_brands_url("http://b/brands");
        assert_eq!(config.base_path, "http://a/cars");
        assert_eq!(config.brands_url, "http://b/brands");
    }
}
