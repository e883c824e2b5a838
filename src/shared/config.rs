/// Runtime configuration loaded from the environment (and `.env` when present)
use crate::shared::application::pagination::PAGE_SIZE_OPTIONS;
use crate::shared::errors::{AppError, AppResult};
use std::str::FromStr;
use std::time::Duration;

pub const ENV_API_BASE_URL: &str = "URBIS_API_BASE_URL";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "URBIS_HTTP_TIMEOUT_SECS";
pub const ENV_HISTORY_PAGE_SIZE: &str = "URBIS_HISTORY_PAGE_SIZE";
pub const ENV_NOTIFY_DEBOUNCE_MS: &str = "URBIS_NOTIFY_DEBOUNCE_MS";
pub const ENV_POLL_INTERVAL_SECS: &str = "URBIS_POLL_INTERVAL_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub http_timeout_secs: u64,
    pub history_page_size: u32,
    pub notify_debounce: Duration,
    /// `None` disables polling
    pub poll_interval: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            http_timeout_secs: 30,
            history_page_size: PAGE_SIZE_OPTIONS[1],
            notify_debounce: Duration::from_millis(250),
            poll_interval: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        // A missing .env file is not an error
        let _ = dotenvy::dotenv();
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys keep their defaults
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base_url = get(ENV_API_BASE_URL)
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);

        let http_timeout_secs =
            parse_var(ENV_HTTP_TIMEOUT_SECS, get(ENV_HTTP_TIMEOUT_SECS))?
                .unwrap_or(defaults.http_timeout_secs);

        let history_page_size: u32 =
            parse_var(ENV_HISTORY_PAGE_SIZE, get(ENV_HISTORY_PAGE_SIZE))?
                .unwrap_or(defaults.history_page_size);
        if history_page_size == 0 {
            return Err(AppError::InvalidInput(format!(
                "{} must be greater than 0",
                ENV_HISTORY_PAGE_SIZE
            )));
        }

        let notify_debounce = parse_var::<u64>(ENV_NOTIFY_DEBOUNCE_MS, get(ENV_NOTIFY_DEBOUNCE_MS))?
            .map(Duration::from_millis)
            .unwrap_or(defaults.notify_debounce);

        let poll_interval = parse_var::<u64>(ENV_POLL_INTERVAL_SECS, get(ENV_POLL_INTERVAL_SECS))?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self {
            api_base_url,
            http_timeout_secs,
            history_page_size,
            notify_debounce,
            poll_interval,
        })
    }
}

fn parse_var<T: FromStr>(key: &str, raw: Option<String>) -> AppResult<Option<T>> {
    raw.map(|value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::InvalidInput(format!("{} has invalid value '{}'", key, value)))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn source(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_source(source(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.history_page_size, 10);
        assert!(config.poll_interval.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_source(source(&[
            (ENV_API_BASE_URL, "https://cities.example/"),
            (ENV_HISTORY_PAGE_SIZE, "25"),
            (ENV_POLL_INTERVAL_SECS, "5"),
            (ENV_NOTIFY_DEBOUNCE_MS, "0"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "https://cities.example");
        assert_eq!(config.history_page_size, 25);
        assert_eq!(config.poll_interval, Some(Duration::from_secs(5)));
        assert_eq!(config.notify_debounce, Duration::ZERO);
    }

    #[test]
    fn test_invalid_value_names_variable() {
        let err = AppConfig::from_source(source(&[(ENV_HTTP_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(ref m) if m.contains(ENV_HTTP_TIMEOUT_SECS)));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = AppConfig::from_source(source(&[(ENV_HISTORY_PAGE_SIZE, "0")])).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
