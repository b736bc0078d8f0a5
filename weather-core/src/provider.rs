use crate::{Config, FetchError, Location, WeatherSnapshot, provider::cwa::CwaProvider};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod cwa;

/// Source of current conditions for a location.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// One request, no retry. Every failure comes back as a [`FetchError`].
    async fn fetch_weather(&self, location: &Location) -> Result<WeatherSnapshot, FetchError>;
}

/// Construct the provider from config.
///
/// Fails when no API key is available; callers treat that as fatal.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.require_api_key()?;

    let provider = match config.base_url.as_deref() {
        Some(base_url) => CwaProvider::with_base_url(api_key, base_url)?,
        None => CwaProvider::new(api_key)?,
    };

    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn provider_from_config_rejects_bad_base_url() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            base_url: Some("::nope::".into()),
            ..Config::default()
        };
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("Invalid base URL"));
    }

    #[test]
    fn provider_from_config_works_when_key_set() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            ..Config::default()
        };
        assert!(provider_from_config(&cfg).is_ok());
    }
}
