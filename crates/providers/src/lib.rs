//! Model endpoint clients for toolrelay.
//!
//! All providers implement the `toolrelay_core::Provider` trait.

pub mod anthropic;

pub use anthropic::AnthropicProvider;

use std::sync::Arc;
use std::time::Duration;
use toolrelay_config::AppConfig;
use toolrelay_core::{Provider, ProviderError};

/// Failures constructing a provider from configuration.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("No API key configured")]
    MissingApiKey,

    #[error(transparent)]
    Client(#[from] ProviderError),
}

/// Build the configured provider.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, BuildError> {
    let api_key = config
        .api_key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or(BuildError::MissingApiKey)?;

    let provider = AnthropicProvider::with_timeout(
        api_key,
        Duration::from_secs(config.request_timeout_secs),
    )?
    .with_base_url(&config.base_url);

    tracing::debug!(base_url = %config.base_url, "Built Anthropic provider");
    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_rejected() {
        let config = AppConfig::default();
        assert!(matches!(
            build_from_config(&config),
            Err(BuildError::MissingApiKey)
        ));
    }

    #[test]
    fn builds_with_key() {
        let config = AppConfig {
            api_key: Some("sk-ant-test".into()),
            ..AppConfig::default()
        };
        let provider = build_from_config(&config).unwrap();
        assert_eq!(provider.name(), "anthropic");
    }
}
