//! Provider selection from configuration.

use std::sync::Arc;
use std::time::Duration;
use parley_core::error::ProviderError;
use parley_core::provider::Provider;
use crate::openai_compat::OpenAiCompatProvider;

/// Build the configured completion provider.
pub fn build_from_config(
    config: &parley_config::AppConfig,
) -> Result<Arc<dyn Provider>, ProviderError> {
    Ok(Arc::new(build_openai_compat(config)?))
}

fn build_openai_compat(
    config: &parley_config::AppConfig,
) -> Result<OpenAiCompatProvider, ProviderError> {
    let api_key = config.api_key.clone().unwrap_or_default();
    let base_url = config.resolved_api_url().ok_or_else(|| {
        ProviderError::NotConfigured(format!(
            "unknown provider '{}' and no api_url set",
            config.provider
        ))
    })?;

    tracing::debug!(provider = %config.provider, %base_url, "Building provider");

    OpenAiCompatProvider::new(
        &config.provider,
        base_url,
        api_key,
        Duration::from_secs(config.timeout_secs),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_from_default_config() {
        let config = parley_config::AppConfig::default();
        let provider = build_from_config(&config).unwrap();
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn known_provider_uses_its_default_url() {
        let config = parley_config::AppConfig {
            provider: "ollama".into(),
            ..parley_config::AppConfig::default()
        };
        let provider = build_openai_compat(&config).unwrap();
        assert_eq!(provider.base_url(), "http://localhost:11434/v1");
    }

    #[test]
    fn api_url_override_is_used() {
        let config = parley_config::AppConfig {
            provider: "local".into(),
            api_url: Some("http://127.0.0.1:9999/v1/".into()),
            ..parley_config::AppConfig::default()
        };
        let provider = build_openai_compat(&config).unwrap();
        assert_eq!(provider.name(), "local");
        assert_eq!(provider.base_url(), "http://127.0.0.1:9999/v1");
    }

    #[test]
    fn unknown_provider_without_url_is_not_configured() {
        let config = parley_config::AppConfig {
            provider: "mystery".into(),
            ..parley_config::AppConfig::default()
        };
        assert!(matches!(
            build_from_config(&config),
            Err(ProviderError::NotConfigured(_))
        ));
    }
}
