//! `parley config`: Configuration management commands.

use parley_config::AppConfig;
use parley_core::provider::Provider;

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("Validating configuration at {}...", AppConfig::config_path().display());

    match AppConfig::load() {
        Ok(config) => {
            println!("   Config parsed successfully");

            let missing = config.missing_required_keys();
            if missing.is_empty() {
                println!("   All checks passed");
                let provider = parley_providers::build_from_config(&config)?;
                println!("   {}", describe_health(provider.as_ref()).await);
            } else {
                println!();
                for key in &missing {
                    println!("   Missing required key '{key}' (you will be prompted on `parley chat`)");
                }
            }

            println!();
            println!("   Provider:        {}", config.provider);
            println!("   Model:           {}", config.model);
            println!("   Max tokens:      {}", config.max_tokens);
            println!("   Reevaluations:   {}", config.task.max_reevaluations);
            println!("   Stop on sentinel: {}", config.task.stop_on_sentinel);
        }
        Err(e) => {
            println!("   Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    println!("{}", redacted_toml(&config)?);
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", AppConfig::config_path().display());
    Ok(())
}

/// Ask the provider whether it is reachable and describe the answer.
async fn describe_health(provider: &dyn Provider) -> String {
    match provider.health_check().await {
        Ok(true) => format!("Provider '{}' is reachable", provider.name()),
        Ok(false) => format!("Provider '{}' refused the health check", provider.name()),
        Err(e) => format!("Provider '{}' is unreachable: {e}", provider.name()),
    }
}

fn redacted_toml(config: &AppConfig) -> Result<String, toml::ser::Error> {
    let mut shown = config.clone();
    if shown.api_key.is_some() {
        shown.api_key = Some("***".into());
    }
    toml::to_string_pretty(&shown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::error::ProviderError;
    use parley_core::provider::{ProviderRequest, ProviderResponse};

    /// Answers health checks with a fixed outcome.
    struct FixedHealth(Result<bool, ProviderError>);

    #[async_trait::async_trait]
    impl Provider for FixedHealth {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            Err(ProviderError::EmptyResponse)
        }

        async fn health_check(&self) -> Result<bool, ProviderError> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn health_report_covers_each_outcome() {
        assert_eq!(
            describe_health(&FixedHealth(Ok(true))).await,
            "Provider 'fixed' is reachable"
        );
        assert_eq!(
            describe_health(&FixedHealth(Ok(false))).await,
            "Provider 'fixed' refused the health check"
        );
        let down = describe_health(&FixedHealth(Err(ProviderError::Network("refused".into())))).await;
        assert!(down.starts_with("Provider 'fixed' is unreachable"));
        assert!(down.contains("refused"));
    }

    #[test]
    fn config_path_is_valid() {
        let path = AppConfig::config_path();
        assert!(path.to_str().unwrap().ends_with(".toml"));
    }

    #[test]
    fn show_never_prints_the_key() {
        let config = AppConfig {
            api_key: Some("sk-secret".into()),
            ..AppConfig::default()
        };
        let out = redacted_toml(&config).unwrap();
        assert!(!out.contains("sk-secret"));
        assert!(out.contains("***"));
        assert!(out.contains("gpt-4o-mini"));
    }
}
