//! Text-generation provider implementations.
//!
//! Use `create_provider()` to instantiate the configured provider, or learn
//! that none is available and the pipeline should run in fallback mode.

pub mod anthropic;

use crate::brain::LlmProvider;
use crate::config::LlmConfig;
use crate::error::ConfigError;
use std::sync::Arc;

pub use anthropic::AnthropicProvider;

/// Create the provider named in `config`.
///
/// Returns `Ok(None)` when no usable API key is configured; that is the
/// normal offline path, not an error.
pub fn create_provider(config: &LlmConfig) -> Result<Option<Arc<dyn LlmProvider>>, ConfigError> {
    let Some(api_key) = config.api_key() else {
        tracing::debug!(
            env = %config.api_key_env,
            "No text-generation API key configured"
        );
        return Ok(None);
    };

    match config.provider.as_str() {
        "anthropic" => {
            let provider = AnthropicProvider::new_with_key(config, api_key);
            Ok(Some(Arc::new(provider)))
        }
        other => Err(ConfigError::UnsupportedProvider {
            kind: "llm".to_string(),
            name: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_without_key_is_none() {
        let config = LlmConfig {
            api_key_env: "INSIGHTSYNTH_TEST_LLM_KEY_ABSENT".to_string(),
            ..Default::default()
        };
        unsafe { std::env::remove_var(&config.api_key_env) };
        assert!(create_provider(&config).unwrap().is_none());
    }

    #[test]
    fn test_create_provider_anthropic() {
        let config = LlmConfig {
            api_key_env: "INSIGHTSYNTH_TEST_LLM_KEY_PRESENT".to_string(),
            ..Default::default()
        };
        unsafe { std::env::set_var(&config.api_key_env, "sk-ant-test") };
        let provider = create_provider(&config).unwrap().unwrap();
        assert_eq!(provider.model_name(), config.model);
        unsafe { std::env::remove_var(&config.api_key_env) };
    }

    #[test]
    fn test_create_provider_unknown_name() {
        let config = LlmConfig {
            provider: "palm".to_string(),
            api_key_env: "INSIGHTSYNTH_TEST_LLM_KEY_UNKNOWN".to_string(),
            ..Default::default()
        };
        unsafe { std::env::set_var(&config.api_key_env, "key") };
        let err = create_provider(&config).err().unwrap();
        assert!(matches!(err, ConfigError::UnsupportedProvider { ref name, .. } if name == "palm"));
        unsafe { std::env::remove_var(&config.api_key_env) };
    }
}
