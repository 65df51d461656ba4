//! Configuration system for InsightSynth.
//!
//! Uses `figment` for layered configuration: defaults -> config file -> environment -> overrides.
//! Configuration is loaded from `~/.config/insightsynth/config.toml` and/or
//! `.insightsynth/config.toml` in the workspace directory.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::gateway::ServerConfig;

/// Values shipped in `.env.example` files that mean "no key configured".
const PLACEHOLDER_KEYS: &[&str] = &[
    "your_anthropic_api_key_here",
    "your_tavily_api_key_here",
    "demo_mode",
];

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsightConfig {
    pub llm: LlmConfig,
    pub search: SearchConfig,
    pub research: ResearchConfig,
    pub server: ServerConfig,
}

impl InsightConfig {
    /// Render as pretty TOML, the format of the config files.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate all sections and collect human-readable warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = self.llm.validate();
        warnings.extend(self.research.validate());
        warnings
    }
}

/// Text-generation capability settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name. Only "anthropic" is supported.
    pub provider: String,
    /// Model identifier.
    pub model: String,
    /// Environment variable name containing the API key.
    pub api_key_env: String,
    /// Optional base URL override for the API endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Maximum tokens to generate in a response.
    pub max_tokens: usize,
    /// Temperature for generation.
    pub temperature: f32,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            base_url: None,
            max_tokens: 1500,
            temperature: 0.3,
            timeout_secs: 60,
        }
    }
}

impl LlmConfig {
    /// Validate this LLM config and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !(0.0..=1.0).contains(&self.temperature) {
            warnings.push(format!(
                "llm.temperature ({}) is outside 0.0-1.0",
                self.temperature
            ));
        }
        if self.max_tokens == 0 {
            warnings.push("llm.max_tokens is 0; every completion will be empty".to_string());
        }
        warnings
    }

    /// The API key, if one is configured and is not a placeholder.
    pub fn api_key(&self) -> Option<String> {
        resolve_api_key(&self.api_key_env)
    }
}

/// Web search capability settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Provider name. Only "tavily" is supported.
    pub provider: String,
    /// Environment variable name containing the API key.
    pub api_key_env: String,
    /// Optional base URL override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Search depth passed to the provider ("basic" or "advanced").
    pub search_depth: String,
    /// Domains the provider should prefer.
    pub include_domains: Vec<String>,
    /// Domains the provider should never return.
    pub exclude_domains: Vec<String>,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: "tavily".to_string(),
            api_key_env: "TAVILY_API_KEY".to_string(),
            base_url: None,
            search_depth: "advanced".to_string(),
            include_domains: vec![
                "edu".into(),
                "org".into(),
                "gov".into(),
                "arxiv.org".into(),
                "pubmed.ncbi.nlm.nih.gov".into(),
            ],
            exclude_domains: vec![
                "wikipedia.org".into(),
                "reddit.com".into(),
                "quora.com".into(),
            ],
            timeout_secs: 20,
        }
    }
}

impl SearchConfig {
    /// The API key, if one is configured and is not a placeholder.
    pub fn api_key(&self) -> Option<String> {
        resolve_api_key(&self.api_key_env)
    }
}

/// Pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Sources requested when a caller does not say.
    pub default_max_sources: usize,
    /// Largest `max_sources` a caller may request.
    pub max_sources_limit: usize,
    /// Use canned topical content instead of the plain fallback text
    /// when no text-generation capability is configured.
    pub demo_mode: bool,
    /// Search hits scoring below this are discarded.
    pub min_credibility: f64,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            default_max_sources: 3,
            max_sources_limit: 10,
            demo_mode: false,
            min_credibility: 0.6,
        }
    }
}

impl ResearchConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.default_max_sources == 0 {
            warnings.push("research.default_max_sources must be at least 1".to_string());
        }
        if self.default_max_sources > self.max_sources_limit {
            warnings.push(format!(
                "research.default_max_sources ({}) exceeds research.max_sources_limit ({})",
                self.default_max_sources, self.max_sources_limit
            ));
        }
        if !(0.0..=1.0).contains(&self.min_credibility) {
            warnings.push(format!(
                "research.min_credibility ({}) is outside 0.0-1.0",
                self.min_credibility
            ));
        }
        warnings
    }
}

/// Read an API key from the environment, treating blanks and known
/// placeholder values as absent.
pub fn resolve_api_key(env_var: &str) -> Option<String> {
    let value = std::env::var(env_var).ok()?;
    let value = value.trim();
    if value.is_empty() || PLACEHOLDER_KEYS.contains(&value) {
        None
    } else {
        Some(value.to_string())
    }
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (prefixed with `INSIGHTSYNTH_`)
/// 3. Workspace-local config (`.insightsynth/config.toml`)
/// 4. User config (`~/.config/insightsynth/config.toml`)
/// 5. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&InsightConfig>,
) -> Result<InsightConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(InsightConfig::default()));

    if let Some(config_dir) = directories::ProjectDirs::from("dev", "insightsynth", "insightsynth") {
        let user_config = config_dir.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // INSIGHTSYNTH_RESEARCH__DEMO_MODE, INSIGHTSYNTH_SERVER__PORT, etc.
    figment = figment.merge(Env::prefixed("INSIGHTSYNTH_").split("__"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    figment
        .extract()
        .map_err(|e| ConfigError::Load(Box::new(e)))
}

/// Path of the workspace-local config file.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".insightsynth").join("config.toml")
}

/// Write the default configuration into `workspace`.
///
/// Returns the new file's path, or `None` if a config file already exists
/// there. An existing file is never touched.
pub fn init_workspace_config(workspace: &Path) -> crate::Result<Option<PathBuf>> {
    let path = workspace_config_path(workspace);
    if path.exists() {
        return Ok(None);
    }
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&path, InsightConfig::default().to_toml()?)?;
    Ok(Some(path))
}
