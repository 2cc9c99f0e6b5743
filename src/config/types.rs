use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root settings aggregate.
///
/// Every nested value is owned, so `clone()` always yields an independent
/// object graph. Baseline and draft copies rely on that.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub available_providers: Vec<ProviderConfig>,
    pub current_provider: ProviderConfig,
    pub model: ModelConfig,
    pub language: LanguageConfig,
    pub inference: InferenceBaseConfig,
}

/// Connection profile for an LLM provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// Assigned by the backing store. Empty for a provider not yet created.
    pub id: String,
    /// Display name, unique across the available providers.
    pub name: String,
    /// Provider family (e.g. "openai", "ollama").
    #[serde(rename = "type")]
    pub provider_type: String,
    /// Base URL for the API (e.g. "https://api.openai.com/v1").
    pub base_url: String,
    pub models_endpoint: String,
    pub completion_endpoint: String,
    /// Authentication type: "api_key", "bearer", "none".
    #[serde(rename = "authType")]
    pub auth_type_str: String,
    pub auth_token: String,
    /// Read the token from `env_var_token_name` instead of `auth_token`.
    pub use_auth_token_from_env: bool,
    pub env_var_token_name: String,
    pub use_custom_headers: bool,
    pub headers: BTreeMap<String, String>,
    pub use_custom_models: bool,
    pub custom_models: Vec<String>,
}

/// Model parameters. Exactly one per settings aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelConfig {
    pub name: String,
    pub use_temperature: bool,
    /// Sampling temperature in `[0, 2]`.
    pub temperature: f64,
}

/// Language preferences.
///
/// `languages` behaves as a set that keeps insertion order for display.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageConfig {
    pub languages: Vec<String>,
    pub default_input: String,
    pub default_output: String,
}

/// Request behaviour shared by all providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InferenceBaseConfig {
    /// Request timeout in seconds, `[1, 600]`.
    pub timeout_seconds: u32,
    /// Retry attempts, `[0, 10]`.
    pub max_retries: u32,
    pub use_markdown_for_output: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            use_temperature: false,
            temperature: 0.7,
        }
    }
}

impl Default for InferenceBaseConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            max_retries: 3,
            use_markdown_for_output: false,
        }
    }
}

impl LanguageConfig {
    pub fn contains(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l == language)
    }

    /// A language assigned as a default cannot be removed.
    pub fn is_protected(&self, language: &str) -> bool {
        !language.is_empty() && (self.default_input == language || self.default_output == language)
    }

    /// Replace the language list, dropping duplicates and keeping first occurrences.
    pub fn set_languages(&mut self, languages: &[String]) {
        self.languages.clear();
        for language in languages {
            if !self.contains(language) {
                self.languages.push(language.clone());
            }
        }
    }
}

impl Settings {
    /// Factory defaults returned by a fresh backing store.
    pub fn factory_defaults() -> Self {
        let provider = ProviderConfig {
            id: "default".to_string(),
            name: "Ollama".to_string(),
            provider_type: "ollama".to_string(),
            base_url: "http://localhost:11434".to_string(),
            models_endpoint: "/api/tags".to_string(),
            completion_endpoint: "/api/chat".to_string(),
            auth_type_str: "none".to_string(),
            ..ProviderConfig::default()
        };
        Self {
            available_providers: vec![provider.clone()],
            current_provider: provider,
            model: ModelConfig {
                name: "llama3.2".to_string(),
                ..ModelConfig::default()
            },
            language: LanguageConfig {
                languages: vec!["en".to_string()],
                default_input: "en".to_string(),
                default_output: "en".to_string(),
            },
            inference: InferenceBaseConfig::default(),
        }
    }

    pub fn provider(&self, id: &str) -> Option<&ProviderConfig> {
        self.available_providers.iter().find(|p| p.id == id)
    }

    pub fn provider_by_name(&self, name: &str) -> Option<&ProviderConfig> {
        self.available_providers.iter().find(|p| p.name == name)
    }

    /// Checks the invariants a committed (baseline) aggregate must satisfy.
    ///
    /// Checks:
    /// - `current_provider.id` matches exactly one available provider
    /// - non-empty default languages are part of `languages`
    pub fn check_committed(&self) -> Result<(), String> {
        let matches = self
            .available_providers
            .iter()
            .filter(|p| p.id == self.current_provider.id)
            .count();
        if matches != 1 {
            return Err(format!(
                "Current provider '{}' matches {} available providers",
                self.current_provider.id, matches
            ));
        }

        for (label, language) in [
            ("input", &self.language.default_input),
            ("output", &self.language.default_output),
        ] {
            if !language.is_empty() && !self.language.contains(language) {
                return Err(format!(
                    "Default {} language '{}' is not in the language list",
                    label, language
                ));
            }
        }

        Ok(())
    }
}
