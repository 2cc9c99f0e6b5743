//! In-process backing store.
//!
//! Enforces the same rules a real settings service does (assigned ids,
//! unique provider names, protected current provider and default
//! languages) and records every call so tests can assert that a rejected
//! action never reached the store.

use async_trait::async_trait;
use parking_lot::{Mutex, MutexGuard};

use super::{BackingStore, RemoteError, RemoteResult};
use crate::config::{InferenceBaseConfig, ModelConfig, ProviderConfig, Settings};

pub struct MemoryBackingStore {
    inner: Mutex<MemoryInner>,
}

struct MemoryInner {
    settings: Settings,
    defaults: Settings,
    next_id: u64,
    fail_next: Option<String>,
    calls: Vec<&'static str>,
}

impl MemoryBackingStore {
    /// Create a store holding `settings`, with factory defaults for resets.
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Mutex::new(MemoryInner {
                next_id: settings.available_providers.len() as u64 + 1,
                settings,
                defaults: Settings::factory_defaults(),
                fail_next: None,
                calls: Vec::new(),
            }),
        }
    }

    /// Replace the settings restored by `fetch_default_settings`.
    pub fn with_defaults(self, defaults: Settings) -> Self {
        self.inner.lock().defaults = defaults;
        self
    }

    /// Current persisted settings.
    pub fn snapshot(&self) -> Settings {
        self.inner.lock().settings.clone()
    }

    /// Make the next call fail with `message`.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.inner.lock().fail_next = Some(message.into());
    }

    /// Names of the calls received so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.inner.lock().calls.clone()
    }

    fn begin(&self, call: &'static str) -> RemoteResult<MutexGuard<'_, MemoryInner>> {
        let mut inner = self.inner.lock();
        inner.calls.push(call);
        match inner.fail_next.take() {
            Some(message) => Err(RemoteError::new(message)),
            None => Ok(inner),
        }
    }
}

impl MemoryInner {
    fn assign_id(&mut self) -> String {
        loop {
            let id = format!("provider-{}", self.next_id);
            self.next_id += 1;
            if self.settings.provider(&id).is_none() {
                return id;
            }
        }
    }

    fn name_taken(&self, name: &str, except_id: &str) -> bool {
        self.settings
            .available_providers
            .iter()
            .any(|p| p.name == name && p.id != except_id)
    }
}

#[async_trait]
impl BackingStore for MemoryBackingStore {
    async fn fetch_settings(&self) -> RemoteResult<Settings> {
        Ok(self.begin("fetch_settings")?.settings.clone())
    }

    /// Restores the factory defaults and returns them.
    async fn fetch_default_settings(&self) -> RemoteResult<Settings> {
        let mut inner = self.begin("fetch_default_settings")?;
        inner.settings = inner.defaults.clone();
        Ok(inner.settings.clone())
    }

    async fn create_provider(&self, mut provider: ProviderConfig) -> RemoteResult<ProviderConfig> {
        let mut inner = self.begin("create_provider")?;
        if !provider.id.is_empty() {
            return Err(RemoteError::new("New providers must not carry an id"));
        }
        if provider.name.trim().is_empty() {
            return Err(RemoteError::new("Provider name is required"));
        }
        if inner.name_taken(&provider.name, "") {
            return Err(RemoteError::new(format!(
                "Provider name '{}' already exists",
                provider.name
            )));
        }
        provider.id = inner.assign_id();
        inner.settings.available_providers.push(provider.clone());
        Ok(provider)
    }

    async fn update_provider(&self, provider: ProviderConfig) -> RemoteResult<ProviderConfig> {
        let mut inner = self.begin("update_provider")?;
        if inner.name_taken(&provider.name, &provider.id) {
            return Err(RemoteError::new(format!(
                "Provider name '{}' already exists",
                provider.name
            )));
        }
        let Some(slot) = inner
            .settings
            .available_providers
            .iter_mut()
            .find(|p| p.id == provider.id)
        else {
            return Err(RemoteError::new(format!(
                "Provider '{}' not found",
                provider.id
            )));
        };
        *slot = provider.clone();
        if inner.settings.current_provider.id == provider.id {
            inner.settings.current_provider = provider.clone();
        }
        Ok(provider)
    }

    async fn delete_provider(&self, id: &str) -> RemoteResult<()> {
        let mut inner = self.begin("delete_provider")?;
        if inner.settings.current_provider.id == id {
            return Err(RemoteError::new("Cannot delete the current provider"));
        }
        if inner.settings.provider(id).is_none() {
            return Err(RemoteError::new(format!("Provider '{}' not found", id)));
        }
        inner.settings.available_providers.retain(|p| p.id != id);
        Ok(())
    }

    async fn set_current_provider(&self, id: &str) -> RemoteResult<ProviderConfig> {
        let mut inner = self.begin("set_current_provider")?;
        let Some(provider) = inner.settings.provider(id).cloned() else {
            return Err(RemoteError::new(format!("Provider '{}' not found", id)));
        };
        inner.settings.current_provider = provider.clone();
        Ok(provider)
    }

    async fn add_language(&self, name: &str) -> RemoteResult<Vec<String>> {
        let mut inner = self.begin("add_language")?;
        let name = name.trim();
        if name.is_empty() {
            return Err(RemoteError::new("Language name is required"));
        }
        if !inner.settings.language.contains(name) {
            inner.settings.language.languages.push(name.to_string());
        }
        Ok(inner.settings.language.languages.clone())
    }

    async fn remove_language(&self, name: &str) -> RemoteResult<Vec<String>> {
        let mut inner = self.begin("remove_language")?;
        if inner.settings.language.is_protected(name) {
            return Err(RemoteError::new(format!(
                "Language '{}' is a default and cannot be removed",
                name
            )));
        }
        inner.settings.language.languages.retain(|l| l != name);
        Ok(inner.settings.language.languages.clone())
    }

    async fn set_default_input_language(&self, name: &str) -> RemoteResult<()> {
        let mut inner = self.begin("set_default_input_language")?;
        if !inner.settings.language.contains(name) {
            return Err(RemoteError::new(format!("Unknown language '{}'", name)));
        }
        inner.settings.language.default_input = name.to_string();
        Ok(())
    }

    async fn set_default_output_language(&self, name: &str) -> RemoteResult<()> {
        let mut inner = self.begin("set_default_output_language")?;
        if !inner.settings.language.contains(name) {
            return Err(RemoteError::new(format!("Unknown language '{}'", name)));
        }
        inner.settings.language.default_output = name.to_string();
        Ok(())
    }

    async fn update_model_config(&self, model: ModelConfig) -> RemoteResult<ModelConfig> {
        let mut inner = self.begin("update_model_config")?;
        inner.settings.model = model.clone();
        Ok(model)
    }

    async fn update_inference_config(
        &self,
        inference: InferenceBaseConfig,
    ) -> RemoteResult<InferenceBaseConfig> {
        let mut inner = self.begin("update_inference_config")?;
        inner.settings.inference = inference.clone();
        Ok(inference)
    }

    async fn validate_provider(
        &self,
        provider: ProviderConfig,
        test_live: bool,
        model_id: Option<String>,
    ) -> RemoteResult<bool> {
        let _inner = self.begin("validate_provider")?;
        if url::Url::parse(provider.base_url.trim()).is_err() {
            return Ok(false);
        }
        if !test_live {
            return Ok(true);
        }
        if !provider.is_configured() {
            return Ok(false);
        }
        Ok(match model_id.as_deref() {
            None => true,
            Some("") => false,
            Some(model) => {
                !provider.use_custom_models || provider.custom_models.iter().any(|m| m == model)
            }
        })
    }
}
