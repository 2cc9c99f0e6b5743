//! Backing store abstraction for persisted settings.
//!
//! The engine never persists anything itself. Every change goes through
//! a `BackingStore`, and only values the store returns are committed.

mod memory;

pub use memory::MemoryBackingStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{InferenceBaseConfig, ModelConfig, ProviderConfig, Settings};

/// A rejected backing-store call, normalized to a single-line message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RemoteError {
    message: String,
}

impl RemoteError {
    /// Collapses whitespace and line breaks; an empty message becomes
    /// "Unknown error".
    pub fn new(message: impl std::fmt::Display) -> Self {
        let raw = message.to_string();
        let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        Self {
            message: if normalized.is_empty() {
                "Unknown error".to_string()
            } else {
                normalized
            },
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;

#[async_trait]
pub trait BackingStore: Send + Sync {
    async fn fetch_settings(&self) -> RemoteResult<Settings>;

    async fn fetch_default_settings(&self) -> RemoteResult<Settings>;

    /// Creates a provider. The submitted id is empty; the returned one is assigned.
    async fn create_provider(&self, provider: ProviderConfig) -> RemoteResult<ProviderConfig>;

    async fn update_provider(&self, provider: ProviderConfig) -> RemoteResult<ProviderConfig>;

    async fn delete_provider(&self, id: &str) -> RemoteResult<()>;

    async fn set_current_provider(&self, id: &str) -> RemoteResult<ProviderConfig>;

    /// Returns the full language list after the change.
    async fn add_language(&self, name: &str) -> RemoteResult<Vec<String>>;

    /// Returns the full language list after the change.
    async fn remove_language(&self, name: &str) -> RemoteResult<Vec<String>>;

    async fn set_default_input_language(&self, name: &str) -> RemoteResult<()>;

    async fn set_default_output_language(&self, name: &str) -> RemoteResult<()>;

    async fn update_model_config(&self, model: ModelConfig) -> RemoteResult<ModelConfig>;

    async fn update_inference_config(
        &self,
        inference: InferenceBaseConfig,
    ) -> RemoteResult<InferenceBaseConfig>;

    /// Checks a provider profile; with `test_live` also checks it is usable,
    /// optionally for a specific model.
    async fn validate_provider(
        &self,
        provider: ProviderConfig,
        test_live: bool,
        model_id: Option<String>,
    ) -> RemoteResult<bool>;
}
