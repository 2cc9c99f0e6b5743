//! Backing store whose calls can be held open until a test releases them.

use async_trait::async_trait;
use settings_engine::backing::{BackingStore, MemoryBackingStore, RemoteResult};
use settings_engine::config::{InferenceBaseConfig, ModelConfig, ProviderConfig, Settings};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Notify, Semaphore};

pub struct GatedStore {
    pub inner: MemoryBackingStore,
    gated: AtomicBool,
    entered: Notify,
    release: Semaphore,
}

impl GatedStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: MemoryBackingStore::new(settings),
            gated: AtomicBool::new(false),
            entered: Notify::new(),
            release: Semaphore::new(0),
        }
    }

    /// Hold every following call until [`GatedStore::release`].
    pub fn hold(&self) {
        self.gated.store(true, Ordering::SeqCst);
    }

    /// Wait until a held call has reached the store.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let one held call through.
    pub fn release(&self) {
        self.release.add_permits(1);
    }

    async fn pass(&self) {
        if !self.gated.load(Ordering::SeqCst) {
            return;
        }
        self.entered.notify_one();
        self.release
            .acquire()
            .await
            .expect("semaphore is never closed")
            .forget();
    }
}

#[async_trait]
impl BackingStore for GatedStore {
    async fn fetch_settings(&self) -> RemoteResult<Settings> {
        self.pass().await;
        self.inner.fetch_settings().await
    }

    async fn fetch_default_settings(&self) -> RemoteResult<Settings> {
        self.pass().await;
        self.inner.fetch_default_settings().await
    }

    async fn create_provider(&self, provider: ProviderConfig) -> RemoteResult<ProviderConfig> {
        self.pass().await;
        self.inner.create_provider(provider).await
    }

    async fn update_provider(&self, provider: ProviderConfig) -> RemoteResult<ProviderConfig> {
        self.pass().await;
        self.inner.update_provider(provider).await
    }

    async fn delete_provider(&self, id: &str) -> RemoteResult<()> {
        self.pass().await;
        self.inner.delete_provider(id).await
    }

    async fn set_current_provider(&self, id: &str) -> RemoteResult<ProviderConfig> {
        self.pass().await;
        self.inner.set_current_provider(id).await
    }

    async fn add_language(&self, name: &str) -> RemoteResult<Vec<String>> {
        self.pass().await;
        self.inner.add_language(name).await
    }

    async fn remove_language(&self, name: &str) -> RemoteResult<Vec<String>> {
        self.pass().await;
        self.inner.remove_language(name).await
    }

    async fn set_default_input_language(&self, name: &str) -> RemoteResult<()> {
        self.pass().await;
        self.inner.set_default_input_language(name).await
    }

    async fn set_default_output_language(&self, name: &str) -> RemoteResult<()> {
        self.pass().await;
        self.inner.set_default_output_language(name).await
    }

    async fn update_model_config(&self, model: ModelConfig) -> RemoteResult<ModelConfig> {
        self.pass().await;
        self.inner.update_model_config(model).await
    }

    async fn update_inference_config(
        &self,
        inference: InferenceBaseConfig,
    ) -> RemoteResult<InferenceBaseConfig> {
        self.pass().await;
        self.inner.update_inference_config(inference).await
    }

    async fn validate_provider(
        &self,
        provider: ProviderConfig,
        test_live: bool,
        model_id: Option<String>,
    ) -> RemoteResult<bool> {
        self.pass().await;
        self.inner
            .validate_provider(provider, test_live, model_id)
            .await
    }
}
