//! Shared test utilities and store fixtures.

#![allow(dead_code, unused_imports)]

pub mod gated_store;

pub use gated_store::GatedStore;

use settings_engine::backing::{BackingStore, MemoryBackingStore};
use settings_engine::config::{EngineConfig, LanguageConfig, ProviderConfig, Settings};
use settings_engine::engine::SettingsEngine;
use settings_engine::ids::SequentialIds;
use settings_engine::operation::LifecycleEvent;
use std::sync::Arc;
use tokio::sync::broadcast;

pub fn provider(id: &str, name: &str) -> ProviderConfig {
    ProviderConfig {
        id: id.to_string(),
        name: name.to_string(),
        provider_type: "openai".to_string(),
        base_url: format!("https://{}.example.com", id),
        models_endpoint: "/v1/models".to_string(),
        completion_endpoint: "/v1/chat/completions".to_string(),
        auth_type_str: "none".to_string(),
        ..ProviderConfig::default()
    }
}

/// Two providers `a` ("A") and `b` ("B"), current `a`, languages en/fr/de
/// with `en` as input and `fr` as output default.
pub fn two_providers() -> Settings {
    let a = provider("a", "A");
    Settings {
        available_providers: vec![a.clone(), provider("b", "B")],
        current_provider: a,
        language: LanguageConfig {
            languages: vec!["en".to_string(), "fr".to_string(), "de".to_string()],
            default_input: "en".to_string(),
            default_output: "fr".to_string(),
        },
        ..Settings::factory_defaults()
    }
}

pub fn engine_over(store: Arc<dyn BackingStore>) -> SettingsEngine {
    SettingsEngine::new(
        store,
        Arc::new(SequentialIds::new("row")),
        &EngineConfig::default(),
    )
}

/// Memory store seeded with [`two_providers`] and an engine that has
/// already fetched from it.
pub async fn loaded_engine() -> (Arc<MemoryBackingStore>, SettingsEngine) {
    let store = Arc::new(MemoryBackingStore::new(two_providers()));
    let engine = engine_over(store.clone());
    engine
        .fetch_settings()
        .await
        .expect("initial fetch should succeed");
    (store, engine)
}

/// Drain every event currently buffered on a receiver.
pub fn drain(rx: &mut broadcast::Receiver<LifecycleEvent>) -> Vec<LifecycleEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
