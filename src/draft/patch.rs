//! Targeted updates applied to baseline and draft after a remote success.

use crate::config::{InferenceBaseConfig, ModelConfig, ProviderConfig, Settings};

/// A confirmed change to one field of the aggregate.
///
/// `apply` clones out of `&self`, so applying the same patch to baseline
/// and draft leaves them with separately owned values.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    ProviderCreated(ProviderConfig),
    ProviderUpdated(ProviderConfig),
    ProviderDeleted { id: String },
    CurrentProvider(ProviderConfig),
    Languages(Vec<String>),
    DefaultInputLanguage(String),
    DefaultOutputLanguage(String),
    Model(ModelConfig),
    Inference(InferenceBaseConfig),
}

/// What a fulfilled operation writes back.
#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    /// Replace both snapshots with the returned aggregate.
    Replace(Settings),
    Patch(Patch),
}

impl Patch {
    pub fn apply(&self, settings: &mut Settings) {
        match self {
            Patch::ProviderCreated(provider) => upsert_provider(settings, provider),
            Patch::ProviderUpdated(provider) => {
                if let Some(slot) = settings
                    .available_providers
                    .iter_mut()
                    .find(|p| p.id == provider.id)
                {
                    *slot = provider.clone();
                }
                if settings.current_provider.id == provider.id {
                    settings.current_provider = provider.clone();
                }
            }
            Patch::ProviderDeleted { id } => {
                settings.available_providers.retain(|p| &p.id != id);
            }
            Patch::CurrentProvider(provider) => {
                upsert_provider(settings, provider);
                settings.current_provider = provider.clone();
            }
            Patch::Languages(languages) => settings.language.set_languages(languages),
            Patch::DefaultInputLanguage(language) => {
                settings.language.default_input = language.clone();
            }
            Patch::DefaultOutputLanguage(language) => {
                settings.language.default_output = language.clone();
            }
            Patch::Model(model) => settings.model = model.clone(),
            Patch::Inference(inference) => settings.inference = inference.clone(),
        }
    }
}

fn upsert_provider(settings: &mut Settings, provider: &ProviderConfig) {
    match settings
        .available_providers
        .iter_mut()
        .find(|p| p.id == provider.id)
    {
        Some(slot) => *slot = provider.clone(),
        None => settings.available_providers.push(provider.clone()),
    }
}
