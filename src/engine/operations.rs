//! Orchestrated operations.
//!
//! Each operation runs its local checks first (validation, invariants,
//! single-flight), then enters the pending phase, awaits the backing
//! store and settles with the matching patch.

use crate::config::{InferenceBaseConfig, ModelConfig, ProviderConfig, Settings};
use crate::draft::{Commit, Patch};
use crate::operation::OperationKind;
use crate::validation::{
    validate_inference_config, validate_model_config, validate_provider_config,
};

use super::{EngineError, SettingsEngine};

#[derive(Clone, Copy)]
enum LanguageSlot {
    Input,
    Output,
}

impl SettingsEngine {
    /// Fetch the persisted settings and replace baseline and draft.
    pub async fn fetch_settings(&self) -> Result<Settings, EngineError> {
        let op = self.begin(OperationKind::FetchSettings)?;
        match self.store.fetch_settings().await {
            Ok(settings) => {
                if let Err(reason) = settings.check_committed() {
                    tracing::warn!(%reason, "Fetched settings violate committed invariants");
                }
                op.fulfil(Some(Commit::Replace(settings.clone())));
                Ok(settings)
            }
            Err(err) => Err(op.reject(err)),
        }
    }

    /// Factory reset: the store restores its defaults and both snapshots
    /// are replaced with them.
    pub async fn reset_to_defaults(&self) -> Result<Settings, EngineError> {
        let op = self.begin(OperationKind::ResetToDefaults)?;
        match self.store.fetch_default_settings().await {
            Ok(settings) => {
                op.fulfil(Some(Commit::Replace(settings.clone())));
                Ok(settings)
            }
            Err(err) => Err(op.reject(err)),
        }
    }

    pub async fn create_provider(
        &self,
        mut provider: ProviderConfig,
    ) -> Result<ProviderConfig, EngineError> {
        let kind = OperationKind::CreateProvider;
        self.ensure_idle()?;
        provider.id.clear();

        if let Err(violation) = validate_provider_config(&provider, self.rules) {
            return Err(self.reject_locally(kind, violation.into()));
        }
        if self.read(|s| s.baseline().provider_by_name(&provider.name).is_some()) {
            let message = format!("Provider name '{}' already exists", provider.name);
            return Err(self.reject_locally(kind, EngineError::validation("name", message)));
        }

        let op = self.begin(kind)?;
        match self.store.create_provider(provider).await {
            Ok(created) => {
                tracing::info!(provider_id = %created.id, name = %created.name, "Provider created");
                op.fulfil(Some(Commit::Patch(Patch::ProviderCreated(created.clone()))));
                Ok(created)
            }
            Err(err) => Err(op.reject(err)),
        }
    }

    /// Save a provider. Replaces it in the provider list and, when it is
    /// the current provider, the current provider too.
    pub async fn update_provider(
        &self,
        provider: ProviderConfig,
    ) -> Result<ProviderConfig, EngineError> {
        let kind = OperationKind::UpdateProvider;
        self.ensure_idle()?;

        if let Err(violation) = validate_provider_config(&provider, self.rules) {
            return Err(self.reject_locally(kind, violation.into()));
        }
        if provider.id.is_empty() {
            let err = EngineError::InvariantViolation(
                "Provider has no id; create it before updating".to_string(),
            );
            return Err(self.reject_locally(kind, err));
        }
        let (known, name_taken) = self.read(|s| {
            let baseline = s.baseline();
            (
                baseline.provider(&provider.id).is_some(),
                baseline
                    .available_providers
                    .iter()
                    .any(|p| p.name == provider.name && p.id != provider.id),
            )
        });
        if !known {
            let err =
                EngineError::InvariantViolation(format!("Provider '{}' not found", provider.id));
            return Err(self.reject_locally(kind, err));
        }
        if name_taken {
            let message = format!("Provider name '{}' already exists", provider.name);
            return Err(self.reject_locally(kind, EngineError::validation("name", message)));
        }

        let op = self.begin(kind)?;
        match self.store.update_provider(provider).await {
            Ok(updated) => {
                tracing::info!(provider_id = %updated.id, "Provider updated");
                op.fulfil(Some(Commit::Patch(Patch::ProviderUpdated(updated.clone()))));
                Ok(updated)
            }
            Err(err) => Err(op.reject(err)),
        }
    }

    /// Save the draft's current provider, including its header rows.
    pub async fn save_current_provider(&self) -> Result<ProviderConfig, EngineError> {
        let provider = self.read(|s| s.provider_draft());
        self.update_provider(provider).await
    }

    /// Delete a provider. The current provider can never be deleted.
    pub async fn delete_provider(&self, id: &str) -> Result<(), EngineError> {
        let kind = OperationKind::DeleteProvider;
        self.ensure_idle()?;

        let is_current = self.read(|s| {
            s.baseline().current_provider.id == id || s.draft().current_provider.id == id
        });
        if is_current {
            let err = EngineError::InvariantViolation(format!(
                "Provider '{}' is the current provider and cannot be deleted",
                id
            ));
            return Err(self.reject_locally(kind, err));
        }

        let op = self.begin(kind)?;
        match self.store.delete_provider(id).await {
            Ok(()) => {
                tracing::info!(provider_id = %id, "Provider deleted");
                op.fulfil(Some(Commit::Patch(Patch::ProviderDeleted { id: id.to_string() })));
                Ok(())
            }
            Err(err) => Err(op.reject(err)),
        }
    }

    pub async fn set_current_provider(&self, id: &str) -> Result<ProviderConfig, EngineError> {
        let kind = OperationKind::SetCurrentProvider;
        self.ensure_idle()?;

        if self.read(|s| s.baseline().provider(id).is_none()) {
            let err = EngineError::InvariantViolation(format!("Provider '{}' not found", id));
            return Err(self.reject_locally(kind, err));
        }

        let op = self.begin(kind)?;
        match self.store.set_current_provider(id).await {
            Ok(provider) => {
                tracing::info!(provider_id = %provider.id, "Current provider changed");
                op.fulfil(Some(Commit::Patch(Patch::CurrentProvider(provider.clone()))));
                Ok(provider)
            }
            Err(err) => Err(op.reject(err)),
        }
    }

    pub async fn add_language(&self, name: &str) -> Result<Vec<String>, EngineError> {
        let kind = OperationKind::AddLanguage;
        self.ensure_idle()?;

        let name = name.trim();
        if name.is_empty() {
            let err = EngineError::validation("language", "Language is required");
            return Err(self.reject_locally(kind, err));
        }
        if self.read(|s| s.baseline().language.contains(name)) {
            let err = EngineError::validation(
                "language",
                format!("Language '{}' already exists", name),
            );
            return Err(self.reject_locally(kind, err));
        }

        let op = self.begin(kind)?;
        match self.store.add_language(name).await {
            Ok(languages) => {
                op.fulfil(Some(Commit::Patch(Patch::Languages(languages.clone()))));
                Ok(languages)
            }
            Err(err) => Err(op.reject(err)),
        }
    }

    /// Remove a language. Default input/output languages are protected.
    pub async fn remove_language(&self, name: &str) -> Result<Vec<String>, EngineError> {
        let kind = OperationKind::RemoveLanguage;
        self.ensure_idle()?;

        let (protected, known) = self.read(|s| {
            (
                s.baseline().language.is_protected(name) || s.draft().language.is_protected(name),
                s.baseline().language.contains(name),
            )
        });
        if protected {
            let err = EngineError::InvariantViolation(format!(
                "Language '{}' is a default language and cannot be removed",
                name
            ));
            return Err(self.reject_locally(kind, err));
        }
        if !known {
            let err = EngineError::validation(
                "language",
                format!("Language '{}' is not configured", name),
            );
            return Err(self.reject_locally(kind, err));
        }

        let op = self.begin(kind)?;
        match self.store.remove_language(name).await {
            Ok(languages) => {
                op.fulfil(Some(Commit::Patch(Patch::Languages(languages.clone()))));
                Ok(languages)
            }
            Err(err) => Err(op.reject(err)),
        }
    }

    pub async fn set_default_input_language(&self, name: &str) -> Result<(), EngineError> {
        self.set_default_language(name, LanguageSlot::Input).await
    }

    pub async fn set_default_output_language(&self, name: &str) -> Result<(), EngineError> {
        self.set_default_language(name, LanguageSlot::Output).await
    }

    async fn set_default_language(&self, name: &str, slot: LanguageSlot) -> Result<(), EngineError> {
        let kind = match slot {
            LanguageSlot::Input => OperationKind::SetDefaultInputLanguage,
            LanguageSlot::Output => OperationKind::SetDefaultOutputLanguage,
        };
        self.ensure_idle()?;

        if !self.read(|s| s.baseline().language.contains(name)) {
            let err = EngineError::InvariantViolation(format!(
                "Language '{}' is not in the language list",
                name
            ));
            return Err(self.reject_locally(kind, err));
        }

        let op = self.begin(kind)?;
        let result = match slot {
            LanguageSlot::Input => self.store.set_default_input_language(name).await,
            LanguageSlot::Output => self.store.set_default_output_language(name).await,
        };
        match result {
            Ok(()) => {
                let patch = match slot {
                    LanguageSlot::Input => Patch::DefaultInputLanguage(name.to_string()),
                    LanguageSlot::Output => Patch::DefaultOutputLanguage(name.to_string()),
                };
                op.fulfil(Some(Commit::Patch(patch)));
                Ok(())
            }
            Err(err) => Err(op.reject(err)),
        }
    }

    pub async fn update_model_config(
        &self,
        model: ModelConfig,
    ) -> Result<ModelConfig, EngineError> {
        let kind = OperationKind::UpdateModelConfig;
        self.ensure_idle()?;

        if let Err(violation) = validate_model_config(&model) {
            return Err(self.reject_locally(kind, violation.into()));
        }

        let op = self.begin(kind)?;
        match self.store.update_model_config(model).await {
            Ok(saved) => {
                op.fulfil(Some(Commit::Patch(Patch::Model(saved.clone()))));
                Ok(saved)
            }
            Err(err) => Err(op.reject(err)),
        }
    }

    pub async fn save_model_config(&self) -> Result<ModelConfig, EngineError> {
        let model = self.read(|s| s.draft().model.clone());
        self.update_model_config(model).await
    }

    pub async fn update_inference_config(
        &self,
        inference: InferenceBaseConfig,
    ) -> Result<InferenceBaseConfig, EngineError> {
        let kind = OperationKind::UpdateInferenceConfig;
        self.ensure_idle()?;

        if let Err(violation) = validate_inference_config(&inference) {
            return Err(self.reject_locally(kind, violation.into()));
        }

        let op = self.begin(kind)?;
        match self.store.update_inference_config(inference).await {
            Ok(saved) => {
                op.fulfil(Some(Commit::Patch(Patch::Inference(saved.clone()))));
                Ok(saved)
            }
            Err(err) => Err(op.reject(err)),
        }
    }

    pub async fn save_inference_config(&self) -> Result<InferenceBaseConfig, EngineError> {
        let inference = self.read(|s| s.draft().inference.clone());
        self.update_inference_config(inference).await
    }

    /// Ask the store whether a provider profile works. Leaves settings untouched.
    pub async fn validate_provider(
        &self,
        provider: ProviderConfig,
        test_live: bool,
        model_id: Option<String>,
    ) -> Result<bool, EngineError> {
        let kind = OperationKind::ValidateProvider;
        self.ensure_idle()?;

        if let Err(violation) = validate_provider_config(&provider, self.rules) {
            return Err(self.reject_locally(kind, violation.into()));
        }

        let op = self.begin(kind)?;
        match self
            .store
            .validate_provider(provider, test_live, model_id)
            .await
        {
            Ok(valid) => {
                tracing::info!(valid, test_live, "Provider validated");
                op.fulfil(None);
                Ok(valid)
            }
            Err(err) => Err(op.reject(err)),
        }
    }
}
