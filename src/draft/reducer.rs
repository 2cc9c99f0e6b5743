use std::sync::Arc;

use crate::config::Settings;
use crate::draft::intent::{DraftEdit, DraftIntent, InferenceEdit, ModelEdit, ProviderEdit};
use crate::draft::patch::{Commit, Patch};
use crate::draft::state::DraftState;
use crate::headers::HeaderList;
use crate::ids::IdSource;
use crate::mvi::Reducer;
use crate::operation::OperationOutcome;
use crate::selection;

pub struct DraftReducer {
    ids: Arc<dyn IdSource>,
}

impl DraftReducer {
    pub fn new(ids: Arc<dyn IdSource>) -> Self {
        Self { ids }
    }

    fn replace(&self, mut state: DraftState, settings: Settings) -> DraftState {
        state.baseline = settings.clone();
        state.draft = settings;
        state.outcomes.clear();
        self.rebuild_headers(&mut state);
        state.selection = selection::derive(&state.draft);
        state
    }

    fn apply_patch(&self, mut state: DraftState, patch: &Patch) -> DraftState {
        patch.apply(&mut state.baseline);
        patch.apply(&mut state.draft);
        self.refresh(&mut state);
        state
    }

    fn apply_commit(&self, state: DraftState, commit: Commit) -> DraftState {
        match commit {
            Commit::Replace(settings) => self.replace(state, settings),
            Commit::Patch(patch) => self.apply_patch(state, &patch),
        }
    }

    fn rebuild_headers(&self, state: &mut DraftState) {
        let provider = &state.draft.current_provider;
        state.headers = HeaderList::from_map(&provider.headers, self.ids.as_ref());
        state.header_owner = provider.id.clone();
    }

    /// Re-derive selection, rebuilding header rows only when the current
    /// provider changed underneath them. Keeps row ids and a pending
    /// blank row stable across unrelated edits.
    fn refresh(&self, state: &mut DraftState) {
        let provider = &state.draft.current_provider;
        if state.header_owner != provider.id || state.headers.to_map() != provider.headers {
            self.rebuild_headers(state);
        }
        state.selection = selection::derive(&state.draft);
    }

    fn write_back_headers(&self, state: &mut DraftState) {
        state.draft.current_provider.headers = state.headers.to_map();
    }
}

impl Reducer for DraftReducer {
    type State = DraftState;
    type Intent = DraftIntent;

    fn reduce(&self, mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            DraftIntent::Load { settings } | DraftIntent::CommitFullReplace { settings } => {
                self.replace(state, settings)
            }
            DraftIntent::Edit(edit) => {
                tracing::debug!(?edit, "Draft edited");
                apply_edit(&mut state.draft, edit);
                self.refresh(&mut state);
                state
            }
            DraftIntent::AddBlankHeader => {
                if !state.headers.add_blank_row(self.ids.as_ref()) {
                    tracing::debug!("Blank header row already present");
                }
                state
            }
            DraftIntent::UpdateHeader { entry } => {
                if state.headers.update(entry) {
                    self.write_back_headers(&mut state);
                }
                state
            }
            DraftIntent::RemoveHeader { id } => {
                if state.headers.remove(&id) {
                    self.write_back_headers(&mut state);
                }
                state
            }
            DraftIntent::Discard => {
                state.draft = state.baseline.clone();
                self.rebuild_headers(&mut state);
                state.selection = selection::derive(&state.draft);
                state
            }
            DraftIntent::CommitPatch(patch) => self.apply_patch(state, &patch),
            DraftIntent::OperationRequested { operation } => {
                state.in_flight = Some(operation);
                state.outcomes.remove(&operation);
                state
            }
            DraftIntent::OperationFulfilled { operation, commit } => {
                if let Some(commit) = commit {
                    state = self.apply_commit(state, commit);
                }
                state.in_flight = None;
                state
                    .outcomes
                    .insert(operation, OperationOutcome::Succeeded);
                state
            }
            DraftIntent::OperationRejected { operation, message } => {
                state.in_flight = None;
                state
                    .outcomes
                    .insert(operation, OperationOutcome::Failed { message });
                state
            }
            DraftIntent::LocalFailure { operation, message } => {
                state
                    .outcomes
                    .insert(operation, OperationOutcome::Failed { message });
                state
            }
        }
    }
}

fn apply_edit(draft: &mut Settings, edit: DraftEdit) {
    match edit {
        DraftEdit::Provider(edit) => apply_provider_edit(draft, edit),
        DraftEdit::SelectProvider { name } => match draft.provider_by_name(&name).cloned() {
            Some(provider) => draft.current_provider = provider,
            None => tracing::debug!(name = %name, "No available provider with that name"),
        },
        DraftEdit::Model(edit) => match edit {
            ModelEdit::Name(name) => draft.model.name = name,
            ModelEdit::UseTemperature(on) => draft.model.use_temperature = on,
            ModelEdit::Temperature(t) => draft.model.temperature = t,
        },
        DraftEdit::Inference(edit) => match edit {
            InferenceEdit::TimeoutSeconds(secs) => draft.inference.timeout_seconds = secs,
            InferenceEdit::MaxRetries(n) => draft.inference.max_retries = n,
            InferenceEdit::UseMarkdownForOutput(on) => {
                draft.inference.use_markdown_for_output = on
            }
        },
        DraftEdit::DefaultInputLanguage(language) => draft.language.default_input = language,
        DraftEdit::DefaultOutputLanguage(language) => draft.language.default_output = language,
    }
}

fn apply_provider_edit(draft: &mut Settings, edit: ProviderEdit) {
    let provider = &mut draft.current_provider;
    match edit {
        ProviderEdit::Name(v) => provider.name = v,
        ProviderEdit::ProviderType(v) => provider.provider_type = v,
        ProviderEdit::BaseUrl(v) => provider.base_url = v,
        ProviderEdit::ModelsEndpoint(v) => provider.models_endpoint = v,
        ProviderEdit::CompletionEndpoint(v) => provider.completion_endpoint = v,
        ProviderEdit::AuthType(v) => provider.auth_type_str = v,
        ProviderEdit::AuthToken(v) => provider.auth_token = v,
        ProviderEdit::UseAuthTokenFromEnv(on) => provider.use_auth_token_from_env = on,
        ProviderEdit::EnvVarTokenName(v) => provider.env_var_token_name = v,
        ProviderEdit::UseCustomHeaders(on) => provider.use_custom_headers = on,
        ProviderEdit::UseCustomModels(on) => provider.use_custom_models = on,
        ProviderEdit::CustomModels(models) => provider.custom_models = models,
        ProviderEdit::AddCustomModel(model) => {
            let model = model.trim().to_string();
            if !model.is_empty() && !provider.custom_models.contains(&model) {
                provider.custom_models.push(model);
            }
        }
        ProviderEdit::RemoveCustomModel(model) => provider.custom_models.retain(|m| m != &model),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use crate::ids::SequentialIds;
    use crate::operation::OperationKind;

    fn reducer() -> DraftReducer {
        DraftReducer::new(Arc::new(SequentialIds::new("h")))
    }

    fn loaded() -> DraftState {
        let mut settings = Settings::factory_defaults();
        settings
            .current_provider
            .headers
            .insert("x-team".into(), "core".into());
        settings.available_providers[0] = settings.current_provider.clone();
        reducer().reduce(DraftState::default(), DraftIntent::Load { settings })
    }

    #[test]
    fn load_builds_headers_and_selection() {
        let state = loaded();
        assert_eq!(state.headers().len(), 1);
        assert_eq!(state.selection().provider.as_deref(), Some("Ollama"));
        assert!(!state.is_dirty());
    }

    #[test]
    fn unrelated_edit_keeps_blank_header_row() {
        let r = reducer();
        let state = r.reduce(loaded(), DraftIntent::AddBlankHeader);
        let rows = state.headers().clone();
        let state = r.reduce(
            state,
            DraftIntent::Edit(DraftEdit::Model(ModelEdit::Temperature(1.1))),
        );
        assert_eq!(state.headers(), &rows);
    }

    #[test]
    fn select_unknown_provider_is_noop() {
        let r = reducer();
        let before = loaded();
        let after = r.reduce(
            before.clone(),
            DraftIntent::Edit(DraftEdit::SelectProvider {
                name: "Nope".into(),
            }),
        );
        assert_eq!(after.draft(), before.draft());
    }

    #[test]
    fn add_custom_model_trims_and_dedupes() {
        let r = reducer();
        let mut state = loaded();
        for model in [" qwen ", "qwen", ""] {
            state = r.reduce(
                state,
                DraftIntent::Edit(DraftEdit::Provider(ProviderEdit::AddCustomModel(
                    model.into(),
                ))),
            );
        }
        assert_eq!(state.draft().current_provider.custom_models, vec!["qwen"]);
    }

    #[test]
    fn fulfilled_replace_clears_busy_and_records_success() {
        let r = reducer();
        let state = r.reduce(
            loaded(),
            DraftIntent::OperationRequested {
                operation: OperationKind::FetchSettings,
            },
        );
        assert!(state.is_busy());
        let state = r.reduce(
            state,
            DraftIntent::OperationFulfilled {
                operation: OperationKind::FetchSettings,
                commit: Some(Commit::Replace(Settings::factory_defaults())),
            },
        );
        assert!(!state.is_busy());
        assert_eq!(
            state.outcome(OperationKind::FetchSettings),
            Some(&OperationOutcome::Succeeded)
        );
        assert!(state.headers().is_empty());
    }

    #[test]
    fn patch_switching_current_provider_rebuilds_headers() {
        let r = reducer();
        let other = ProviderConfig {
            id: "other".into(),
            name: "Other".into(),
            headers: [("a".to_string(), "1".to_string())].into_iter().collect(),
            ..ProviderConfig::default()
        };
        let state = r.reduce(
            loaded(),
            DraftIntent::CommitPatch(Patch::CurrentProvider(other)),
        );
        assert_eq!(state.headers().to_map().get("a").map(String::as_str), Some("1"));
        assert_eq!(state.baseline().current_provider.id, "other");
    }
}
