//! Dropdown-facing view of the draft.
//!
//! Providers and models are selected by display name, not id. Renaming a
//! provider in the draft therefore drops its selection until the name
//! matches an available provider again.

use crate::config::Settings;

/// A selectable item in a dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Current pointer into a list of options.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selected {
    #[default]
    Nothing,
    Item(String),
}

impl Selected {
    fn when(present: bool, value: &str) -> Self {
        if present && !value.is_empty() {
            Selected::Item(value.to_string())
        } else {
            Selected::Nothing
        }
    }

    pub fn as_deref(&self) -> Option<&str> {
        match self {
            Selected::Nothing => None,
            Selected::Item(value) => Some(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionState {
    pub providers: Vec<SelectOption>,
    pub provider: Selected,
    pub models: Vec<SelectOption>,
    pub model: Selected,
    pub languages: Vec<SelectOption>,
    pub input_language: Selected,
    pub output_language: Selected,
}

fn push_unique(options: &mut Vec<SelectOption>, value: &str) {
    if value.is_empty() || options.iter().any(|o| o.value == value) {
        return;
    }
    options.push(SelectOption {
        value: value.to_string(),
        label: value.to_string(),
    });
}

/// Derives the selection state from a draft. Never fails; missing or
/// dangling values map to `Selected::Nothing`.
pub fn derive(draft: &Settings) -> SelectionState {
    let mut providers = Vec::with_capacity(draft.available_providers.len());
    for provider in &draft.available_providers {
        push_unique(&mut providers, &provider.name);
    }
    let current = &draft.current_provider.name;
    let provider = Selected::when(providers.iter().any(|o| &o.value == current), current);

    let mut models = Vec::new();
    push_unique(&mut models, &draft.model.name);
    if draft.current_provider.use_custom_models {
        for model in &draft.current_provider.custom_models {
            push_unique(&mut models, model);
        }
    }
    let model = Selected::when(true, &draft.model.name);

    let mut languages = Vec::with_capacity(draft.language.languages.len());
    for language in &draft.language.languages {
        push_unique(&mut languages, language);
    }
    let input = &draft.language.default_input;
    let output = &draft.language.default_output;

    SelectionState {
        providers,
        provider,
        models,
        model,
        input_language: Selected::when(draft.language.contains(input), input),
        output_language: Selected::when(draft.language.contains(output), output),
        languages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;

    #[test]
    fn empty_settings_select_nothing() {
        let selection = derive(&Settings::default());
        assert!(selection.providers.is_empty());
        assert_eq!(selection.provider, Selected::Nothing);
        assert_eq!(selection.model, Selected::Nothing);
        assert_eq!(selection.input_language, Selected::Nothing);
        assert_eq!(selection.output_language, Selected::Nothing);
    }

    #[test]
    fn factory_defaults_select_everything() {
        let selection = derive(&Settings::factory_defaults());
        assert_eq!(selection.provider.as_deref(), Some("Ollama"));
        assert_eq!(selection.model.as_deref(), Some("llama3.2"));
        assert_eq!(selection.input_language.as_deref(), Some("en"));
        assert_eq!(selection.output_language.as_deref(), Some("en"));
    }

    #[test]
    fn provider_selection_follows_name() {
        let mut settings = Settings::factory_defaults();
        settings.current_provider.name = "Renamed".into();
        let selection = derive(&settings);
        assert_eq!(selection.provider, Selected::Nothing);
        assert_eq!(selection.providers.len(), 1);
    }

    #[test]
    fn custom_models_extend_model_options() {
        let mut settings = Settings::factory_defaults();
        settings.current_provider = ProviderConfig {
            use_custom_models: true,
            custom_models: vec!["llama3.2".into(), "qwen2.5".into(), String::new()],
            ..settings.current_provider.clone()
        };
        let selection = derive(&settings);
        let values: Vec<&str> = selection.models.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["llama3.2", "qwen2.5"]);
    }

    #[test]
    fn dangling_default_language_selects_nothing() {
        let mut settings = Settings::factory_defaults();
        settings.language.default_output = "de".into();
        let selection = derive(&settings);
        assert_eq!(selection.output_language, Selected::Nothing);
        assert_eq!(selection.input_language.as_deref(), Some("en"));
    }
}
