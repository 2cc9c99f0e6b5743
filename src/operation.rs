//! Orchestrated operation kinds and their lifecycle notifications.

use std::fmt;

/// Every settings change that needs a backing-store round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperationKind {
    FetchSettings,
    ResetToDefaults,
    CreateProvider,
    UpdateProvider,
    DeleteProvider,
    SetCurrentProvider,
    AddLanguage,
    RemoveLanguage,
    SetDefaultInputLanguage,
    SetDefaultOutputLanguage,
    UpdateModelConfig,
    UpdateInferenceConfig,
    ValidateProvider,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FetchSettings => "fetch_settings",
            Self::ResetToDefaults => "reset_to_defaults",
            Self::CreateProvider => "create_provider",
            Self::UpdateProvider => "update_provider",
            Self::DeleteProvider => "delete_provider",
            Self::SetCurrentProvider => "set_current_provider",
            Self::AddLanguage => "add_language",
            Self::RemoveLanguage => "remove_language",
            Self::SetDefaultInputLanguage => "set_default_input_language",
            Self::SetDefaultOutputLanguage => "set_default_output_language",
            Self::UpdateModelConfig => "update_model_config",
            Self::UpdateInferenceConfig => "update_inference_config",
            Self::ValidateProvider => "validate_provider",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationPhase {
    Pending,
    Fulfilled,
    Rejected,
}

/// Last settled result of an operation kind, kept until the next dispatch
/// of the same kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    Succeeded,
    Failed { message: String },
}

/// Broadcast to subscribers on every phase change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleEvent {
    pub operation: OperationKind,
    pub phase: OperationPhase,
    /// Busy flag after this transition.
    pub busy: bool,
}
