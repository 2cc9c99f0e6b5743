use crate::config::Settings;
use crate::draft::patch::{Commit, Patch};
use crate::headers::HeaderEntry;
use crate::mvi::Intent;
use crate::operation::OperationKind;

#[derive(Debug, Clone)]
pub enum DraftIntent {
    /// Replace baseline and draft with copies of `settings`.
    Load { settings: Settings },
    /// Local edit to the draft only.
    Edit(DraftEdit),
    /// Append a placeholder header row unless one already exists.
    AddBlankHeader,
    UpdateHeader { entry: HeaderEntry },
    RemoveHeader { id: String },
    /// Throw away local edits: draft becomes a copy of baseline.
    Discard,
    CommitFullReplace { settings: Settings },
    CommitPatch(Patch),
    OperationRequested { operation: OperationKind },
    OperationFulfilled {
        operation: OperationKind,
        commit: Option<Commit>,
    },
    OperationRejected {
        operation: OperationKind,
        message: String,
    },
    /// A check failed before dispatch. Records the message, busy flag untouched.
    LocalFailure {
        operation: OperationKind,
        message: String,
    },
}

impl Intent for DraftIntent {}

/// A single-field edit of the draft.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftEdit {
    Provider(ProviderEdit),
    /// Make the available provider with this name the draft's current one.
    SelectProvider { name: String },
    Model(ModelEdit),
    Inference(InferenceEdit),
    DefaultInputLanguage(String),
    DefaultOutputLanguage(String),
}

/// Edits to the draft's current provider.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderEdit {
    Name(String),
    ProviderType(String),
    BaseUrl(String),
    ModelsEndpoint(String),
    CompletionEndpoint(String),
    AuthType(String),
    AuthToken(String),
    UseAuthTokenFromEnv(bool),
    EnvVarTokenName(String),
    UseCustomHeaders(bool),
    UseCustomModels(bool),
    CustomModels(Vec<String>),
    AddCustomModel(String),
    RemoveCustomModel(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModelEdit {
    Name(String),
    UseTemperature(bool),
    Temperature(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum InferenceEdit {
    TimeoutSeconds(u32),
    MaxRetries(u32),
    UseMarkdownForOutput(bool),
}
