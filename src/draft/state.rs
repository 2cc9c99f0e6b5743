use std::collections::BTreeMap;

use crate::config::{ProviderConfig, Settings};
use crate::headers::HeaderList;
use crate::mvi::StoreState;
use crate::operation::{OperationKind, OperationOutcome};
use crate::selection::SelectionState;

/// Baseline/draft pair plus everything derived from it.
///
/// Fields are only written by `DraftReducer`; callers read through the
/// accessor methods.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DraftState {
    pub(super) baseline: Settings,
    pub(super) draft: Settings,
    pub(super) headers: HeaderList,
    /// Provider id the header rows were built from.
    pub(super) header_owner: String,
    pub(super) selection: SelectionState,
    pub(super) in_flight: Option<OperationKind>,
    pub(super) outcomes: BTreeMap<OperationKind, OperationOutcome>,
}

impl StoreState for DraftState {}

impl DraftState {
    /// Last settings confirmed by the backing store.
    pub fn baseline(&self) -> &Settings {
        &self.baseline
    }

    /// Settings as currently edited.
    pub fn draft(&self) -> &Settings {
        &self.draft
    }

    pub fn headers(&self) -> &HeaderList {
        &self.headers
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<OperationKind> {
        self.in_flight
    }

    pub fn outcome(&self, operation: OperationKind) -> Option<&OperationOutcome> {
        self.outcomes.get(&operation)
    }

    pub fn error(&self, operation: OperationKind) -> Option<&str> {
        match self.outcomes.get(&operation) {
            Some(OperationOutcome::Failed { message }) => Some(message),
            _ => None,
        }
    }

    /// True when the draft has unsaved edits.
    pub fn is_dirty(&self) -> bool {
        self.draft != self.baseline
    }

    /// The draft's current provider as it would be saved.
    pub fn provider_draft(&self) -> ProviderConfig {
        let mut provider = self.draft.current_provider.clone();
        provider.headers = self.headers.to_map();
        provider
    }
}
