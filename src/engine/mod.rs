//! Settings engine: draft store plus orchestrated backing-store operations.
//!
//! Local edits are applied synchronously through the draft reducer.
//! Remote operations go through a three-phase lifecycle:
//!
//! ```text
//! Idle ──→ Pending ──→ Fulfilled (patch baseline + draft)
//!                 └──→ Rejected  (record message, state untouched)
//! ```
//!
//! Only one operation may be pending at a time; a second dispatch is
//! rejected with `EngineError::Busy`. Local edits are still accepted
//! while an operation is pending, and the operation's patch wins if both
//! touch the same field.

mod error;
mod operations;

pub use error::EngineError;

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::backing::{BackingStore, RemoteError};
use crate::config::{EngineConfig, Settings};
use crate::draft::{Commit, DraftEdit, DraftIntent, DraftReducer, DraftState, Patch};
use crate::headers::HeaderEntry;
use crate::ids::IdSource;
use crate::mvi::Reducer;
use crate::operation::{LifecycleEvent, OperationKind, OperationPhase};
use crate::validation::EndpointRules;

/// Handle to the settings engine.
///
/// Cheap to clone; all clones share the same state and backing store.
/// The state lock is never held across an `.await`.
#[derive(Clone)]
pub struct SettingsEngine {
    state: Arc<Mutex<DraftState>>,
    reducer: Arc<DraftReducer>,
    store: Arc<dyn BackingStore>,
    rules: EndpointRules,
    events: broadcast::Sender<LifecycleEvent>,
}

impl SettingsEngine {
    pub fn new(store: Arc<dyn BackingStore>, ids: Arc<dyn IdSource>, config: &EngineConfig) -> Self {
        let (events, _) = broadcast::channel(config.events.channel_capacity.max(1));
        Self {
            state: Arc::new(Mutex::new(DraftState::default())),
            reducer: Arc::new(DraftReducer::new(ids)),
            store,
            rules: config.validation.endpoint_rules(),
            events,
        }
    }

    /// Receive lifecycle notifications for every orchestrated operation.
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.events.subscribe()
    }

    /// Copy of the current state for rendering.
    pub fn snapshot(&self) -> DraftState {
        self.state.lock().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.state.lock().is_busy()
    }

    // -- Local draft operations ------------------------------------------------

    /// Replace baseline and draft with independent copies of `settings`.
    pub fn load(&self, settings: Settings) {
        if let Err(reason) = settings.check_committed() {
            tracing::warn!(%reason, "Loaded settings violate committed invariants");
        }
        self.apply(DraftIntent::Load { settings });
    }

    pub fn edit(&self, edit: DraftEdit) {
        self.apply(DraftIntent::Edit(edit));
    }

    /// Drop all local edits, restoring the draft from the baseline.
    pub fn discard(&self) {
        self.apply(DraftIntent::Discard);
    }

    pub fn add_blank_header(&self) {
        self.apply(DraftIntent::AddBlankHeader);
    }

    pub fn update_header(&self, entry: HeaderEntry) {
        self.apply(DraftIntent::UpdateHeader { entry });
    }

    pub fn remove_header(&self, id: &str) {
        self.apply(DraftIntent::RemoveHeader { id: id.to_string() });
    }

    pub fn commit_full_replace(&self, settings: Settings) {
        self.apply(DraftIntent::CommitFullReplace { settings });
    }

    pub fn commit_patch(&self, patch: Patch) {
        self.apply(DraftIntent::CommitPatch(patch));
    }

    // -- Internals -------------------------------------------------------------

    fn apply(&self, intent: DraftIntent) {
        let mut state = self.state.lock();
        let current = std::mem::take(&mut *state);
        *state = self.reducer.reduce(current, intent);
    }

    fn read<T>(&self, f: impl FnOnce(&DraftState) -> T) -> T {
        f(&self.state.lock())
    }

    fn ensure_idle(&self) -> Result<(), EngineError> {
        match self.state.lock().in_flight() {
            Some(operation) => Err(EngineError::Busy { operation }),
            None => Ok(()),
        }
    }

    /// Record a failure raised before dispatch and hand the error back.
    fn reject_locally(&self, operation: OperationKind, err: EngineError) -> EngineError {
        tracing::warn!(
            operation = %operation,
            error_type = err.error_type(),
            error = %err,
            "Settings operation rejected locally"
        );
        self.apply(DraftIntent::LocalFailure {
            operation,
            message: err.to_string(),
        });
        err
    }

    /// Enter the pending phase. The returned guard settles the operation
    /// exactly once, including when the awaiting future is dropped.
    fn begin(&self, operation: OperationKind) -> Result<InFlight<'_>, EngineError> {
        {
            let mut state = self.state.lock();
            if let Some(pending) = state.in_flight() {
                return Err(EngineError::Busy { operation: pending });
            }
            let current = std::mem::take(&mut *state);
            *state = self
                .reducer
                .reduce(current, DraftIntent::OperationRequested { operation });
        }
        tracing::debug!(operation = %operation, "Settings operation pending");
        self.emit(operation, OperationPhase::Pending);
        Ok(InFlight {
            engine: self,
            operation,
            settled: false,
        })
    }

    fn emit(&self, operation: OperationKind, phase: OperationPhase) {
        let busy = self.is_busy();
        // No subscribers is fine.
        let _ = self.events.send(LifecycleEvent {
            operation,
            phase,
            busy,
        });
    }
}

struct InFlight<'a> {
    engine: &'a SettingsEngine,
    operation: OperationKind,
    settled: bool,
}

impl InFlight<'_> {
    fn fulfil(mut self, commit: Option<Commit>) {
        self.settled = true;
        self.engine.apply(DraftIntent::OperationFulfilled {
            operation: self.operation,
            commit,
        });
        tracing::info!(operation = %self.operation, "Settings operation fulfilled");
        self.engine.emit(self.operation, OperationPhase::Fulfilled);
    }

    fn reject(mut self, err: RemoteError) -> EngineError {
        self.settled = true;
        self.settle_rejected(err.message().to_string());
        err.into()
    }

    fn settle_rejected(&self, message: String) {
        tracing::warn!(
            operation = %self.operation,
            error = %message,
            "Settings operation rejected"
        );
        self.engine.apply(DraftIntent::OperationRejected {
            operation: self.operation,
            message,
        });
        self.engine.emit(self.operation, OperationPhase::Rejected);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.settled = true;
            self.settle_rejected("Operation was cancelled before completing".to_string());
        }
    }
}
