//! Baseline/draft store for the settings aggregate.

mod intent;
mod patch;
mod reducer;
mod state;

pub use intent::{DraftEdit, DraftIntent, InferenceEdit, ModelEdit, ProviderEdit};
pub use patch::{Commit, Patch};
pub use reducer::DraftReducer;
pub use state::DraftState;
