//! Model-View-Intent primitives for the settings store.
//!
//! # Architecture
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ Selectors
//!    ↑                                  │
//!    └──────────────────────────────────┘
//! ```
//!
//! - **State**: value snapshot, replaced wholesale on every transition
//! - **Intent**: local edits and operation lifecycle events
//! - **Reducer**: the only place where state transitions happen

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::StoreState;
