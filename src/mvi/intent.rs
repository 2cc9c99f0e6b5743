//! Base trait for intents.

/// Marker trait for intent objects.
///
/// Intents represent:
/// - Local draft edits
/// - Operation lifecycle transitions (requested, fulfilled, rejected)
pub trait Intent: Send + 'static {}
