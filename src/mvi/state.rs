//! Base trait for store state.

/// Marker trait for state snapshots.
///
/// States should be:
/// - Owned values (Clone produces an independent copy)
/// - Comparable (PartialEq for change detection)
pub trait StoreState: Clone + PartialEq + Default + Send + 'static {}
