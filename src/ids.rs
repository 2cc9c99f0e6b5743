//! Synthetic identifiers for list entries that have no natural key.

use std::sync::atomic::{AtomicU64, Ordering};

/// Source of unique entry identifiers.
pub trait IdSource: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs. The default for interactive use.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Monotonic, zero-padded ids (`{prefix}-00000001`, ...).
///
/// Lexicographic order equals creation order, which keeps sorted
/// collections predictable in tests.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{:08}", self.prefix, n)
    }
}
