//! Editable header rows backed by a provider's header map.
//!
//! The map has no stable row identity, so each row carries a synthetic
//! id and the list is kept sorted by it. Rendering order therefore does
//! not depend on map iteration order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::IdSource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderEntry {
    pub id: String,
    pub key: String,
    pub value: String,
}

impl HeaderEntry {
    /// Rows with an empty or whitespace-only key are placeholders.
    pub fn is_blank(&self) -> bool {
        self.key.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderList {
    entries: Vec<HeaderEntry>,
}

impl HeaderList {
    pub fn from_map(headers: &BTreeMap<String, String>, ids: &dyn IdSource) -> Self {
        let mut list = Self {
            entries: headers
                .iter()
                .map(|(key, value)| HeaderEntry {
                    id: ids.next_id(),
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect(),
        };
        list.sort();
        list
    }

    pub fn entries(&self) -> &[HeaderEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_blank_row(&self) -> bool {
        self.entries.iter().any(HeaderEntry::is_blank)
    }

    /// Appends an empty row. Returns false when an incomplete row already exists.
    pub fn add_blank_row(&mut self, ids: &dyn IdSource) -> bool {
        if self.has_blank_row() {
            return false;
        }
        self.entries.push(HeaderEntry {
            id: ids.next_id(),
            key: String::new(),
            value: String::new(),
        });
        self.sort();
        true
    }

    /// Replaces the row with the same id. Unknown ids are ignored.
    pub fn update(&mut self, entry: HeaderEntry) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != entry.id);
        if self.entries.len() == before {
            return false;
        }
        self.entries.push(entry);
        self.sort();
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.sort();
        self.entries.len() != before
    }

    /// Projects rows back to a map. Blank keys are dropped; duplicate keys
    /// resolve to the last row in id order.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .filter(|e| !e.is_blank())
            .map(|e| (e.key.clone(), e.value.clone()))
            .collect()
    }

    fn sort(&mut self) {
        self.entries.sort_by(|a, b| a.id.cmp(&b.id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn from_map_assigns_ids_and_sorts() {
        let ids = SequentialIds::new("h");
        let list = HeaderList::from_map(&map(&[("b", "2"), ("a", "1")]), &ids);
        assert_eq!(list.len(), 2);
        let entry_ids: Vec<&str> = list.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(entry_ids, vec!["h-00000001", "h-00000002"]);
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let ids = SequentialIds::new("h");
        let mut list = HeaderList::from_map(&map(&[("a", "1")]), &ids);
        let changed = list.update(HeaderEntry {
            id: "missing".into(),
            key: "x".into(),
            value: "y".into(),
        });
        assert!(!changed);
        assert_eq!(list.to_map(), map(&[("a", "1")]));
    }

    #[test]
    fn whitespace_key_counts_as_blank() {
        let ids = SequentialIds::new("h");
        let mut list = HeaderList::default();
        assert!(list.add_blank_row(&ids));
        let id = list.entries()[0].id.clone();
        list.update(HeaderEntry {
            id,
            key: "   ".into(),
            value: "v".into(),
        });
        assert!(!list.add_blank_row(&ids));
        assert!(list.to_map().is_empty());
    }

    #[test]
    fn duplicate_keys_collapse_last_wins() {
        let ids = SequentialIds::new("h");
        let mut list = HeaderList::from_map(&map(&[("x-a", "first")]), &ids);
        list.add_blank_row(&ids);
        let blank = list.entries()[1].id.clone();
        list.update(HeaderEntry {
            id: blank,
            key: "x-a".into(),
            value: "second".into(),
        });
        assert_eq!(list.len(), 2);
        assert_eq!(list.to_map(), map(&[("x-a", "second")]));
    }
}
