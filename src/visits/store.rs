use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Visit counts per page key, as decoded from the visit cookie.
///
/// Keys are kept as plain strings: the cookie is shared with other writers
/// and lookups come straight from block markup, so the store does not
/// second-guess them. Unknown keys count as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitCountStore {
    counts: BTreeMap<String, u64>,
}

impl VisitCountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visit count recorded for `key`, or 0.
    pub fn count(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Adds one visit to `key` and returns the new count.
    pub fn increment(&mut self, key: &str) -> u64 {
        let count = self.counts.entry(key.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub fn contains(&self, key: &str) -> bool {
        self.counts.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for VisitCountStore {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
