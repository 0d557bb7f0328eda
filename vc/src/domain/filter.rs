//! Filter sets
//!
//! A FilterSet is the ordered field -> value mapping applied to one view.
//! Fields without a value are never stored: an empty filter is an absent
//! filter.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered mapping from field name to a non-empty value
///
/// Insertion order follows the order controls appear in their panel.
/// Equality compares contents, not order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IndexMap<String, String>", into = "IndexMap<String, String>")]
pub struct FilterSet(IndexMap<String, String>);

impl FilterSet {
    /// Create an empty filter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field value, skipping empty values
    ///
    /// Values are stored verbatim; whitespace is not trimmed. Returns true
    /// if the pair was stored.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.is_empty() {
            return false;
        }
        self.0.insert(field.into(), value);
        true
    }

    /// Get the value for a field
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over (field, value) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Field/value pairs for embedding into a widget's own query
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl<K, V> FromIterator<(K, V)> for FilterSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (field, value) in iter {
            set.insert(field, value);
        }
        set
    }
}

impl From<IndexMap<String, String>> for FilterSet {
    fn from(map: IndexMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<FilterSet> for IndexMap<String, String> {
    fn from(set: FilterSet) -> Self {
        set.0
    }
}

impl std::fmt::Display for FilterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (field, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {:?}", field, value)?;
        }
        write!(f, "}}")
    }
}
