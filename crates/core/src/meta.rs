// ABOUTME: The Metadata record: an insertion-ordered string-to-string mapping.
// ABOUTME: Reserved keys hold derived defaults; table-provided keys override them.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Reserved key for the derived document title.
pub const KEY_TITLE: &str = "title";
/// Reserved key for the derived snippet.
pub const KEY_SNIPPET: &str = "snippet";
/// Reserved key for the derived cover image.
pub const KEY_COVER_IMAGE: &str = "cover_image";
/// Reserved key for the derived description.
pub const KEY_DESCRIPTION: &str = "description";

/// An ordered mapping from string keys to string values.
///
/// Keys are unique. Inserting an existing key overwrites its value in
/// place, keeping the original position, so a record always serializes in
/// first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key/value pair. Last write wins.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of entries in the record.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the record has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge another record into this one, entry by entry.
    ///
    /// Keys from `other` override existing values and new keys are
    /// appended, preserving `other`'s ordering among the appended tail.
    pub fn merge(&mut self, other: Metadata) {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
    }
}

impl FromIterator<(String, String)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut meta = Metadata::new();
        for (key, value) in iter {
            meta.insert(key, value);
        }
        meta
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Metadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MetadataVisitor;

        impl<'de> Visitor<'de> for MetadataVisitor {
            type Value = Metadata;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of string keys to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Metadata, A::Error> {
                let mut meta = Metadata::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    meta.insert(key, value);
                }
                Ok(meta)
            }
        }

        deserializer.deserialize_map(MetadataVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn insert_preserves_first_insertion_order() {
        let mut meta = Metadata::new();
        meta.insert("title", "One");
        meta.insert("snippet", "Two");
        meta.insert("title", "Three");

        let keys: Vec<&str> = meta.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["title", "snippet"]);
        assert_eq!(meta.get("title"), Some("Three"));
    }

    #[test]
    fn merge_overrides_and_appends() {
        let mut base = Metadata::new();
        base.insert(KEY_TITLE, "Derived");
        base.insert(KEY_SNIPPET, "Some text");

        let mut table = Metadata::new();
        table.insert(KEY_TITLE, "From Table");
        table.insert("author", "Jane Doe");
        base.merge(table);

        assert_eq!(base.get(KEY_TITLE), Some("From Table"));
        assert_eq!(base.get("author"), Some("Jane Doe"));
        assert_eq!(base.len(), 3);
    }

    #[test]
    fn serializes_as_ordered_json_map() {
        let mut meta = Metadata::new();
        meta.insert("b_first", "1");
        meta.insert("a_second", "2");

        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(json, r#"{"b_first":"1","a_second":"2"}"#);
    }

    #[test]
    fn deserializes_from_json_map() {
        let meta: Metadata = serde_json::from_str(r#"{"title":"T","author":"A"}"#).unwrap();
        assert_eq!(meta.get("title"), Some("T"));
        assert_eq!(meta.get("author"), Some("A"));
        assert_eq!(meta.len(), 2);
    }

    #[test]
    fn empty_record_reports_empty() {
        let meta = Metadata::new();
        assert!(meta.is_empty());
        assert_eq!(meta.get("anything"), None);
        assert!(!meta.contains_key("anything"));
    }
}
