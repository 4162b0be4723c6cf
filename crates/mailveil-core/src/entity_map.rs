//! Ordered placeholder → original text mapping for one document.

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::placeholder::Placeholder;

/// Placeholder token → original surface text, in insertion order.
///
/// Serializes as a plain JSON object whose key order is the insertion
/// order, so a saved mapping reads back entry-for-entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

/// One row of the tabular mapping view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingRow {
    pub placeholder: String,
    pub entity_type: String,
    pub original_value: String,
    pub length: usize,
}

impl EntityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Keys must be unique.
    pub fn insert(&mut self, placeholder: impl Into<String>, original: impl Into<String>) -> Result<()> {
        let placeholder = placeholder.into();
        if self.index.contains_key(&placeholder) {
            return Err(Error::DuplicatePlaceholder(placeholder));
        }
        self.index.insert(placeholder.clone(), self.entries.len());
        self.entries.push((placeholder, original.into()));
        Ok(())
    }

    pub fn get(&self, placeholder: &str) -> Option<&str> {
        self.index
            .get(placeholder)
            .map(|&i| self.entries[i].1.as_str())
    }

    pub fn contains_key(&self, placeholder: &str) -> bool {
        self.index.contains_key(placeholder)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Keys ordered longest first, so `[PERSON_10]` is replaced before
    /// `[PERSON_1]`. Ties keep insertion order.
    pub fn keys_by_length_desc(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.keys().collect();
        keys.sort_by(|a, b| b.len().cmp(&a.len()));
        keys
    }

    /// Same keys with the same values, ignoring order.
    pub fn equivalent(&self, other: &EntityMap) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }

    /// Tabular view: placeholder, entity type, original value, length.
    pub fn rows(&self) -> Vec<MappingRow> {
        self.iter()
            .map(|(placeholder, original)| MappingRow {
                placeholder: placeholder.to_string(),
                entity_type: Placeholder::parse(placeholder)
                    .map(|p| p.label.to_string())
                    .unwrap_or_else(|| {
                        placeholder
                            .trim_matches(|c| c == '[' || c == ']')
                            .split('_')
                            .next()
                            .unwrap_or_default()
                            .to_string()
                    }),
                original_value: original.to_string(),
                length: original.chars().count(),
            })
            .collect()
    }

    /// Parse the persisted JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::MalformedMapping(e.to_string()))
    }

    /// Pretty JSON, the persisted form.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Serialize for EntityMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EntityMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EntityMapVisitor;

        impl<'de> Visitor<'de> for EntityMapVisitor {
            type Value = EntityMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of placeholder strings to original text")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<EntityMap, A::Error> {
                let mut map = EntityMap::new();
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    map.insert(k, v).map_err(serde::de::Error::custom)?;
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(EntityMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EntityMap {
        let mut map = EntityMap::new();
        map.insert("[PERSON_1]", "John Smith").unwrap();
        map.insert("[EMAIL_ADDRESS_2]", "john@example.com").unwrap();
        map.insert("[PHONE_NUMBER_0_1]", "+1 415 555 0100").unwrap();
        map
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let mut map = sample();
        assert!(matches!(
            map.insert("[PERSON_1]", "Jane"),
            Err(Error::DuplicatePlaceholder(_))
        ));
        // same value under a new key is fine
        map.insert("[PERSON_4]", "John Smith").unwrap();
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn test_json_preserves_insertion_order() {
        let map = sample();
        let json = map.to_json_pretty().unwrap();
        let person = json.find("[PERSON_1]").unwrap();
        let email = json.find("[EMAIL_ADDRESS_2]").unwrap();
        let phone = json.find("[PHONE_NUMBER_0_1]").unwrap();
        assert!(person < email && email < phone);

        let back = EntityMap::from_json(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            EntityMap::from_json("[1, 2]"),
            Err(Error::MalformedMapping(_))
        ));
        assert!(matches!(
            EntityMap::from_json(r#"{"[A_1]": "x", "[A_1]": "y"}"#),
            Err(Error::MalformedMapping(_))
        ));
    }

    #[test]
    fn test_keys_by_length_desc() {
        let mut map = EntityMap::new();
        for i in 1..=10 {
            map.insert(format!("[PERSON_{}]", i), format!("p{}", i)).unwrap();
        }
        let keys = map.keys_by_length_desc();
        assert_eq!(keys[0], "[PERSON_10]");
        assert_eq!(keys[1], "[PERSON_1]");
    }

    #[test]
    fn test_rows() {
        let rows = sample().rows();
        assert_eq!(rows[0].entity_type, "PERSON");
        assert_eq!(rows[0].length, 10);
        assert_eq!(rows[2].entity_type, "PHONE_NUMBER");
    }

    #[test]
    fn test_equivalent_ignores_order() {
        let a = sample();
        let mut b = EntityMap::new();
        for (k, v) in a.iter().collect::<Vec<_>>().into_iter().rev() {
            b.insert(k, v).unwrap();
        }
        assert!(a.equivalent(&b));
        assert_ne!(a, b);
    }
}
