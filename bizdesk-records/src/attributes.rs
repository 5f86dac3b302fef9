//! Custom attribute maps: the per-record values of user-defined fields.
//!
//! Values are keyed by field id and kept as text in insertion order. The
//! field layout is what gives a value meaning; the map itself never consults
//! it, so removing a field leaves its values in place.

use std::fmt;

use bizdesk_fields::{AttributeLookup, FieldDef};
use indexmap::IndexMap;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::record::Record;

/// A record's custom field values, keyed by field id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CustomAttributes(IndexMap<String, String>);

impl CustomAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field_id: &str) -> Option<&str> {
        self.0.get(field_id).map(String::as_str)
    }

    pub fn contains(&self, field_id: &str) -> bool {
        self.0.contains_key(field_id)
    }

    /// Set a value, keeping the key's original position if it already exists.
    pub fn insert(&mut self, field_id: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(field_id.into(), value.into())
    }

    /// Remove a value, preserving the order of the remaining keys.
    pub fn remove(&mut self, field_id: &str) -> Option<String> {
        self.0.shift_remove(field_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AttributeLookup for CustomAttributes {
    fn raw_value(&self, field_id: &str) -> Option<&str> {
        self.get(field_id)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CustomAttributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Accepts any JSON object. Numbers and booleans written by older data are
/// kept as their text form; nulls are dropped; nested values are skipped.
impl<'de> Deserialize<'de> for CustomAttributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AttrVisitor;

        impl<'de> Visitor<'de> for AttrVisitor {
            type Value = CustomAttributes;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field ids to values")
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(CustomAttributes::new())
            }

            fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Self::Value, M::Error> {
                let mut attrs = IndexMap::new();
                while let Some((key, value)) = map.next_entry::<String, serde_json::Value>()? {
                    match value {
                        serde_json::Value::Null => {}
                        serde_json::Value::String(s) => {
                            attrs.insert(key, s);
                        }
                        serde_json::Value::Number(n) => {
                            attrs.insert(key, n.to_string());
                        }
                        serde_json::Value::Bool(b) => {
                            attrs.insert(key, b.to_string());
                        }
                        other => {
                            warn!(field = %key, value = %other, "skipping non-scalar custom value");
                        }
                    }
                }
                Ok(CustomAttributes(attrs))
            }
        }

        deserializer.deserialize_any(AttrVisitor)
    }
}

/// Return a copy of `record` with `custom[field_id] = value`.
///
/// The input record is not modified; every other fixed field and custom key
/// of the copy is identical to it.
pub fn set_attribute<R: Record>(record: &R, field_id: &str, value: impl Into<String>) -> R {
    let mut updated = record.clone();
    updated.custom_mut().insert(field_id, value);
    updated
}

/// Return a copy of `record` without `custom[field_id]`.
///
/// Only called for an explicit user action. Removing a field from a layout
/// never clears values.
pub fn clear_attribute<R: Record>(record: &R, field_id: &str) -> R {
    let mut updated = record.clone();
    updated.custom_mut().remove(field_id);
    updated
}

/// Custom keys on `record` that no definition in `defs` describes.
pub fn orphaned_attributes<'a, R: Record>(record: &'a R, defs: &[FieldDef]) -> Vec<&'a str> {
    record
        .custom()
        .iter()
        .map(|(k, _)| k)
        .filter(|k| !defs.iter().any(|d| d.id == *k))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Lead;
    use bizdesk_fields::FieldKind;

    fn lead() -> Lead {
        Lead {
            id: 1,
            name: "John Doe".into(),
            company: "Acme Corp".into(),
            owner: "Alice".into(),
            custom: [("f1", "Referral"), ("f2", "High")].into_iter().collect(),
            ..Lead::default()
        }
    }

    #[test]
    fn set_attribute_is_copy_on_write() {
        let original = lead();
        let updated = set_attribute(&original, "f2", "Low");

        assert_eq!(original.custom.get("f2"), Some("High"));
        assert_eq!(updated.custom.get("f2"), Some("Low"));
        assert_eq!(updated.custom.get("f1"), Some("Referral"));
        assert_eq!(updated.name, original.name);
        assert_eq!(updated.company, original.company);
    }

    #[test]
    fn set_attribute_keeps_key_order() {
        let updated = set_attribute(&lead(), "f1", "Web");
        let keys: Vec<_> = updated.custom.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["f1", "f2"]);

        let added = set_attribute(&updated, "f0", "x");
        let keys: Vec<_> = added.custom.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["f1", "f2", "f0"]);
    }

    #[test]
    fn clear_attribute_removes_only_that_key() {
        let original = lead();
        let cleared = clear_attribute(&original, "f1");
        assert!(!cleared.custom.contains("f1"));
        assert_eq!(cleared.custom.get("f2"), Some("High"));
        assert!(original.custom.contains("f1"));
    }

    #[test]
    fn orphans_are_reported_not_removed() {
        let record = lead();
        let defs = vec![FieldDef::new("Source", FieldKind::Text).with_id("f1")];
        assert_eq!(orphaned_attributes(&record, &defs), vec!["f2"]);
        assert_eq!(record.custom.len(), 2);
    }

    #[test]
    fn legacy_scalar_values_become_text() {
        let attrs: CustomAttributes = serde_json::from_str(
            r#"{"seats": 25, "vip": true, "gone": null, "tier": "Gold", "tags": ["a"]}"#,
        )
        .unwrap();
        let pairs: Vec<_> = attrs.iter().collect();
        assert_eq!(pairs, vec![("seats", "25"), ("vip", "true"), ("tier", "Gold")]);
    }

    #[test]
    fn null_map_reads_as_empty() {
        let attrs: CustomAttributes = serde_json::from_str("null").unwrap();
        assert!(attrs.is_empty());
    }
}
