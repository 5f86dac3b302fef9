//! Core field types: entity types, field kinds and field definitions.
//!
//! A layout is the ordered list of [`FieldDef`]s for one [`EntityType`]. The
//! JSON form of a definition is
//! `{ "id": "...", "label": "...", "type": "select", "options": ["Low", "High"] }`
//! with `options` omitted for every kind except `select`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use ulid::Ulid;

use crate::error::FieldsError;

/// The business entities that carry custom fields.
///
/// Each entity type owns an independent layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    #[serde(rename = "leads")]
    Lead,
    #[serde(rename = "contacts")]
    Contact,
    #[serde(rename = "accounts")]
    Account,
    #[serde(rename = "opportunities")]
    Opportunity,
    #[serde(rename = "activities")]
    Activity,
}

impl EntityType {
    pub const ALL: [EntityType; 5] = [
        EntityType::Lead,
        EntityType::Contact,
        EntityType::Account,
        EntityType::Opportunity,
        EntityType::Activity,
    ];

    /// Plural lower-case name, also the storage key for the entity's records.
    pub fn key(self) -> &'static str {
        match self {
            EntityType::Lead => "leads",
            EntityType::Contact => "contacts",
            EntityType::Account => "accounts",
            EntityType::Opportunity => "opportunities",
            EntityType::Activity => "activities",
        }
    }

    /// Storage key of the entity's custom field layout.
    pub fn custom_fields_key(self) -> String {
        format!("{}_custom_fields", self.key())
    }

    /// Singular display name.
    pub fn singular(self) -> &'static str {
        match self {
            EntityType::Lead => "Lead",
            EntityType::Contact => "Contact",
            EntityType::Account => "Account",
            EntityType::Opportunity => "Opportunity",
            EntityType::Activity => "Activity",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for EntityType {
    type Err = FieldsError;

    /// Accepts singular or plural names, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let entity = match lower.as_str() {
            "lead" | "leads" => EntityType::Lead,
            "contact" | "contacts" => EntityType::Contact,
            "account" | "accounts" => EntityType::Account,
            "opportunity" | "opportunities" => EntityType::Opportunity,
            "activity" | "activities" => EntityType::Activity,
            _ => {
                return Err(FieldsError::UnknownEntity {
                    name: s.to_string(),
                })
            }
        };
        Ok(entity)
    }
}

/// The type of a field. Determines how its value is edited, coerced and
/// displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Select,
}

impl FieldKind {
    pub const ALL: [FieldKind; 4] = [
        FieldKind::Text,
        FieldKind::Number,
        FieldKind::Date,
        FieldKind::Select,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Select => "select",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = FieldsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FieldsError::UnknownKind {
                name: s.to_string(),
            })
    }
}

/// How a field value is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Editor {
    TextInput,
    NumberInput,
    DatePicker,
    SingleChoice,
}

/// A field definition: the schema for one custom attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Choices for `select` fields, in presentation order. Empty otherwise.
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_empty"
    )]
    pub options: Vec<String>,
}

impl FieldDef {
    /// Create a definition with a freshly generated id.
    pub fn new(label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: new_field_id(),
            label: label.into(),
            kind,
            options: Vec::new(),
        }
    }

    /// Create a `select` definition with a freshly generated id.
    pub fn select<I, S>(label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            ..Self::new(label, FieldKind::Select)
        }
    }

    /// Replace the generated id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn is_select(&self) -> bool {
        self.kind == FieldKind::Select
    }

    /// Editor implied by the field kind.
    pub fn effective_editor(&self) -> Editor {
        match self.kind {
            FieldKind::Text => Editor::TextInput,
            FieldKind::Number => Editor::NumberInput,
            FieldKind::Date => Editor::DatePicker,
            FieldKind::Select => Editor::SingleChoice,
        }
    }

    /// Drop options on non-select fields. Returns true if anything changed.
    pub fn normalize(&mut self) -> bool {
        if !self.is_select() && !self.options.is_empty() {
            self.options.clear();
            return true;
        }
        false
    }
}

/// Generate a fresh, sortable field id.
pub fn new_field_id() -> String {
    Ulid::new().to_string()
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_keys() {
        assert_eq!(EntityType::Lead.key(), "leads");
        assert_eq!(EntityType::Opportunity.custom_fields_key(), "opportunities_custom_fields");
        assert_eq!(EntityType::Activity.to_string(), "activities");
    }

    #[test]
    fn entity_from_str_accepts_singular_and_plural() {
        assert_eq!("lead".parse::<EntityType>().unwrap(), EntityType::Lead);
        assert_eq!("Contacts".parse::<EntityType>().unwrap(), EntityType::Contact);
        assert_eq!(" activity ".parse::<EntityType>().unwrap(), EntityType::Activity);
        assert!("invoices".parse::<EntityType>().is_err());
    }

    #[test]
    fn entity_serializes_as_plural_key() {
        let json = serde_json::to_string(&EntityType::Opportunity).unwrap();
        assert_eq!(json, "\"opportunities\"");
    }

    #[test]
    fn kind_from_str() {
        assert_eq!("Select".parse::<FieldKind>().unwrap(), FieldKind::Select);
        assert!("checkbox".parse::<FieldKind>().is_err());
    }

    #[test]
    fn text_field_json_omits_options() {
        let field = FieldDef::new("Source", FieldKind::Text).with_id("f1");
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "f1", "label": "Source", "type": "text"})
        );
    }

    #[test]
    fn select_field_json_shape() {
        let field = FieldDef::select("Priority", ["Low", "High"]).with_id("f2");
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "f2",
                "label": "Priority",
                "type": "select",
                "options": ["Low", "High"]
            })
        );
    }

    #[test]
    fn null_options_read_as_empty() {
        let field: FieldDef =
            serde_json::from_str(r#"{"id":"1718000000000","label":"Tier","type":"text","options":null}"#)
                .unwrap();
        assert_eq!(field.id, "1718000000000");
        assert!(field.options.is_empty());
    }

    #[test]
    fn normalize_clears_stray_options() {
        let mut field = FieldDef::new("Budget", FieldKind::Number);
        field.options = vec!["x".into()];
        assert!(field.normalize());
        assert!(field.options.is_empty());

        let mut select = FieldDef::select("Tier", ["Gold"]);
        assert!(!select.normalize());
        assert_eq!(select.options, vec!["Gold"]);
    }

    #[test]
    fn editor_dispatch_is_exhaustive() {
        let editors: Vec<_> = FieldKind::ALL
            .into_iter()
            .map(|k| FieldDef::new("x", k).effective_editor())
            .collect();
        assert_eq!(
            editors,
            vec![
                Editor::TextInput,
                Editor::NumberInput,
                Editor::DatePicker,
                Editor::SingleChoice
            ]
        );
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = FieldDef::new("a", FieldKind::Text);
        let b = FieldDef::new("b", FieldKind::Text);
        assert_ne!(a.id, b.id);
    }
}
