//! Field renderer: dispatch on field kind to an edit control and a display
//! string.
//!
//! Values are stored as text. Reading a value coerces it through the field's
//! declared kind; anything that does not fit degrades to [`FieldValue::Empty`]
//! so corrupt custom data never blocks rendering a record.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::{Editor, FieldDef, FieldKind};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Read access to a record's stored custom values, keyed by field id.
pub trait AttributeLookup {
    fn raw_value(&self, field_id: &str) -> Option<&str>;
}

impl AttributeLookup for HashMap<String, String> {
    fn raw_value(&self, field_id: &str) -> Option<&str> {
        self.get(field_id).map(String::as_str)
    }
}

impl AttributeLookup for BTreeMap<String, String> {
    fn raw_value(&self, field_id: &str) -> Option<&str> {
        self.get(field_id).map(String::as_str)
    }
}

/// A custom value read through its field definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum FieldValue {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Select(String),
}

impl FieldValue {
    /// Coerce a stored value using `def.kind` as the authoritative type.
    pub fn coerce(def: &FieldDef, raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|r| !r.is_empty()) else {
            return FieldValue::Empty;
        };
        match def.kind {
            FieldKind::Text => FieldValue::Text(raw.to_string()),
            FieldKind::Number => parse_number(raw).map_or(FieldValue::Empty, FieldValue::Number),
            FieldKind::Date => parse_date(raw).map_or(FieldValue::Empty, FieldValue::Date),
            FieldKind::Select => {
                if def.options.iter().any(|o| o == raw) {
                    FieldValue::Select(raw.to_string())
                } else {
                    FieldValue::Empty
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }

    /// Text form used for storage.
    pub fn to_raw(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Empty => Ok(()),
            FieldValue::Text(s) | FieldValue::Select(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
        }
    }
}

/// Parse a number, rejecting non-finite values.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse an ISO date. A time suffix (`2024-06-10T10:00`) is ignored.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(day, DATE_FORMAT).ok()
}

/// The input control to present for a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "kebab-case")]
pub enum Control {
    TextInput { value: String },
    NumberInput { value: Option<f64> },
    DatePicker { value: Option<NaiveDate> },
    SingleChoice {
        options: Vec<String>,
        selected: Option<String>,
    },
}

/// A field ready for display: its edit control plus a read-only string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedField {
    pub id: String,
    pub label: String,
    pub editor: Editor,
    pub control: Control,
    pub display: String,
}

/// Render one field for the given stored value.
pub fn render_field(def: &FieldDef, raw: Option<&str>) -> RenderedField {
    let value = FieldValue::coerce(def, raw);
    let control = match (&def.kind, &value) {
        (FieldKind::Text, FieldValue::Text(s)) => Control::TextInput { value: s.clone() },
        (FieldKind::Text, _) => Control::TextInput {
            value: String::new(),
        },
        (FieldKind::Number, FieldValue::Number(n)) => Control::NumberInput { value: Some(*n) },
        (FieldKind::Number, _) => Control::NumberInput { value: None },
        (FieldKind::Date, FieldValue::Date(d)) => Control::DatePicker { value: Some(*d) },
        (FieldKind::Date, _) => Control::DatePicker { value: None },
        (FieldKind::Select, v) => Control::SingleChoice {
            options: def.options.clone(),
            selected: match v {
                FieldValue::Select(s) => Some(s.clone()),
                _ => None,
            },
        },
    };

    RenderedField {
        id: def.id.clone(),
        label: def.label.clone(),
        editor: def.effective_editor(),
        control,
        display: value.to_string(),
    }
}

/// Render every field of a layout, in layout order.
///
/// Stored values whose key matches no definition are not rendered.
pub fn render_custom<A>(defs: &[FieldDef], attrs: &A) -> Vec<RenderedField>
where
    A: AttributeLookup + ?Sized,
{
    defs.iter()
        .map(|def| render_field(def, attrs.raw_value(&def.id)))
        .collect()
}
