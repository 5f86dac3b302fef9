//! The `Record` trait shared by every CRM entity.

use std::collections::BTreeSet;
use std::fmt;

use bizdesk_fields::EntityType;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::attributes::CustomAttributes;
use crate::error::Result;
use crate::journal::Journal;

/// Read `null` as the type's default, as older data writes unset fields.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One past the largest id in use. Once `u64::MAX` is taken, the smallest
/// unused id instead.
pub(crate) fn next_free_id(ids: impl IntoIterator<Item = u64>) -> u64 {
    let used: BTreeSet<u64> = ids.into_iter().collect();
    match used.last() {
        None => 1,
        Some(max) => max
            .checked_add(1)
            .or_else(|| (1..).find(|id| !used.contains(id)))
            .unwrap_or(0),
    }
}

/// A fixed field's value as seen by the list sorter.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl SortValue {
    /// Parse `raw` as a date, falling back to text.
    pub fn date_or_text(raw: &str) -> Self {
        match bizdesk_fields::render::parse_date(raw) {
            Some(d) => SortValue::Date(d),
            None => SortValue::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for SortValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortValue::Text(s) => f.write_str(s),
            SortValue::Number(n) => write!(f, "{n}"),
            SortValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// A business record: fixed fields plus a custom attribute map.
pub trait Record: Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Entity type whose field layout applies to this record.
    const ENTITY: EntityType;

    /// Fixed field names, in display order.
    const FIELDS: &'static [&'static str];

    /// Sort key used when none (or an unknown one) is requested.
    const DEFAULT_SORT: &'static str;

    fn id(&self) -> u64;

    fn set_id(&mut self, id: u64);

    fn owner(&self) -> &str;

    /// Short label for headings and listings.
    fn title(&self) -> &str;

    /// The fixed fields searched by free-text filtering.
    fn search_text(&self) -> Vec<&str>;

    /// Text form of a fixed field, `None` if the entity has no such field.
    fn field(&self, name: &str) -> Option<String>;

    /// Set a fixed field from text.
    fn set_field(&mut self, name: &str, value: &str) -> Result<()>;

    /// Typed value of a sortable fixed field, `None` for an unknown key.
    fn sort_value(&self, key: &str) -> Option<SortValue>;

    fn custom(&self) -> &CustomAttributes;

    fn custom_mut(&mut self) -> &mut CustomAttributes;

    fn journal(&self) -> &Journal;

    fn journal_mut(&mut self) -> &mut Journal;

    /// Fixed fields as `(name, value)` pairs, in display order.
    fn fixed_fields(&self) -> Vec<(&'static str, String)> {
        Self::FIELDS
            .iter()
            .map(|name| (*name, self.field(name).unwrap_or_default()))
            .collect()
    }
}
