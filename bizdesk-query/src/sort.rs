//! Stable sorting of record lists by a fixed field.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use bizdesk_records::{Record, SortValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        })
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Direction::Ascending),
            "desc" | "descending" => Ok(Direction::Descending),
            other => Err(format!("unknown sort direction: {other}")),
        }
    }
}

/// How sort values are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Numbers numerically, dates chronologically, text case-insensitively.
    #[default]
    Typed,
    /// Everything compared as text, so `"10"` sorts before `"9"`.
    Legacy,
}

/// Case-insensitive comparison with a case-sensitive tiebreak, so the order
/// is total and deterministic.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

pub fn compare_values(a: &SortValue, b: &SortValue, mode: SortMode) -> Ordering {
    if mode == SortMode::Legacy {
        return compare_text(&a.to_string(), &b.to_string());
    }
    match (a, b) {
        (SortValue::Number(x), SortValue::Number(y)) => x.total_cmp(y),
        (SortValue::Date(x), SortValue::Date(y)) => x.cmp(y),
        (SortValue::Text(x), SortValue::Text(y)) => compare_text(x, y),
        _ => compare_text(&a.to_string(), &b.to_string()),
    }
}

/// The key actually used for sorting `R`: `key` if `R` has it, otherwise the
/// entity's default.
pub fn resolve_sort_key<'k, R: Record>(key: Option<&'k str>) -> &'k str {
    match key {
        Some(key) if key == "id" || R::FIELDS.iter().any(|f| *f == key) => key,
        Some(key) => {
            debug!(entity = %R::ENTITY, %key, fallback = R::DEFAULT_SORT, "unknown sort key");
            R::DEFAULT_SORT
        }
        None => R::DEFAULT_SORT,
    }
}

/// Sort `records` by `key`. The sort is stable in both directions: records
/// with equal keys keep their input order.
pub fn sort_records<'a, R: Record>(
    mut records: Vec<&'a R>,
    key: Option<&str>,
    direction: Direction,
    mode: SortMode,
) -> Vec<&'a R> {
    let key = resolve_sort_key::<R>(key);
    let cmp = |a: &&R, b: &&R| match (a.sort_value(key), b.sort_value(key)) {
        (Some(x), Some(y)) => compare_values(&x, &y, mode),
        _ => Ordering::Equal,
    };
    match direction {
        Direction::Ascending => records.sort_by(cmp),
        Direction::Descending => records.sort_by(|a, b| cmp(b, a)),
    }
    records
}
