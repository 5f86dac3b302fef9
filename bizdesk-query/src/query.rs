//! A complete list view: filter, then sort.

use bizdesk_records::Record;
use serde::{Deserialize, Serialize};

use crate::filter::filter_records;
use crate::sort::{sort_records, Direction, SortMode};

/// Search, owner filter and sort order for a record list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub search: String,
    pub owner: String,
    /// `None` sorts by the entity's default key.
    pub sort_key: Option<String>,
    pub direction: Direction,
    pub mode: SortMode,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn with_sort(mut self, key: impl Into<String>, direction: Direction) -> Self {
        self.sort_key = Some(key.into());
        self.direction = direction;
        self
    }

    pub fn with_mode(mut self, mode: SortMode) -> Self {
        self.mode = mode;
        self
    }

    /// The filtered and sorted view of `records`. The slice is not modified.
    pub fn apply<'a, R: Record>(&self, records: &'a [R]) -> Vec<&'a R> {
        let matched = filter_records(records, &self.search, &self.owner);
        sort_records(
            matched,
            self.sort_key.as_deref(),
            self.direction,
            self.mode,
        )
    }
}
