//! List views over bizdesk records
//!
//! Filtering and sorting never mutate the input and never fail: an unknown
//! sort key falls back to the entity's default key and malformed values
//! simply compare as text.
//!
//! ```ignore
//! use bizdesk_query::{Direction, ListQuery};
//!
//! let view = ListQuery::new()
//!     .with_search("gold")
//!     .with_owner("Bob")
//!     .with_sort("value", Direction::Descending)
//!     .apply(&opportunities);
//! ```

pub mod filter;
pub mod query;
pub mod sort;

pub use filter::{filter_records, matches_owner, matches_search};
pub use query::ListQuery;
pub use sort::{compare_text, compare_values, resolve_sort_key, sort_records, Direction, SortMode};
