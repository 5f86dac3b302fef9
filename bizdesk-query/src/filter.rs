//! Free-text search and owner filtering.

use bizdesk_records::Record;

/// Whether `record` contains `needle` in any fixed field or custom value.
///
/// `needle` must already be lower-cased. An empty needle matches everything.
pub fn matches_search<R: Record>(record: &R, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    record
        .search_text()
        .into_iter()
        .chain(record.custom().values())
        .any(|text| text.to_lowercase().contains(needle))
}

/// Exact owner match; an empty filter matches everything.
pub fn matches_owner<R: Record>(record: &R, owner: &str) -> bool {
    owner.is_empty() || record.owner() == owner
}

/// Records matching both the search text and the owner filter, in input
/// order.
///
/// The search text is used as typed: surrounding spaces are part of it.
pub fn filter_records<'a, R, I>(records: I, search: &str, owner: &str) -> Vec<&'a R>
where
    R: Record,
    I: IntoIterator<Item = &'a R>,
{
    let needle = search.to_lowercase();
    records
        .into_iter()
        .filter(|r| matches_owner(*r, owner) && matches_search(*r, &needle))
        .collect()
}
