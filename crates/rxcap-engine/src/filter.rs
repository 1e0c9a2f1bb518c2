//! Case-insensitive substring filter for the flat searchable-code variant.

/// Filters `values` by case-insensitive substring match against `query`.
/// An empty (or whitespace-only) query returns every candidate; the result
/// always preserves the input order, which was fixed once at load time.
pub fn filter_values(values: &[String], query: &str) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return values.to_vec();
    }
    values
        .iter()
        .filter(|v| v.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// What the UI renders for a search query: the matches, and whether a
/// non-empty query matched nothing (which keeps the field disabled rather
/// than showing stale options).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchView {
    pub query: String,
    pub matches: Vec<String>,
    pub zero_match: bool,
}

impl SearchView {
    pub fn new(values: &[String], query: &str) -> Self {
        let matches = filter_values(values, query);
        let zero_match = !query.trim().is_empty() && matches.is_empty();
        Self {
            query: query.to_string(),
            matches,
            zero_match,
        }
    }
}
