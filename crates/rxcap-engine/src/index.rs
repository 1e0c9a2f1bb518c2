//! The distinct-value index: candidate lists for the next cascade level.

use std::collections::BTreeSet;

use rxcap_model::{PartialKey, RowSet, locale_cmp};

/// Unique, non-blank values of `target_field` across the rows matching
/// `key`, sorted ascending. Pure and recomputed on every call; candidate
/// lists are never cached across key changes.
pub fn distinct_values(rows: &RowSet, key: &PartialKey, target_field: &str) -> Vec<String> {
    let mut unique = BTreeSet::new();
    for row in rows.rows() {
        if !key.matches(row) {
            continue;
        }
        let value = row.get(target_field);
        if value.trim().is_empty() {
            continue;
        }
        unique.insert(value.to_string());
    }
    let mut values: Vec<String> = unique.into_iter().collect();
    values.sort_by(|a, b| locale_cmp(a, b));
    values
}
