//! Text normalization and collation helpers shared across the workspace.

use std::cmp::Ordering;

/// Normalizes text for comparison by lowercasing and replacing separators
/// with single spaces. `"Doctor_Name"` and `"doctor name"` compare equal
/// after normalization.
pub fn normalize_text(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(['_', '-', '.', '/', '\\'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Locale-aware-style ordering for display values: case-insensitive lexical
/// comparison with a case-sensitive tie-break so the order is total and
/// deterministic.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    match folded {
        Ordering::Equal => a.cmp(b),
        other => other,
    }
}
