//! The header matching rule, evaluated uniformly for every schema field.
//!
//! A candidate column is judged by two texts: its label, and the first data
//! row's cell value under it. An exact (case-insensitive, separator-blind)
//! match on the field's canonical name wins immediately; otherwise the field
//! matches when any of its keyword fragments appears as a substring of the
//! text and none of its exclusion fragments does.

use rxcap_model::{FieldDef, MatchVia, normalize_text};

enum TermHit {
    Exact,
    Fragment(String),
}

fn text_hit(field: &FieldDef, raw: &str) -> Option<TermHit> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    if normalize_text(text) == field.normalized_name() {
        return Some(TermHit::Exact);
    }
    let lower = text.to_lowercase();
    if field.exclude_terms.iter().any(|t| lower.contains(t)) {
        return None;
    }
    field
        .match_terms
        .iter()
        .find(|t| lower.contains(*t))
        .map(|t| TermHit::Fragment(t.clone()))
}

/// Evaluates one field's rule against a column. Returns how the column
/// matched, or `None`.
pub fn match_field(field: &FieldDef, label: &str, first_cell: &str) -> Option<MatchVia> {
    if let Some(hit) = text_hit(field, label) {
        return Some(match hit {
            TermHit::Exact => MatchVia::ExactName,
            TermHit::Fragment(term) => MatchVia::Keyword(term),
        });
    }
    if let Some(hit) = text_hit(field, first_cell) {
        return Some(match hit {
            TermHit::Exact => MatchVia::CellValue(field.normalized_name()),
            TermHit::Fragment(term) => MatchVia::CellValue(term),
        });
    }
    None
}
