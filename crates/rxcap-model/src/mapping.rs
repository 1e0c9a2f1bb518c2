//! Header mapping report types: how source columns were matched to schema
//! fields, and what the normalizer had to fall back on.

use serde::{Deserialize, Serialize};

/// How a source column was matched to its schema field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum MatchVia {
    /// The label equals the field's canonical name (case-insensitive).
    ExactName,
    /// A keyword fragment matched the label text.
    Keyword(String),
    /// A keyword fragment matched the first data row's cell value under the
    /// label rather than the label itself.
    CellValue(String),
    /// Positional fallback: the column was assigned by index.
    Position(usize),
}

/// One confirmed column-to-field assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderMatch {
    pub source_label: String,
    pub field: String,
    pub via: MatchVia,
}

/// The inferred correspondence between source columns and schema fields,
/// built once per load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderMapping {
    pub matches: Vec<HeaderMatch>,
    /// Source labels no schema field claimed.
    pub unmapped: Vec<String>,
    /// True when the first data row looked like a second header row and was
    /// dropped from the data.
    pub header_row_dropped: bool,
    /// True when no column matched and fields were assigned by position.
    pub positional: bool,
}

impl HeaderMapping {
    /// The schema field a source label maps to, if any.
    pub fn field_for(&self, source_label: &str) -> Option<&str> {
        self.matches
            .iter()
            .find(|m| m.source_label == source_label)
            .map(|m| m.field.as_str())
    }

    pub fn mapped_count(&self) -> usize {
        self.matches.len()
    }
}

/// Non-fatal conditions raised while normalizing; surfaced to the caller for
/// display, never thrown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum NormalizeWarning {
    /// No header matched; columns were assigned to fields by position.
    PositionalFallback { assigned: usize },
}

impl std::fmt::Display for NormalizeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PositionalFallback { assigned } => write!(
                f,
                "no header matched; assigned {assigned} columns to schema fields by position"
            ),
        }
    }
}
