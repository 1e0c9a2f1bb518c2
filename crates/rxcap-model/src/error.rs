use thiserror::Error;

/// Fatal errors from the funnel engine.
///
/// Non-fatal conditions (a key that resolves to no row, a text filter with
/// zero matches, a positional-fallback mapping) are reported as values, not
/// errors, so callers can keep the session alive and render them.
#[derive(Debug, Error)]
pub enum RxcapError {
    /// The loaded table contains no data rows at all. The session cannot be
    /// populated; the caller must reload.
    #[error("no data rows found in the loaded table")]
    EmptyData,
    /// No source column matched any schema field, and the table has too few
    /// columns for positional assignment.
    #[error(
        "could not infer a header mapping: none of {columns} source columns matched \
         any of {fields} schema fields, and positional fallback needs at least {fields} columns"
    )]
    NoMatch { columns: usize, fields: usize },
    #[error("invalid schema: {0}")]
    Schema(#[from] SchemaError),
}

/// Violations detected when constructing a [`crate::Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("schema has no fields")]
    Empty,
    #[error("duplicate field name: {0}")]
    DuplicateField(String),
    #[error("schema declares more than one free-text key field")]
    MultipleFreeTextKeys,
    #[error("schema mixes cascade levels with a free-text key")]
    MixedSelectors,
    #[error("schema has no selectable field (cascade level or free-text key)")]
    NoSelector,
}

pub type Result<T> = std::result::Result<T, RxcapError>;
