//! Partial and full selection keys over a schema's selector fields.

use serde::{Deserialize, Serialize};

use crate::schema::Schema;
use crate::table::NormalizedRow;

/// The user's confirmed selections so far: an ordered `(field, value)` prefix
/// of the schema's selector fields. Comparison against rows is exact and
/// case-sensitive, since values are stored as originally cased.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialKey {
    entries: Vec<(String, String)>,
}

impl PartialKey {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, value: &str) {
        self.entries.push((field.to_string(), value.to_string()));
    }

    /// Drops every entry at depth >= `depth`.
    pub fn truncate(&mut self, depth: usize) {
        self.entries.truncate(depth);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn value_at(&self, depth: usize) -> Option<&str> {
        self.entries.get(depth).map(|(_, v)| v.as_str())
    }

    /// True when every recorded field of this key equals the row's value.
    pub fn matches(&self, row: &NormalizedRow) -> bool {
        self.entries
            .iter()
            .all(|(field, value)| row.get(field) == value)
    }

    /// True when this key covers every selector field of the schema, in
    /// schema order.
    pub fn is_full(&self, schema: &Schema) -> bool {
        let selectors = schema.selector_fields();
        self.entries.len() == selectors.len()
            && self
                .entries
                .iter()
                .zip(selectors)
                .all(|((field, _), def)| field == &def.name)
    }
}

/// A [`PartialKey`] proven to cover every selector field of its schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullKey {
    key: PartialKey,
}

impl FullKey {
    /// Promotes a partial key; returns `None` unless the key covers every
    /// selector field in schema order.
    pub fn from_partial(schema: &Schema, key: PartialKey) -> Option<Self> {
        key.is_full(schema).then_some(Self { key })
    }

    /// A full key for a flat schema from its single code value.
    pub fn from_code(schema: &Schema, code: &str) -> Option<Self> {
        let field = schema.free_text_field()?;
        let mut key = PartialKey::new();
        key.push(&field.name, code.trim());
        Self::from_partial(schema, key)
    }

    pub fn as_partial(&self) -> &PartialKey {
        &self.key
    }

    pub fn entries(&self) -> &[(String, String)] {
        self.key.entries()
    }

    pub fn matches(&self, row: &NormalizedRow) -> bool {
        self.key.matches(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{cascade_schema, flat_schema};
    use crate::table::NormalizedRow;

    #[test]
    fn matches_is_exact_and_case_sensitive() {
        let schema = cascade_schema();
        let mut row = NormalizedRow::empty(&schema);
        row.set("ASM NAME", "A1");
        row.set("RSM NAME", "R1");

        let mut key = PartialKey::new();
        key.push("ASM NAME", "A1");
        assert!(key.matches(&row));
        key.push("RSM NAME", "r1");
        assert!(!key.matches(&row));
    }

    #[test]
    fn full_key_requires_all_selectors_in_order() {
        let schema = cascade_schema();
        let mut key = PartialKey::new();
        key.push("ASM NAME", "A1");
        key.push("RSM NAME", "R1");
        assert!(FullKey::from_partial(&schema, key.clone()).is_none());
        key.push("SM Name", "S1");
        key.push("Doctor_Name", "Dr.X");
        assert!(FullKey::from_partial(&schema, key).is_some());
    }

    #[test]
    fn flat_full_key_from_code() {
        let schema = flat_schema();
        let key = FullKey::from_code(&schema, " W123 ").expect("flat key");
        assert_eq!(key.entries(), [("WSFA CODE".to_string(), "W123".to_string())]);
    }
}
