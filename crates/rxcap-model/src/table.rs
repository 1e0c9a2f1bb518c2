//! Row containers: the raw table as loaded, and the normalized row set the
//! funnel operates on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::Schema;

/// A raw table as produced by the loader: untrusted column labels plus
/// string-valued data rows in source order. Cells are addressed by position;
/// `labels[i]` names column `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub labels: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(labels: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { labels, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell value at (row, column), empty string when out of range.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map_or("", String::as_str)
    }
}

/// A row remapped onto a schema. Invariant: the key set is exactly the
/// schema's field set, with empty strings for unmapped fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRow {
    cells: BTreeMap<String, String>,
}

impl NormalizedRow {
    /// A row with every schema field present and empty.
    pub fn empty(schema: &Schema) -> Self {
        let cells = schema
            .fields()
            .iter()
            .map(|f| (f.name.clone(), String::new()))
            .collect();
        Self { cells }
    }

    /// Value for a field, empty string when the field is absent.
    pub fn get(&self, field: &str) -> &str {
        self.cells.get(field).map_or("", String::as_str)
    }

    /// Overwrites a field's value. Only fields already present (i.e. schema
    /// fields) can be set; other names are ignored so the key-set invariant
    /// holds.
    pub fn set(&mut self, field: &str, value: &str) {
        if let Some(slot) = self.cells.get_mut(field) {
            *slot = value.to_string();
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn field_count(&self) -> usize {
        self.cells.len()
    }
}

/// The session's normalized rows, immutable after load, together with the
/// schema they were normalized against.
#[derive(Debug, Clone)]
pub struct RowSet {
    schema: Schema,
    rows: Vec<NormalizedRow>,
}

impl RowSet {
    pub fn new(schema: Schema, rows: Vec<NormalizedRow>) -> Self {
        Self { schema, rows }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[NormalizedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::cascade_schema;

    #[test]
    fn empty_row_has_full_schema_key_set() {
        let schema = cascade_schema();
        let row = NormalizedRow::empty(&schema);
        assert_eq!(row.field_count(), schema.len());
        assert_eq!(row.get("City"), "");
        assert_eq!(row.get("missing"), "");
    }

    #[test]
    fn set_ignores_unknown_fields() {
        let schema = cascade_schema();
        let mut row = NormalizedRow::empty(&schema);
        row.set("ASM NAME", "A1");
        row.set("NOT A FIELD", "x");
        assert_eq!(row.get("ASM NAME"), "A1");
        assert_eq!(row.field_count(), schema.len());
    }

    #[test]
    fn raw_table_cell_is_total() {
        let table = RawTable::new(
            vec!["a".into(), "b".into()],
            vec![vec!["1".into()], vec!["2".into(), "3".into()]],
        );
        assert_eq!(table.cell(0, 1), "");
        assert_eq!(table.cell(1, 1), "3");
        assert_eq!(table.cell(9, 0), "");
    }
}
