//! The Row Normalizer: remaps an untrusted raw table onto a schema.

use tracing::{debug, info, warn};

use rxcap_model::{
    HeaderMapping, HeaderMatch, MatchVia, NormalizeWarning, NormalizedRow, RawTable, Result,
    RowSet, RxcapError, Schema,
};

use crate::rules::match_field;

/// Output of a normalization pass: the session row set, the header mapping
/// it was built from, and any non-fatal warnings.
#[derive(Debug)]
pub struct Normalized {
    pub rows: RowSet,
    pub mapping: HeaderMapping,
    pub warnings: Vec<NormalizeWarning>,
}

/// Remaps `table` onto `schema` per the header-inference rules.
///
/// The candidate header set is the table's label row; each label (and,
/// separately, the first data row's cell under it) is matched against every
/// schema field in definition order, first field wins, one field per column.
/// When the first data row itself looks like a second header row it is
/// dropped. When nothing matches at all, columns are assigned to fields by
/// position as a last resort.
///
/// # Errors
///
/// [`RxcapError::EmptyData`] when the table has no data rows (or none remain
/// after the header row is dropped); [`RxcapError::NoMatch`] when no column
/// matched and the table has fewer columns than the schema has fields.
pub fn normalize(table: &RawTable, schema: &Schema) -> Result<Normalized> {
    if table.rows.is_empty() {
        return Err(RxcapError::EmptyData);
    }

    let mut warnings = Vec::new();
    let mut column_fields = infer_column_fields(table, schema);
    let mut positional = false;

    if column_fields.iter().all(Option::is_none) {
        if table.labels.len() < schema.len() {
            return Err(RxcapError::NoMatch {
                columns: table.labels.len(),
                fields: schema.len(),
            });
        }
        positional = true;
        for (idx, field) in schema.fields().iter().enumerate() {
            column_fields[idx] = Some((field.name.clone(), MatchVia::Position(idx)));
        }
        warn!(assigned = schema.len(), "no header matched; falling back to positional mapping");
        warnings.push(NormalizeWarning::PositionalFallback {
            assigned: schema.len(),
        });
    }

    let header_row_dropped = !positional && first_row_is_header(table, schema, &column_fields);
    let data_rows: &[Vec<String>] = if header_row_dropped {
        debug!("first data row looks like a header row; dropping it");
        &table.rows[1..]
    } else {
        &table.rows
    };
    if data_rows.is_empty() {
        return Err(RxcapError::EmptyData);
    }

    let mut rows = Vec::with_capacity(data_rows.len());
    for record in data_rows {
        let mut row = NormalizedRow::empty(schema);
        for (col, mapped) in column_fields.iter().enumerate() {
            if let Some((field, _)) = mapped {
                let value = record.get(col).map_or("", String::as_str);
                row.set(field, value);
            }
        }
        rows.push(row);
    }

    let mapping = build_report(table, &column_fields, header_row_dropped, positional);
    info!(
        columns = table.labels.len(),
        mapped = mapping.mapped_count(),
        unmapped = mapping.unmapped.len(),
        rows = rows.len(),
        positional,
        header_row_dropped,
        "normalized table"
    );

    Ok(Normalized {
        rows: RowSet::new(schema.clone(), rows),
        mapping,
        warnings,
    })
}

/// For each column, the schema field it maps to. Scanned in schema
/// definition order per column; the first matching field wins and the
/// column is not offered to later fields.
fn infer_column_fields(table: &RawTable, schema: &Schema) -> Vec<Option<(String, MatchVia)>> {
    let mut mapped = Vec::with_capacity(table.labels.len());
    for (col, label) in table.labels.iter().enumerate() {
        let first_cell = table.cell(0, col);
        let hit = schema
            .fields()
            .iter()
            .find_map(|field| match_field(field, label, first_cell).map(|via| (field.name.clone(), via)));
        mapped.push(hit);
    }
    mapped
}

/// Header-row-vs-data heuristic: the first data row is treated as a second
/// header row when, for any mapped column, its cell value contains the
/// mapped field's canonical keyword ("asm", "doctor", ...).
///
/// Deliberately narrower than testing every cell against every keyword:
/// checking a cell only against its own column's field keeps real data rows
/// from being swallowed (a doctor named "Smith" contains "sm") and keeps
/// normalization idempotent.
fn first_row_is_header(
    table: &RawTable,
    schema: &Schema,
    column_fields: &[Option<(String, MatchVia)>],
) -> bool {
    column_fields.iter().enumerate().any(|(col, mapped)| {
        let Some((field_name, _)) = mapped else {
            return false;
        };
        let Some(field) = schema.field(field_name) else {
            return false;
        };
        let keyword = field.canonical_keyword();
        !keyword.is_empty() && table.cell(0, col).to_lowercase().contains(&keyword)
    })
}

fn build_report(
    table: &RawTable,
    column_fields: &[Option<(String, MatchVia)>],
    header_row_dropped: bool,
    positional: bool,
) -> HeaderMapping {
    let mut matches = Vec::new();
    let mut unmapped = Vec::new();
    for (col, mapped) in column_fields.iter().enumerate() {
        let label = table.labels.get(col).cloned().unwrap_or_default();
        match mapped {
            Some((field, via)) => matches.push(HeaderMatch {
                source_label: label,
                field: field.clone(),
                via: via.clone(),
            }),
            None => unmapped.push(label),
        }
    }
    HeaderMapping {
        matches,
        unmapped,
        header_row_dropped,
        positional,
    }
}
