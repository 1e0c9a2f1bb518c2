//! CSV loading into a [`RawTable`].
//!
//! The reader runs in non-header mode: the first retained physical row
//! becomes the candidate label set, and everything after it is carried
//! through as data. Whether those labels are trustworthy (and whether the
//! next row is a second header row) is decided downstream by the
//! normalizer, not here.

use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use rxcap_model::RawTable;

use crate::error::IngestError;

fn normalize_label(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Reads a CSV file into a raw table. Fully blank rows are skipped; cells
/// are trimmed and BOM-stripped. An empty file yields an empty table, which
/// the normalizer will reject as `EmptyData`.
pub fn read_raw_table(path: &Path) -> Result<RawTable, IngestError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut physical_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(|value| value.is_empty()) {
            continue;
        }
        physical_rows.push(row);
    }

    let Some(label_row) = physical_rows.first() else {
        return Ok(RawTable::default());
    };
    let labels: Vec<String> = label_row.iter().map(|v| normalize_label(v)).collect();
    let width = labels.len();

    let rows: Vec<Vec<String>> = physical_rows
        .iter()
        .skip(1)
        .map(|record| {
            (0..width)
                .map(|idx| record.get(idx).cloned().unwrap_or_default())
                .collect()
        })
        .collect();

    debug!(
        path = %path.display(),
        columns = labels.len(),
        rows = rows.len(),
        "loaded raw table"
    );
    Ok(RawTable::new(labels, rows))
}
