//! Input dispatch for code lists.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use rxcap_engine::Session;
use rxcap_ingest::{read_codes_file, read_raw_table};
use rxcap_model::flat_schema;

/// Loads a searchable code list from either a JSON code-list document or a
/// roster CSV. CSV sources are mapped onto the flat schema and the distinct
/// codes are derived from the mapped rows.
pub fn load_code_list(source: &Path) -> Result<Vec<String>> {
    let is_json = source
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        let list = read_codes_file(source)
            .with_context(|| format!("read code list {}", source.display()))?;
        return Ok(list.codes().to_vec());
    }
    let raw = read_raw_table(source)
        .with_context(|| format!("read table {}", source.display()))?;
    let mut session = Session::new(flat_schema());
    let report = session
        .load_table(&raw)
        .with_context(|| format!("map table {}", source.display()))?;
    info!(rows = report.rows, codes = report.codes, "codes derived from table");
    Ok(session.codes().to_vec())
}
