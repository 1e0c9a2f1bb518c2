//! Flat code-list loading.
//!
//! The flat variant of the funnel receives a pre-filtered JSON document of
//! the form `{"codes": ["W001", ...], "count": 2}` instead of a full table.
//! Codes are deduplicated and sorted once here; the text filter preserves
//! this order.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use rxcap_model::locale_cmp;

use crate::error::IngestError;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CodesDocument {
    codes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
}

/// A deduplicated, sorted list of searchable codes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeList {
    codes: Vec<String>,
}

impl CodeList {
    /// Builds a code list from raw values: blanks dropped, values trimmed,
    /// duplicates removed, sorted ascending.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut codes: Vec<String> = values
            .into_iter()
            .map(|v| v.as_ref().trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        codes.sort_by(|a, b| locale_cmp(a, b));
        codes.dedup();
        Self { codes }
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Parses a `{"codes": [...]}` document from a reader.
pub fn load_codes<R: Read>(reader: R) -> Result<CodeList, IngestError> {
    let document: CodesDocument = serde_json::from_reader(reader)?;
    let list = CodeList::from_values(&document.codes);
    debug!(received = document.codes.len(), kept = list.len(), "loaded code list");
    Ok(list)
}

/// Reads a code-list document from a file path.
pub fn read_codes_file(path: &Path) -> Result<CodeList, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_codes(BufReader::new(file))
}
