//! The record resolver: payload-only fields for a completed key.

use std::collections::BTreeMap;

use tracing::warn;

use rxcap_model::{FullKey, RowSet};

/// Outcome of resolving a full key against the session rows.
///
/// A miss is non-fatal: the payload fields come back empty and `found` is
/// false, so the caller can still submit with blank enrichment. Duplicate
/// matches are a data-quality condition, not an error; the first row in load
/// order is authoritative and `duplicates` reports how many others matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub payload: BTreeMap<String, String>,
    pub found: bool,
    pub duplicates: usize,
}

impl Resolution {
    pub fn get(&self, field: &str) -> &str {
        self.payload.get(field).map_or("", String::as_str)
    }
}

/// Finds the first row matching `key` and extracts the schema's payload-only
/// fields from it.
pub fn resolve(rows: &RowSet, key: &FullKey) -> Resolution {
    let mut payload: BTreeMap<String, String> = rows
        .schema()
        .payload_fields()
        .iter()
        .map(|f| (f.name.clone(), String::new()))
        .collect();

    let mut matched = rows.rows().iter().filter(|row| key.matches(row));
    let Some(first) = matched.next() else {
        warn!("full key resolved to no row; submitting with blank enrichment fields");
        return Resolution {
            payload,
            found: false,
            duplicates: 0,
        };
    };
    for (field, value) in payload.iter_mut() {
        *value = first.get(field).to_string();
    }
    let duplicates = matched.count();
    if duplicates > 0 {
        warn!(duplicates, "full key matched more than one row; first row wins");
    }
    Resolution {
        payload,
        found: true,
        duplicates,
    }
}
