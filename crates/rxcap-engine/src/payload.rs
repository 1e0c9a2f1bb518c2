//! Submission payload assembly.
//!
//! The payload handed to the submission collaborator carries only
//! allow-listed fields: the schema's form-named fields plus the externally
//! attached `rxDate`, `rxFile`, and `timestamp`. Values are trimmed and
//! length-capped; the wire transport itself is out of scope.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use rxcap_model::{FullKey, Schema};

use crate::resolve::Resolution;

/// Maximum length of any payload value, in characters.
pub const MAX_FIELD_LEN: usize = 1000;

/// Finalized submission payload: form field name to sanitized value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionPayload {
    fields: BTreeMap<String, String>,
}

impl SubmissionPayload {
    pub fn get(&self, form_name: &str) -> &str {
        self.fields.get(form_name).map_or("", String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    fn insert(&mut self, form_name: &str, value: &str) {
        self.fields
            .insert(form_name.to_string(), sanitize(value));
    }
}

fn sanitize(value: &str) -> String {
    value.trim().chars().take(MAX_FIELD_LEN).collect()
}

/// Inputs for payload assembly: the completed key, its resolution, and the
/// externally attached submission fields.
#[derive(Debug, Clone)]
pub struct PayloadInput<'a> {
    pub key: &'a FullKey,
    pub resolution: &'a Resolution,
    /// The user-entered prescription date, as a display string.
    pub rx_date: &'a str,
    /// Reference URL of the uploaded file, attached by the upload
    /// collaborator.
    pub file_url: &'a str,
}

/// Assembles the allow-listed submission payload. Selector fields come from
/// the key, enrichment fields from the resolution, and `timestamp` is the
/// supplied instant in RFC 3339. Fields outside the schema's form names and
/// the three attached fields never appear.
pub fn build_payload(
    schema: &Schema,
    input: &PayloadInput<'_>,
    timestamp: DateTime<Utc>,
) -> SubmissionPayload {
    let mut payload = SubmissionPayload::default();

    for (field, value) in input.key.entries() {
        if let Some(def) = schema.field(field) {
            payload.insert(&def.form_name, value);
        }
    }
    for def in schema.payload_fields() {
        payload.insert(&def.form_name, input.resolution.get(&def.name));
    }
    payload.insert("rxDate", input.rx_date);
    payload.insert("rxFile", input.file_url);
    payload.insert(
        "timestamp",
        &timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
    );
    payload
}
