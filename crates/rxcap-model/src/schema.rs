//! Schema definitions: the ordered logical fields a spreadsheet is mapped onto.

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::text::normalize_text;

/// How a field participates in the selection funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldRole {
    /// Selected in order after all shallower cascade levels.
    CascadeLevel,
    /// A single searchable selector; mutually exclusive with cascade levels.
    FreeTextKey,
    /// Never selected by the user; extracted from the resolved row for the
    /// submission payload.
    PayloadOnly,
}

/// One logical field of a schema, together with the keyword fragments used
/// to recognize it among unpredictable source column labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    /// Canonical field identifier, e.g. `"ASM NAME"`.
    pub name: String,
    /// Name used for this field in the submission payload, e.g. `"asmName"`.
    pub form_name: String,
    pub role: FieldRole,
    /// Lowercase fragments; a source label matches when any fragment appears
    /// as a substring of the label (or of the first data row's cell value).
    pub match_terms: Vec<String>,
    /// Lowercase fragments that veto a match, e.g. the SM rule excludes
    /// "rsm" and "asm".
    pub exclude_terms: Vec<String>,
}

impl FieldDef {
    pub fn new(
        name: &str,
        form_name: &str,
        role: FieldRole,
        match_terms: &[&str],
        exclude_terms: &[&str],
    ) -> Self {
        Self {
            name: name.to_string(),
            form_name: form_name.to_string(),
            role,
            match_terms: match_terms.iter().map(|t| t.to_lowercase()).collect(),
            exclude_terms: exclude_terms.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    /// Canonical name normalized for comparison ("doctor name" for
    /// "Doctor_Name").
    pub fn normalized_name(&self) -> String {
        normalize_text(&self.name)
    }

    /// First token of the normalized canonical name; used by the
    /// header-row-vs-data heuristic.
    pub fn canonical_keyword(&self) -> String {
        self.normalized_name()
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string()
    }
}

/// An ordered sequence of field definitions.
///
/// Validated on construction: non-empty, unique names, at most one free-text
/// key, and cascade levels never mixed with a free-text key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<FieldDef>,
}

impl Schema {
    pub fn new(fields: Vec<FieldDef>) -> Result<Self, SchemaError> {
        if fields.is_empty() {
            return Err(SchemaError::Empty);
        }
        let mut seen = std::collections::BTreeSet::new();
        for field in &fields {
            if !seen.insert(field.normalized_name()) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
        }
        let free_text = fields
            .iter()
            .filter(|f| f.role == FieldRole::FreeTextKey)
            .count();
        let cascade = fields
            .iter()
            .filter(|f| f.role == FieldRole::CascadeLevel)
            .count();
        if free_text > 1 {
            return Err(SchemaError::MultipleFreeTextKeys);
        }
        if free_text == 1 && cascade > 0 {
            return Err(SchemaError::MixedSelectors);
        }
        if free_text == 0 && cascade == 0 {
            return Err(SchemaError::NoSelector);
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Cascade-level fields in selection order.
    pub fn cascade_fields(&self) -> Vec<&FieldDef> {
        self.fields
            .iter()
            .filter(|f| f.role == FieldRole::CascadeLevel)
            .collect()
    }

    /// The cascade field at the given depth, if any.
    pub fn cascade_field(&self, depth: usize) -> Option<&FieldDef> {
        self.cascade_fields().get(depth).copied()
    }

    pub fn free_text_field(&self) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.role == FieldRole::FreeTextKey)
    }

    pub fn payload_fields(&self) -> Vec<&FieldDef> {
        self.fields
            .iter()
            .filter(|f| f.role == FieldRole::PayloadOnly)
            .collect()
    }

    /// The fields the user selects: cascade levels in order, or the single
    /// free-text key.
    pub fn selector_fields(&self) -> Vec<&FieldDef> {
        let cascade = self.cascade_fields();
        if cascade.is_empty() {
            self.free_text_field().into_iter().collect()
        } else {
            cascade
        }
    }
}

/// The four-level cascade schema (ASM -> RSM -> SM -> Doctor, City derived).
pub fn cascade_schema() -> Schema {
    Schema::new(vec![
        FieldDef::new(
            "ASM NAME",
            "asmName",
            FieldRole::CascadeLevel,
            &["asm", "mr", "medical", "rep"],
            &[],
        ),
        FieldDef::new(
            "RSM NAME",
            "rsmName",
            FieldRole::CascadeLevel,
            &["rsm", "manager", "supervisor", "lead"],
            &[],
        ),
        FieldDef::new(
            "SM Name",
            "smName",
            FieldRole::CascadeLevel,
            &["sm", "zone", "area", "region", "territory"],
            &["rsm", "asm"],
        ),
        FieldDef::new(
            "Doctor_Name",
            "doctorName",
            FieldRole::CascadeLevel,
            &["doctor", "dr", "physician", "practitioner"],
            &[],
        ),
        FieldDef::new(
            "City",
            "city",
            FieldRole::PayloadOnly,
            &["city", "location", "place", "town"],
            &[],
        ),
    ])
    .expect("built-in cascade schema is valid")
}

/// The flat searchable-code schema (WSFA code, managers derived).
pub fn flat_schema() -> Schema {
    Schema::new(vec![
        FieldDef::new(
            "WSFA CODE",
            "wsfaCode",
            FieldRole::FreeTextKey,
            &["wsfa", "code"],
            &[],
        ),
        FieldDef::new(
            "HCP Name",
            "hcpName",
            FieldRole::PayloadOnly,
            &["hcp", "doctor", "dr", "physician"],
            &[],
        ),
        FieldDef::new(
            "SM Name",
            "smName",
            FieldRole::PayloadOnly,
            &["sm", "zone", "area"],
            &["rsm", "asm"],
        ),
        FieldDef::new(
            "RSM NAME",
            "rsmName",
            FieldRole::PayloadOnly,
            &["rsm", "manager"],
            &[],
        ),
        FieldDef::new(
            "ASM NAME",
            "asmName",
            FieldRole::PayloadOnly,
            &["asm", "rep"],
            &[],
        ),
    ])
    .expect("built-in flat schema is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_schemas_validate() {
        assert_eq!(cascade_schema().cascade_fields().len(), 4);
        assert_eq!(cascade_schema().payload_fields().len(), 1);
        assert!(flat_schema().free_text_field().is_some());
        assert_eq!(flat_schema().payload_fields().len(), 4);
    }

    #[test]
    fn rejects_mixed_selectors() {
        let err = Schema::new(vec![
            FieldDef::new("A", "a", FieldRole::CascadeLevel, &["a"], &[]),
            FieldDef::new("B", "b", FieldRole::FreeTextKey, &["b"], &[]),
        ])
        .unwrap_err();
        assert_eq!(err, SchemaError::MixedSelectors);
    }

    #[test]
    fn rejects_duplicate_names_after_normalization() {
        let err = Schema::new(vec![
            FieldDef::new("Doctor_Name", "a", FieldRole::CascadeLevel, &["a"], &[]),
            FieldDef::new("doctor name", "b", FieldRole::PayloadOnly, &["b"], &[]),
        ])
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField(_)));
    }

    #[test]
    fn selector_fields_prefer_cascade() {
        let schema = cascade_schema();
        let names: Vec<&str> = schema.selector_fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["ASM NAME", "RSM NAME", "SM Name", "Doctor_Name"]);
        let flat = flat_schema();
        assert_eq!(flat.selector_fields().len(), 1);
    }
}
