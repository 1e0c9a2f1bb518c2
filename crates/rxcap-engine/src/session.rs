//! The session: the explicitly owned home of the loaded row set.
//!
//! One session exists per page/form lifetime. Loads replace the row set
//! wholesale and bump a generation counter, so the last completed load
//! always wins; a failed load returns its error and leaves previously
//! installed data untouched. There is no partial mutation and no retry.

use thiserror::Error;
use tracing::info;

use rxcap_ingest::CodeList;
use rxcap_map::normalize;
use rxcap_model::{
    FieldRole, FullKey, HeaderMapping, NormalizeWarning, PartialKey, RawTable, RowSet,
    RxcapError, Schema,
};

use crate::filter::SearchView;
use crate::index::distinct_values;
use crate::resolve::{Resolution, resolve};
use crate::selection::{SelectError, SelectOutcome, SelectionState};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no data has been loaded into this session")]
    NoData,
    #[error(transparent)]
    Select(#[from] SelectError),
}

/// What a completed load installed.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub generation: u64,
    pub rows: usize,
    pub codes: usize,
    pub mapping: Option<HeaderMapping>,
    pub warnings: Vec<NormalizeWarning>,
}

/// Owns the normalized rows, the flat code list, and the cascade state for
/// one form lifetime.
#[derive(Debug)]
pub struct Session {
    schema: Schema,
    rows: Option<RowSet>,
    codes: Vec<String>,
    generation: u64,
    selection: SelectionState,
}

impl Session {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            rows: None,
            codes: Vec::new(),
            generation: 0,
            selection: SelectionState::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Monotonically increasing load counter; bumped only by completed
    /// loads.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn has_data(&self) -> bool {
        self.rows.is_some() || !self.codes.is_empty()
    }

    pub fn rows(&self) -> Option<&RowSet> {
        self.rows.as_ref()
    }

    /// The full sorted code list for the flat variant.
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// Normalizes and installs a raw table. On success the previous row set
    /// (and any pending selection) is replaced wholesale; on failure the
    /// session is left exactly as it was.
    pub fn load_table(&mut self, table: &RawTable) -> Result<LoadReport, RxcapError> {
        let normalized = normalize(table, &self.schema)?;
        let codes = match self.schema.free_text_field() {
            Some(field) => distinct_values(&normalized.rows, &PartialKey::new(), &field.name),
            None => Vec::new(),
        };
        let rows = normalized.rows.len();
        self.rows = Some(normalized.rows);
        self.codes = codes;
        self.selection.reset();
        self.generation += 1;
        info!(generation = self.generation, rows, "session data replaced from table load");
        Ok(LoadReport {
            generation: self.generation,
            rows,
            codes: self.codes.len(),
            mapping: Some(normalized.mapping),
            warnings: normalized.warnings,
        })
    }

    /// Installs a pre-filtered flat code list. With no backing rows,
    /// resolution later yields blank enrichment fields.
    pub fn load_codes(&mut self, list: &CodeList) -> LoadReport {
        self.rows = None;
        self.codes = list.codes().to_vec();
        self.selection.reset();
        self.generation += 1;
        info!(
            generation = self.generation,
            codes = self.codes.len(),
            "session data replaced from code-list load"
        );
        LoadReport {
            generation: self.generation,
            rows: 0,
            codes: self.codes.len(),
            mapping: None,
            warnings: Vec::new(),
        }
    }

    /// Candidate values for a cascade depth given the current selections.
    pub fn candidates(&self, depth: usize) -> Result<Vec<String>, SessionError> {
        let rows = self.rows.as_ref().ok_or(SessionError::NoData)?;
        Ok(self.selection.candidates(rows, depth)?)
    }

    /// Drives the cascade state machine (cascade schemas only).
    pub fn select_field(
        &mut self,
        depth: usize,
        value: &str,
    ) -> Result<SelectOutcome, SessionError> {
        let rows = self.rows.as_ref().ok_or(SessionError::NoData)?;
        Ok(self.selection.select(rows, depth, value)?)
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Text filter over the flat code list.
    pub fn search(&self, query: &str) -> SearchView {
        SearchView::new(&self.codes, query)
    }

    /// The completed cascade key, if every level is selected.
    pub fn full_key(&self) -> Option<FullKey> {
        let rows = self.rows.as_ref()?;
        self.selection.full_key(rows)
    }

    /// A full key for the flat variant from a selected code.
    pub fn key_for_code(&self, code: &str) -> Option<FullKey> {
        FullKey::from_code(&self.schema, code)
    }

    /// Enrichment fields for a completed key, queried just before
    /// submission. Without backing rows (code-list loads) every payload
    /// field comes back blank, and submission proceeds anyway.
    pub fn enrichment(&self, key: &FullKey) -> Resolution {
        match &self.rows {
            Some(rows) => resolve(rows, key),
            None => Resolution {
                payload: self
                    .schema
                    .fields()
                    .iter()
                    .filter(|f| f.role == FieldRole::PayloadOnly)
                    .map(|f| (f.name.clone(), String::new()))
                    .collect(),
                found: false,
                duplicates: 0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxcap_model::{cascade_schema, flat_schema};

    fn raw(labels: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            labels.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    fn cascade_table() -> RawTable {
        raw(
            &["ASM NAME", "RSM NAME", "SM Name", "Doctor_Name", "City"],
            &[
                &["A1", "R1", "S1", "Dr.X", "Pune"],
                &["A1", "R1", "S2", "Dr.Y", "Mumbai"],
            ],
        )
    }

    #[test]
    fn failed_load_leaves_previous_data_installed() {
        let mut session = Session::new(cascade_schema());
        session.load_table(&cascade_table()).expect("first load");
        assert_eq!(session.generation(), 1);

        let err = session.load_table(&RawTable::default()).unwrap_err();
        assert!(matches!(err, RxcapError::EmptyData));
        assert_eq!(session.generation(), 1);
        assert!(session.has_data());
        assert_eq!(session.candidates(0).expect("candidates"), ["A1"]);
    }

    #[test]
    fn later_load_wins_and_resets_selection() {
        let mut session = Session::new(cascade_schema());
        session.load_table(&cascade_table()).expect("first load");
        session.select_field(0, "A1").expect("select");
        assert_eq!(session.selection().depth(), 1);

        let replacement = raw(
            &["ASM NAME", "RSM NAME", "SM Name", "Doctor_Name", "City"],
            &[&["B1", "Q1", "T1", "Dr.Z", "Delhi"]],
        );
        let report = session.load_table(&replacement).expect("second load");
        assert_eq!(report.generation, 2);
        assert_eq!(session.selection().depth(), 0);
        assert_eq!(session.candidates(0).expect("candidates"), ["B1"]);
    }

    #[test]
    fn end_to_end_cascade_resolves_city() {
        let mut session = Session::new(cascade_schema());
        session.load_table(&cascade_table()).expect("load");
        session.select_field(0, "A1").expect("asm");
        session.select_field(1, "R1").expect("rsm");
        let out = session.select_field(2, "S2").expect("sm");
        assert_eq!(
            out,
            SelectOutcome::Candidates {
                depth: 3,
                values: vec!["Dr.Y".to_string()]
            }
        );
        session.select_field(3, "Dr.Y").expect("doctor");
        let key = session.full_key().expect("full key");
        let resolution = session.enrichment(&key);
        assert_eq!(resolution.get("City"), "Mumbai");
    }

    #[test]
    fn flat_table_load_builds_sorted_code_list() {
        let mut session = Session::new(flat_schema());
        let table = raw(
            &["WSFA CODE", "HCP Name", "SM Name", "RSM NAME", "ASM NAME"],
            &[
                &["W010", "Dr.B", "S1", "R1", "A1"],
                &["W001", "Dr.A", "S2", "R2", "A2"],
                &["W010", "Dr.B", "S1", "R1", "A1"],
            ],
        );
        session.load_table(&table).expect("load");
        assert_eq!(session.codes(), ["W001", "W010"]);
        let view = session.search("10");
        assert_eq!(view.matches, ["W010"]);
        let key = session.key_for_code("W001").expect("key");
        assert_eq!(session.enrichment(&key).get("HCP Name"), "Dr.A");
    }

    #[test]
    fn code_list_load_has_blank_enrichment() {
        let mut session = Session::new(flat_schema());
        let list = CodeList::from_values(["W002", "W001"]);
        let report = session.load_codes(&list);
        assert_eq!(report.codes, 2);
        assert!(session.search("").matches.len() == 2);
        let key = session.key_for_code("W001").expect("key");
        let resolution = session.enrichment(&key);
        assert!(!resolution.found);
        assert_eq!(resolution.get("HCP Name"), "");
    }

    #[test]
    fn operations_without_data_report_no_data() {
        let mut session = Session::new(cascade_schema());
        assert!(matches!(session.candidates(0), Err(SessionError::NoData)));
        assert!(matches!(
            session.select_field(0, "A1"),
            Err(SessionError::NoData)
        ));
    }
}
