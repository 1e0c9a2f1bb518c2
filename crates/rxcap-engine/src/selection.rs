//! The depth-indexed cascade state machine.
//!
//! State `i` means the first `i` cascade fields are selected and confirmed;
//! the enabled field is exactly field `i`, and its candidate list is always
//! recomputed from the current partial key. Selecting at a shallower depth
//! truncates everything deeper, so a stale list from a previous path down
//! the cascade can never be shown.

use thiserror::Error;
use tracing::debug;

use rxcap_model::{FullKey, PartialKey, RowSet};

use crate::index::distinct_values;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("no cascade field exists at depth {depth}")]
    NoSuchDepth { depth: usize },
    #[error("field at depth {depth} is not enabled yet (current depth is {current})")]
    Disabled { depth: usize, current: usize },
    #[error("{value:?} is not a candidate at depth {depth}")]
    UnknownValue { depth: usize, value: String },
}

/// Result of a selection event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The next level is enabled with these candidates.
    Candidates { depth: usize, values: Vec<String> },
    /// Every cascade field is selected; the key is complete.
    Complete,
    /// An empty value cleared this depth and everything deeper.
    Cleared { depth: usize },
}

/// The user's position in the cascade: a partial key over the schema's
/// cascade fields.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    key: PartialKey,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state index: the number of confirmed selections.
    pub fn depth(&self) -> usize {
        self.key.len()
    }

    pub fn key(&self) -> &PartialKey {
        &self.key
    }

    /// Field `depth` is enabled when every shallower field is selected.
    pub fn is_enabled(&self, depth: usize) -> bool {
        depth <= self.key.len()
    }

    pub fn reset(&mut self) {
        self.key.truncate(0);
    }

    /// Candidate list for `depth`, computed from the partial-key prefix
    /// `[0, depth)` only.
    pub fn candidates(&self, rows: &RowSet, depth: usize) -> Result<Vec<String>, SelectError> {
        let field = rows
            .schema()
            .cascade_field(depth)
            .ok_or(SelectError::NoSuchDepth { depth })?;
        if !self.is_enabled(depth) {
            return Err(SelectError::Disabled {
                depth,
                current: self.key.len(),
            });
        }
        let mut prefix = self.key.clone();
        prefix.truncate(depth);
        Ok(distinct_values(rows, &prefix, &field.name))
    }

    /// Handles a selection at `depth`. An empty value clears this depth and
    /// everything deeper; a non-empty value must be a current candidate and
    /// advances the state to `depth + 1`.
    pub fn select(
        &mut self,
        rows: &RowSet,
        depth: usize,
        value: &str,
    ) -> Result<SelectOutcome, SelectError> {
        let field = rows
            .schema()
            .cascade_field(depth)
            .ok_or(SelectError::NoSuchDepth { depth })?
            .name
            .clone();
        if !self.is_enabled(depth) {
            return Err(SelectError::Disabled {
                depth,
                current: self.key.len(),
            });
        }

        let value = value.trim();
        if value.is_empty() {
            self.key.truncate(depth);
            debug!(depth, "selection cleared");
            return Ok(SelectOutcome::Cleared { depth });
        }

        let candidates = self.candidates(rows, depth)?;
        if !candidates.iter().any(|c| c == value) {
            return Err(SelectError::UnknownValue {
                depth,
                value: value.to_string(),
            });
        }

        self.key.truncate(depth);
        self.key.push(&field, value);
        debug!(depth, field = %field, "selection confirmed");

        let next = depth + 1;
        if rows.schema().cascade_field(next).is_none() {
            return Ok(SelectOutcome::Complete);
        }
        let values = self.candidates(rows, next)?;
        Ok(SelectOutcome::Candidates { depth: next, values })
    }

    /// The completed key, once every cascade field is selected.
    pub fn full_key(&self, rows: &RowSet) -> Option<FullKey> {
        FullKey::from_partial(rows.schema(), self.key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxcap_model::{NormalizedRow, cascade_schema};

    fn rowset(rows: &[[&str; 5]]) -> RowSet {
        let schema = cascade_schema();
        let fields = ["ASM NAME", "RSM NAME", "SM Name", "Doctor_Name", "City"];
        let rows = rows
            .iter()
            .map(|values| {
                let mut row = NormalizedRow::empty(&schema);
                for (field, value) in fields.iter().zip(values) {
                    row.set(field, value);
                }
                row
            })
            .collect();
        RowSet::new(schema, rows)
    }

    fn sample() -> RowSet {
        rowset(&[
            ["A1", "R1", "S1", "Dr.X", "Pune"],
            ["A1", "R1", "S2", "Dr.Y", "Mumbai"],
            ["A2", "R9", "S9", "Dr.Z", "Delhi"],
        ])
    }

    #[test]
    fn initial_state_enables_only_depth_zero() {
        let rows = sample();
        let state = SelectionState::new();
        assert!(state.is_enabled(0));
        assert!(!state.is_enabled(1));
        assert_eq!(state.candidates(&rows, 0).expect("depth 0"), ["A1", "A2"]);
        assert_eq!(
            state.candidates(&rows, 1).unwrap_err(),
            SelectError::Disabled { depth: 1, current: 0 }
        );
    }

    #[test]
    fn walks_the_cascade_to_completion() {
        let rows = sample();
        let mut state = SelectionState::new();
        let out = state.select(&rows, 0, "A1").expect("select asm");
        assert_eq!(
            out,
            SelectOutcome::Candidates {
                depth: 1,
                values: vec!["R1".to_string()]
            }
        );
        state.select(&rows, 1, "R1").expect("select rsm");
        let out = state.select(&rows, 2, "S2").expect("select sm");
        assert_eq!(
            out,
            SelectOutcome::Candidates {
                depth: 3,
                values: vec!["Dr.Y".to_string()]
            }
        );
        let out = state.select(&rows, 3, "Dr.Y").expect("select doctor");
        assert_eq!(out, SelectOutcome::Complete);
        assert!(state.full_key(&rows).is_some());
    }

    #[test]
    fn shallow_reselect_truncates_deeper_choices() {
        let rows = sample();
        let mut state = SelectionState::new();
        state.select(&rows, 0, "A1").expect("asm");
        state.select(&rows, 1, "R1").expect("rsm");
        state.select(&rows, 2, "S1").expect("sm");
        state.select(&rows, 3, "Dr.X").expect("doctor");

        // Re-selecting at depth 0 drops everything deeper.
        state.select(&rows, 0, "A2").expect("re-select asm");
        assert_eq!(state.depth(), 1);
        assert!(state.full_key(&rows).is_none());
        assert_eq!(state.candidates(&rows, 1).expect("depth 1"), ["R9"]);
    }

    #[test]
    fn empty_value_clears_depth_and_deeper() {
        let rows = sample();
        let mut state = SelectionState::new();
        state.select(&rows, 0, "A1").expect("asm");
        state.select(&rows, 1, "R1").expect("rsm");
        let out = state.select(&rows, 1, "  ").expect("clear");
        assert_eq!(out, SelectOutcome::Cleared { depth: 1 });
        assert_eq!(state.depth(), 1);
        assert!(state.is_enabled(1));
        assert!(!state.is_enabled(2));
    }

    #[test]
    fn rejects_values_that_do_not_co_occur() {
        let rows = sample();
        let mut state = SelectionState::new();
        state.select(&rows, 0, "A1").expect("asm");
        let err = state.select(&rows, 1, "R9").unwrap_err();
        assert_eq!(
            err,
            SelectError::UnknownValue {
                depth: 1,
                value: "R9".to_string()
            }
        );
    }

    #[test]
    fn depth_out_of_range_is_rejected() {
        let rows = sample();
        let mut state = SelectionState::new();
        let err = state.select(&rows, 4, "x").unwrap_err();
        assert_eq!(err, SelectError::NoSuchDepth { depth: 4 });
    }
}
