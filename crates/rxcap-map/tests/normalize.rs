use proptest::prelude::{ProptestConfig, any, proptest};

use rxcap_map::normalize;
use rxcap_model::{MatchVia, RawTable, cascade_schema, flat_schema};

fn raw(labels: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable::new(
        labels.iter().map(|s| s.to_string()).collect(),
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect(),
    )
}

#[test]
fn exact_label_maps_regardless_of_column_order() {
    let schema = cascade_schema();
    let t = raw(
        &["City", "Doctor_Name", "SM Name", "RSM NAME", "ASM NAME"],
        &[&["Pune", "Dr.X", "S1", "R1", "A1"]],
    );
    let normalized = normalize(&t, &schema).expect("normalize");
    for label in ["City", "Doctor_Name", "SM Name", "RSM NAME", "ASM NAME"] {
        assert_eq!(normalized.mapping.field_for(label), Some(label));
    }
    let row = &normalized.rows.rows()[0];
    assert_eq!(row.get("ASM NAME"), "A1");
    assert_eq!(row.get("City"), "Pune");
}

#[test]
fn every_output_row_has_exactly_the_schema_fields() {
    let schema = cascade_schema();
    let t = raw(
        &["ASM NAME", "Unrelated", "Doctor_Name"],
        &[&["A1", "junk", "Dr.X"], &["A2", "junk", "Dr.Y"]],
    );
    let normalized = normalize(&t, &schema).expect("normalize");
    for row in normalized.rows.rows() {
        assert_eq!(row.field_count(), schema.len());
        // Unmapped fields are present and empty.
        assert_eq!(row.get("City"), "");
    }
    assert_eq!(normalized.mapping.unmapped, vec!["Unrelated".to_string()]);
}

#[test]
fn normalizing_normalized_output_is_idempotent() {
    let schema = cascade_schema();
    let t = raw(
        &["ASM NAME", "RSM NAME", "SM Name", "Doctor_Name", "City"],
        &[
            &["A1", "R1", "S1", "Dr.X", "Pune"],
            &["A1", "R1", "S2", "Dr.Y", "Mumbai"],
        ],
    );
    let first = normalize(&t, &schema).expect("first pass");

    // Re-present the output as a raw table with identical labels.
    let labels: Vec<&str> = schema.field_names();
    let rows: Vec<Vec<String>> = first
        .rows
        .rows()
        .iter()
        .map(|row| labels.iter().map(|f| row.get(f).to_string()).collect())
        .collect();
    let again = RawTable::new(labels.iter().map(|s| s.to_string()).collect(), rows);
    let second = normalize(&again, &schema).expect("second pass");

    assert_eq!(second.rows.rows(), first.rows.rows());
}

#[test]
fn fuzzy_labels_map_by_keyword() {
    let schema = cascade_schema();
    let t = raw(
        &["Medical Rep", "Line Manager", "Territory", "Physician", "Location"],
        &[&["A1", "R1", "S1", "Dr.X", "Pune"]],
    );
    let normalized = normalize(&t, &schema).expect("normalize");
    assert_eq!(normalized.mapping.field_for("Medical Rep"), Some("ASM NAME"));
    assert_eq!(normalized.mapping.field_for("Line Manager"), Some("RSM NAME"));
    assert_eq!(normalized.mapping.field_for("Territory"), Some("SM Name"));
    assert_eq!(normalized.mapping.field_for("Physician"), Some("Doctor_Name"));
    assert_eq!(normalized.mapping.field_for("Location"), Some("City"));
    assert!(!normalized.mapping.positional);
}

#[test]
fn rsm_label_never_captures_the_sm_rule() {
    let schema = cascade_schema();
    let t = raw(
        &["RSM NAME", "SM Name"],
        &[&["R1", "S1"]],
    );
    let normalized = normalize(&t, &schema).expect("normalize");
    assert_eq!(normalized.mapping.field_for("RSM NAME"), Some("RSM NAME"));
    assert_eq!(normalized.mapping.field_for("SM Name"), Some("SM Name"));
}

#[test]
fn positional_fallback_assigns_in_declaration_order() {
    let schema = cascade_schema();
    let t = raw(
        &["c1", "c2", "c3", "c4", "c5", "c6"],
        &[&["A1", "R1", "S1", "X", "Pune", "extra"]],
    );
    let normalized = normalize(&t, &schema).expect("normalize");
    assert!(normalized.mapping.positional);
    assert_eq!(normalized.warnings.len(), 1);
    assert_eq!(
        normalized.mapping.field_for("c1"),
        Some("ASM NAME")
    );
    assert_eq!(normalized.mapping.field_for("c5"), Some("City"));
    assert!(matches!(
        normalized.mapping.matches[0].via,
        MatchVia::Position(0)
    ));
    let row = &normalized.rows.rows()[0];
    assert_eq!(row.get("Doctor_Name"), "X");
}

#[test]
fn flat_schema_maps_wsfa_code_column() {
    let schema = flat_schema();
    let t = raw(
        &["WSFA CODE", "HCP Name", "SM Name", "RSM NAME", "ASM NAME"],
        &[&["W001", "Dr.X", "S1", "R1", "A1"]],
    );
    let normalized = normalize(&t, &schema).expect("normalize");
    assert_eq!(normalized.mapping.field_for("WSFA CODE"), Some("WSFA CODE"));
    assert_eq!(normalized.rows.rows()[0].get("HCP Name"), "Dr.X");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Output rows always carry the full schema key set, whatever the cells hold.
    #[test]
    fn output_key_set_is_total(cells in proptest::collection::vec(any::<bool>(), 5)) {
        let schema = cascade_schema();
        let values: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(i, flag)| if *flag { format!("v{i}") } else { String::new() })
            .collect();
        let row: Vec<&str> = values.iter().map(String::as_str).collect();
        let t = raw(
            &["ASM NAME", "RSM NAME", "SM Name", "Doctor_Name", "City"],
            &[&row],
        );
        let normalized = normalize(&t, &schema).expect("normalize");
        for row in normalized.rows.rows() {
            assert_eq!(row.field_count(), schema.len());
        }
    }
}
