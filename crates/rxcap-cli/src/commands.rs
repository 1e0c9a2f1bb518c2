use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use comfy_table::Table;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use tracing::warn;

use rxcap_cli::source::load_code_list;
use rxcap_engine::{LoadReport, PayloadInput, SearchView, SelectOutcome, Session, build_payload};
use rxcap_ingest::read_raw_table;
use rxcap_map::normalize;
use rxcap_model::{FieldRole, FullKey, MatchVia, Schema, cascade_schema, flat_schema};

use crate::cli::{CodesArgs, InspectArgs, PayloadArgs, ResolveArgs, SchemaArg, ValuesArgs};

fn schema_for(arg: SchemaArg) -> Schema {
    match arg {
        SchemaArg::Cascade => cascade_schema(),
        SchemaArg::Flat => flat_schema(),
    }
}

pub fn run_fields() -> Result<()> {
    print_schema_fields("cascade", &cascade_schema());
    println!();
    print_schema_fields("flat", &flat_schema());
    Ok(())
}

fn print_schema_fields(name: &str, schema: &Schema) {
    println!("schema: {name}");
    let mut table = Table::new();
    table.set_header(vec!["Field", "Form name", "Role", "Keywords", "Excludes"]);
    apply_table_style(&mut table);
    for field in schema.fields() {
        table.add_row(vec![
            field.name.clone(),
            field.form_name.clone(),
            role_label(field.role).to_string(),
            field.match_terms.join(", "),
            field.exclude_terms.join(", "),
        ]);
    }
    println!("{table}");
}

fn role_label(role: FieldRole) -> &'static str {
    match role {
        FieldRole::CascadeLevel => "cascade level",
        FieldRole::FreeTextKey => "searchable key",
        FieldRole::PayloadOnly => "payload only",
    }
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let schema = schema_for(args.schema);
    let raw = read_raw_table(&args.table)
        .with_context(|| format!("read table {}", args.table.display()))?;
    let normalized = normalize(&raw, &schema)
        .with_context(|| format!("map table {}", args.table.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&normalized.mapping)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Source label", "Field", "Matched via"]);
    apply_table_style(&mut table);
    for m in &normalized.mapping.matches {
        table.add_row(vec![
            m.source_label.clone(),
            m.field.clone(),
            match_via_label(&m.via),
        ]);
    }
    println!("{table}");
    if !normalized.mapping.unmapped.is_empty() {
        println!("unmapped fields: {}", normalized.mapping.unmapped.join(", "));
    }
    if normalized.mapping.header_row_dropped {
        println!("first row treated as header and dropped");
    }
    for warning in &normalized.warnings {
        println!("warning: {warning}");
    }
    println!("{} data row(s)", normalized.rows.rows().len());
    Ok(())
}

fn match_via_label(via: &MatchVia) -> String {
    match via {
        MatchVia::ExactName => "exact name".to_string(),
        MatchVia::Keyword(term) => format!("keyword \"{term}\""),
        MatchVia::CellValue(term) => format!("cell value \"{term}\""),
        MatchVia::Position(index) => format!("column position {index}"),
    }
}

pub fn run_values(args: &ValuesArgs) -> Result<()> {
    let schema = schema_for(args.schema);
    if schema.cascade_fields().is_empty() {
        bail!("the selected schema has no cascade levels; use `codes` instead");
    }
    let (mut session, _) = load_session(&args.table, schema)?;
    let outcome = apply_selections(&mut session, &args.select)?;

    match outcome {
        Some(SelectOutcome::Complete) => {
            println!("selection complete");
            if let Some(key) = session.full_key() {
                print_key(&key);
            }
        }
        _ => {
            // A trailing empty --select clears levels, so ask the session
            // where the cascade actually stands.
            let depth = session.selection().depth();
            let field = session
                .schema()
                .cascade_field(depth)
                .map(|f| f.name.clone())
                .unwrap_or_default();
            let values = session.candidates(depth)?;
            println!("{field} ({} value(s)):", values.len());
            for value in values {
                println!("  {value}");
            }
        }
    }
    Ok(())
}

pub fn run_codes(args: &CodesArgs) -> Result<()> {
    let codes = load_code_list(&args.source)?;
    let view = SearchView::new(&codes, &args.query);
    if view.zero_match {
        warn!(query = %view.query, "no code matches the query");
    }
    for code in &view.matches {
        println!("{code}");
    }
    println!("{} of {} code(s)", view.matches.len(), codes.len());
    Ok(())
}

pub fn run_resolve(args: &ResolveArgs) -> Result<()> {
    let (session, key) = resolve_key(args)?;
    let resolution = session.enrichment(&key);

    print_key(&key);
    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    apply_table_style(&mut table);
    for (field, value) in &resolution.payload {
        table.add_row(vec![field.clone(), value.clone()]);
    }
    println!("{table}");
    if !resolution.found {
        println!("no row matches the selection; enrichment fields are blank");
    }
    if resolution.duplicates > 0 {
        println!(
            "{} duplicate row(s) for this key; first occurrence used",
            resolution.duplicates
        );
    }
    Ok(())
}

pub fn run_payload(args: &PayloadArgs) -> Result<()> {
    let (session, key) = resolve_key(&args.resolve)?;
    let resolution = session.enrichment(&key);
    let payload = build_payload(
        session.schema(),
        &PayloadInput {
            key: &key,
            resolution: &resolution,
            rx_date: &args.rx_date,
            file_url: &args.file_url,
        },
        Utc::now(),
    );
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

/// Loads the table and applies `--select` values, returning the session and
/// the completed key. Flat schemas take a single code; cascade schemas take
/// one value per level in order.
fn resolve_key(args: &ResolveArgs) -> Result<(Session, FullKey)> {
    let schema = schema_for(args.schema);
    let flat = schema.cascade_fields().is_empty();
    let (mut session, _) = load_session(&args.table, schema)?;

    if flat {
        let [code] = args.select.as_slice() else {
            bail!("the flat schema takes exactly one --select value (the code)");
        };
        if !session.codes().iter().any(|c| c == code) {
            bail!("unknown code {code:?}");
        }
        let key = session
            .key_for_code(code)
            .context("build key from code")?;
        return Ok((session, key));
    }

    apply_selections(&mut session, &args.select)?;
    let selected = session.selection().depth();
    let levels = session.schema().cascade_fields().len();
    let Some(key) = session.full_key() else {
        bail!("selection incomplete: {selected} of {levels} level(s) selected");
    };
    Ok((session, key))
}

fn apply_selections(session: &mut Session, values: &[String]) -> Result<Option<SelectOutcome>> {
    let mut outcome = None;
    for (depth, value) in values.iter().enumerate() {
        outcome = Some(
            session
                .select_field(depth, value)
                .with_context(|| format!("select {value:?} at level {depth}"))?,
        );
    }
    Ok(outcome)
}

fn load_session(path: &Path, schema: Schema) -> Result<(Session, LoadReport)> {
    let raw =
        read_raw_table(path).with_context(|| format!("read table {}", path.display()))?;
    let mut session = Session::new(schema);
    let report = session
        .load_table(&raw)
        .with_context(|| format!("map table {}", path.display()))?;
    Ok((session, report))
}

fn print_key(key: &FullKey) {
    for (field, value) in key.entries() {
        println!("{field}: {value}");
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(comfy_table::ContentArrangement::Dynamic)
        .set_width(120);
}
