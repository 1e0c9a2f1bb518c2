//! CLI argument definitions for rxcap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "rxcap",
    version,
    about = "rxcap - spreadsheet-to-selection-funnel engine",
    long_about = "Map an unpredictable roster spreadsheet onto a fixed schema and drive\n\
                  the cascading selection funnel: inspect header mappings, list candidate\n\
                  values, filter searchable codes, and resolve submission payloads."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the built-in schemas and their fields.
    Fields,

    /// Infer and print the header mapping for a table.
    Inspect(InspectArgs),

    /// List candidate values for the next cascade level.
    Values(ValuesArgs),

    /// Filter the flat searchable-code list.
    Codes(CodesArgs),

    /// Resolve a completed selection to its enrichment fields.
    Resolve(ResolveArgs),

    /// Assemble the submission payload for a completed selection.
    Payload(PayloadArgs),
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum SchemaArg {
    /// Four-level cascade: ASM -> RSM -> SM -> Doctor, City derived.
    #[default]
    Cascade,
    /// Flat searchable WSFA code, manager fields derived.
    Flat,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Path to the roster CSV file.
    #[arg(value_name = "TABLE")]
    pub table: PathBuf,

    /// Schema to map the table onto.
    #[arg(long = "schema", value_enum, default_value = "cascade")]
    pub schema: SchemaArg,

    /// Print the mapping report as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct ValuesArgs {
    /// Path to the roster CSV file.
    #[arg(value_name = "TABLE")]
    pub table: PathBuf,

    /// Schema to map the table onto.
    #[arg(long = "schema", value_enum, default_value = "cascade")]
    pub schema: SchemaArg,

    /// Selections applied in cascade order (repeat per level).
    #[arg(long = "select", value_name = "VALUE")]
    pub select: Vec<String>,
}

#[derive(Parser)]
pub struct CodesArgs {
    /// Path to a code-list JSON document or a roster CSV file.
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Case-insensitive substring query.
    #[arg(long = "query", value_name = "TEXT", default_value = "")]
    pub query: String,
}

#[derive(Parser)]
pub struct ResolveArgs {
    /// Path to the roster CSV file.
    #[arg(value_name = "TABLE")]
    pub table: PathBuf,

    /// Schema to map the table onto.
    #[arg(long = "schema", value_enum, default_value = "cascade")]
    pub schema: SchemaArg,

    /// Selections applied in cascade order (repeat per level), or the
    /// single code for the flat schema.
    #[arg(long = "select", value_name = "VALUE", required = true)]
    pub select: Vec<String>,
}

#[derive(Parser)]
pub struct PayloadArgs {
    #[command(flatten)]
    pub resolve: ResolveArgs,

    /// Prescription date to attach to the payload.
    #[arg(long = "rx-date", value_name = "DATE")]
    pub rx_date: String,

    /// Uploaded-file reference URL to attach to the payload.
    #[arg(long = "file-url", value_name = "URL", default_value = "")]
    pub file_url: String,
}
