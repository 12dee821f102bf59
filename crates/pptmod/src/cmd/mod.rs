use clap::{Args, Subcommand};
use std::path::PathBuf;

use pptmod_frame::FieldTable;

use crate::exit::{table_error, CliResult};
use crate::output::OutputFormat;

pub mod decode;
pub mod fields;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode captured frames and print their measurements.
    Decode(DecodeArgs),
    /// Print the active field table.
    Fields(FieldsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub struct RunContext {
    pub format: OutputFormat,
    /// Attach the per-field tracing observer to every decoded frame.
    pub trace_fields: bool,
}

pub fn run(command: Command, ctx: &RunContext) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, ctx),
        Command::Fields(args) => fields::run(args, ctx.format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug, Default)]
pub struct TableArgs {
    /// JSON field table to decode with instead of the built-in register map.
    #[arg(long, value_name = "FILE", env = "PPTMOD_TABLE")]
    pub table: Option<PathBuf>,
}

impl TableArgs {
    pub fn load(&self) -> CliResult<FieldTable> {
        match &self.table {
            Some(path) => {
                let table = FieldTable::from_path(path).map_err(|err| {
                    table_error(&format!("failed loading table {}", path.display()), err)
                })?;
                tracing::info!(path = %path.display(), fields = table.len(), "using field table");
                Ok(table)
            }
            None => Ok(FieldTable::modulator()),
        }
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Frame capture to read ("-" or omitted for stdin).
    pub input: Option<PathBuf>,
    /// Decode a single frame given as hex text instead of reading a capture.
    #[arg(long, conflicts_with = "input")]
    pub hex: Option<String>,
    /// Stop after N frames.
    #[arg(long)]
    pub count: Option<u64>,
    /// Ignore a trailing partial frame instead of failing.
    #[arg(long)]
    pub skip_truncated: bool,
    #[command(flatten)]
    pub table: TableArgs,
}

#[derive(Args, Debug)]
pub struct FieldsArgs {
    #[command(flatten)]
    pub table: TableArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
