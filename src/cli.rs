use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Import tabular sources into point and shape features", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the output headers declared in a settings file
    Headers(HeadersArgs),
    /// Read the source and display the schema-bound rows
    Read(ReadArgs),
    /// Export attribute columns plus a WKT geometry column as CSV
    Export(ExportArgs),
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Settings file (YAML) declaring the source and output headers
    #[arg(short, long)]
    pub settings: PathBuf,
    /// Read this source instead of the one named in the settings
    #[arg(long)]
    pub source: Option<PathBuf>,
    /// Character encoding of a delimited source (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct HeadersArgs {
    /// Settings file (YAML) declaring the output headers
    #[arg(short, long)]
    pub settings: PathBuf,
}

#[derive(Debug, Args)]
pub struct ReadArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Limit number of rows displayed
    #[arg(long)]
    pub limit: Option<usize>,
    /// Emit one JSON object per row instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Output CSV file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}
