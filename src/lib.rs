pub mod cli;
pub mod columns;
pub mod data;
pub mod error;
pub mod export;
pub mod features;
pub mod io_utils;
pub mod locator;
pub mod pipeline;
pub mod preview;
pub mod reader;
pub mod rows;
pub mod schema;
pub mod settings;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug};

use crate::{
    cli::{Cli, Commands, SourceArgs},
    settings::Settings,
};

pub use crate::{
    data::Value,
    error::ImportError,
    reader::Reader,
    rows::Row,
    schema::{Header, HeaderType, Schema},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("shape_import", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Headers(args) => columns::execute(&args),
        Commands::Read(args) => preview::execute(&args),
        Commands::Export(args) => export::execute(&args),
    }
}

/// Loads settings and applies command-line overrides.
pub(crate) fn load_settings(args: &SourceArgs) -> Result<Settings> {
    let mut settings = Settings::load(&args.settings)
        .with_context(|| format!("Loading settings from {:?}", args.settings))?;
    if let Some(source) = &args.source {
        debug!("Overriding source with {source:?}");
        settings.source = source.clone();
    }
    if let Some(label) = &args.input_encoding {
        settings.encoding = Some(label.clone());
    }
    Ok(settings)
}
