use std::io::{self, Write};

use anyhow::{Context, Result};
use log::info;

use crate::{cli::ReadArgs, pipeline, settings::Settings, table};

pub fn execute(args: &ReadArgs) -> Result<()> {
    let settings = crate::load_settings(&args.source)?;
    let rows = pipeline::import(&settings)
        .with_context(|| format!("Reading {:?}", settings.imported_file_location()))?;
    let shown = args.limit.unwrap_or(rows.len()).min(rows.len());

    if args.json {
        let mut out = io::stdout().lock();
        for row in &rows[..shown] {
            serde_json::to_writer(&mut out, row).context("Writing row JSON")?;
            writeln!(out)?;
        }
    } else {
        let headers = header_names(&settings);
        let cells = rows[..shown]
            .iter()
            .map(|row| row.values().map(|(_, value)| value.as_display()).collect())
            .collect::<Vec<Vec<String>>>();
        table::print_table(&headers, &cells);
    }
    info!(
        "Displayed {shown} of {} row(s) from {:?}",
        rows.len(),
        settings.imported_file_location()
    );
    Ok(())
}

fn header_names(settings: &Settings) -> Vec<String> {
    settings.headers.iter().map(|h| h.name.clone()).collect()
}
