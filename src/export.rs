//! CSV export of feature records: attribute columns in declared order
//! followed by a `WKT` geometry column.

use anyhow::{Context, Result};
use log::info;

use crate::{cli::ExportArgs, features, io_utils, pipeline};

pub const GEOMETRY_COLUMN: &str = "WKT";

pub fn execute(args: &ExportArgs) -> Result<()> {
    let settings = crate::load_settings(&args.source)?;
    let output_path = args.output.as_deref();
    info!(
        "Exporting {:?} -> {}",
        settings.imported_file_location(),
        output_path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdout".into())
    );

    let records = pipeline::import_features(&settings)
        .with_context(|| format!("Importing {:?}", settings.imported_file_location()))?;

    let mut writer = io_utils::open_csv_writer(output_path)?;
    let mut header = features::attribute_columns(&settings.headers);
    header.push(GEOMETRY_COLUMN.to_string());
    writer.write_record(&header).context("Writing export header")?;

    for (idx, record) in records.iter().enumerate() {
        let mut fields = record
            .attributes
            .iter()
            .map(|value| value.as_display())
            .collect::<Vec<_>>();
        fields.push(record.geometry.to_wkt());
        writer
            .write_record(&fields)
            .with_context(|| format!("Writing feature {}", idx + 1))?;
    }
    writer.flush().context("Flushing export output")?;
    info!("Exported {} feature(s)", records.len());
    Ok(())
}
