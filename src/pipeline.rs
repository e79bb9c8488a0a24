use log::info;

use crate::{
    error::Result,
    features::{FeatureRecord, attribute_columns},
    reader::Reader,
    rows::Row,
    settings::Settings,
};

/// Builds a schema and reader from `settings` and reads every row.
pub fn import(settings: &Settings) -> Result<Vec<Row>> {
    let encoding = settings.input_encoding()?;
    let mut reader =
        Reader::new(settings.imported_file_location(), settings.schema()).with_encoding(encoding);
    reader.read()
}

/// Imports and converts every row into a feature record for the sink.
pub fn import_features(settings: &Settings) -> Result<Vec<FeatureRecord>> {
    let rows = import(settings)?;
    let kind = settings.shape_kind();
    let columns = attribute_columns(&settings.headers);
    info!(
        "Building {} {:?} feature(s) with {} attribute column(s)",
        rows.len(),
        kind,
        columns.len()
    );
    rows.iter()
        .map(|row| FeatureRecord::from_row(row, kind, &columns))
        .collect()
}
