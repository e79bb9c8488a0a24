//! Output header listing from a settings file.
//!
//! Renders each declared header's position, name, type tag, and role
//! (geometry or attribute) as an ASCII table.

use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::HeadersArgs,
    schema::{Header, HeaderType},
    settings::Settings,
    table,
};

pub fn execute(args: &HeadersArgs) -> Result<()> {
    let settings = Settings::load(&args.settings)
        .with_context(|| format!("Loading settings from {:?}", args.settings))?;

    let headers = vec![
        "#".to_string(),
        "name".to_string(),
        "type".to_string(),
        "role".to_string(),
    ];
    table::print_table(&headers, &header_rows(&settings.headers));
    info!(
        "Listed {} header(s) for a {:?} import from {:?}",
        settings.headers.len(),
        settings.shape_kind(),
        args.settings
    );
    Ok(())
}

pub fn header_rows(headers: &[Header]) -> Vec<Vec<String>> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let role = match header.tag {
                HeaderType::X => "x coordinate",
                HeaderType::Y => "y coordinate",
                HeaderType::Wkt => "shape",
                HeaderType::Attribute(_) => "attribute",
            };
            vec![
                (idx + 1).to_string(),
                header.name.clone(),
                header.tag.to_string(),
                role.to_string(),
            ]
        })
        .collect()
}
