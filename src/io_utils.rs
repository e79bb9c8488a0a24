//! I/O helpers for delimited sources and CSV export.
//!
//! - **Encoding**: input decoding via `encoding_rs`, defaulting to UTF-8.
//! - **Delimited input**: a comma splitter with quoting disabled, so an
//!   embedded comma always starts a new field.
//! - **Export**: CSV writer to a file or stdout (`-` or no path).

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::Context;
use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};

use crate::error::{ImportError, Result};

pub const SOURCE_DELIMITER: u8 = b',';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes()).ok_or_else(|| ImportError::UnknownEncoding {
            label: value.to_string(),
        })
    } else {
        Ok(UTF_8)
    }
}

/// Field splitter for delimited sources: no quoting, no escapes. Ragged
/// records get through here and are checked against the registered
/// ordinals when the row is built.
pub fn open_delimited_reader<R>(reader: R) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .delimiter(SOURCE_DELIMITER)
        .quoting(false)
        .flexible(true);
    builder.from_reader(reader)
}

pub fn open_delimited_reader_from_path(path: &Path) -> Result<csv::Reader<BufReader<File>>> {
    let file = File::open(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(open_delimited_reader(BufReader::new(file)))
}

/// Decodes one field. Only the very first field of a source may carry a
/// byte order mark; `leading` strips it there and nowhere else.
pub fn decode_bytes(
    bytes: &[u8],
    encoding: &'static Encoding,
    line: usize,
    leading: bool,
) -> Result<String> {
    let (text, had_errors) = if leading {
        encoding.decode_with_bom_removal(bytes)
    } else {
        encoding.decode_without_bom_handling(bytes)
    };
    if had_errors {
        Err(ImportError::Decode {
            line,
            encoding: encoding.name().to_string(),
        })
    } else {
        Ok(text.into_owned())
    }
}

/// Decodes and trims every field of a record. `first` marks the first
/// record of the source.
pub fn decode_record(
    record: &csv::ByteRecord,
    encoding: &'static Encoding,
    line: usize,
    first: bool,
) -> Result<Vec<String>> {
    record
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            decode_bytes(field, encoding, line, first && idx == 0)
                .map(|text| text.trim().to_string())
        })
        .collect()
}

pub fn open_csv_writer(path: Option<&Path>) -> anyhow::Result<csv::Writer<Box<dyn Write>>> {
    let writer: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(std::io::stdout()),
    };

    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(SOURCE_DELIMITER)
        .quote_style(QuoteStyle::Always)
        .double_quote(true);
    Ok(builder.from_writer(writer))
}
