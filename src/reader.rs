//! Two-phase source reading.
//!
//! Every backend runs the same contract: the first physical record registers
//! each field with [`Schema::add`] by position, the schema is marked
//! resolved, and only then is each remaining record turned into a [`Row`]
//! from the ordinals bound to output headers. Any failure aborts the whole
//! read; rows built before the failure are dropped.

use std::{
    io::Read,
    path::{Path, PathBuf},
};

use calamine::{Data, Range, Reader as _, open_workbook_auto};
use csv::ByteRecord;
use encoding_rs::{Encoding, UTF_8};
use log::{debug, info};

use crate::{
    data::{Value, cell_text},
    error::{ImportError, Result},
    io_utils,
    locator::{self, SourceFormat},
    rows::Row,
    schema::Schema,
};

/// Row/column indexed access to a rectangular grid of cells.
pub trait CellSource {
    fn row_count(&self) -> usize;
    fn column_count(&self) -> usize;
    fn cell(&self, row: usize, column: usize) -> Option<Value>;

    /// Field count of one row. Grids are rectangular unless overridden.
    fn row_width(&self, _row: usize) -> usize {
        self.column_count()
    }

    fn header_text(&self, column: usize) -> String {
        self.cell(0, column)
            .map(|value| value.as_display().trim().to_string())
            .unwrap_or_default()
    }
}

/// The first worksheet of a workbook. Indices are relative to the used
/// range, which starts at the first non-empty cell.
pub struct WorksheetCells {
    range: Range<Data>,
}

impl WorksheetCells {
    pub fn new(range: Range<Data>) -> Self {
        Self { range }
    }
}

impl CellSource for WorksheetCells {
    fn row_count(&self) -> usize {
        self.range.height()
    }

    fn column_count(&self) -> usize {
        self.range.width()
    }

    fn cell(&self, row: usize, column: usize) -> Option<Value> {
        self.range.get((row, column)).map(Value::from)
    }

    fn header_text(&self, column: usize) -> String {
        self.range.get((0, column)).map(cell_text).unwrap_or_default()
    }
}

impl CellSource for Vec<Vec<Value>> {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn column_count(&self) -> usize {
        self.first().map(Vec::len).unwrap_or(0)
    }

    fn cell(&self, row: usize, column: usize) -> Option<Value> {
        self.get(row)?.get(column).cloned()
    }

    fn row_width(&self, row: usize) -> usize {
        self.get(row).map(Vec::len).unwrap_or(0)
    }
}

pub struct Reader {
    location: PathBuf,
    encoding: &'static Encoding,
    schema: Schema,
}

impl Reader {
    pub fn new(location: impl Into<PathBuf>, schema: Schema) -> Self {
        Self {
            location: location.into(),
            encoding: UTF_8,
            schema,
        }
    }

    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn into_schema(self) -> Schema {
        self.schema
    }

    pub fn file_type(&self) -> String {
        locator::file_type(&self.location)
    }

    pub fn read(&mut self) -> Result<Vec<Row>> {
        let format = SourceFormat::from_path(&self.location)?;
        info!(
            "Reading {} source '{}'",
            format.label(),
            self.location.display()
        );
        let rows = match format {
            SourceFormat::Delimited => self.read_csv()?,
            SourceFormat::Workbook => self.read_table()?,
        };
        info!(
            "Read {} row(s) across {} bound column(s) from {:?}",
            rows.len(),
            self.schema.bound_columns()?.len(),
            self.location
        );
        Ok(rows)
    }

    pub fn read_csv(&mut self) -> Result<Vec<Row>> {
        let reader = io_utils::open_delimited_reader_from_path(&self.location)?;
        self.read_delimited(reader)
    }

    /// Runs the delimited two-phase pass over any text stream.
    pub fn read_csv_from<R: Read>(&mut self, source: R) -> Result<Vec<Row>> {
        self.read_delimited(io_utils::open_delimited_reader(source))
    }

    fn read_delimited<R: Read>(&mut self, mut reader: csv::Reader<R>) -> Result<Vec<Row>> {
        let mut record = ByteRecord::new();
        self.schema.begin_resolution();
        if self.next_record(&mut reader, &mut record)? {
            let fields = io_utils::decode_record(&record, self.encoding, 1, true)?;
            for (ordinal, name) in fields.into_iter().enumerate() {
                debug!("Source column '{name}' at ordinal {ordinal}");
                self.schema.add(name, ordinal);
            }
        }
        self.schema.mark_resolved();

        let mut rows = Vec::new();
        while self.next_record(&mut reader, &mut record)? {
            let line = record
                .position()
                .map(|pos| pos.line() as usize)
                .unwrap_or(rows.len() + 2);
            let fields = io_utils::decode_record(&record, self.encoding, line, false)?;
            let row = Row::from_record(&self.schema, line, fields.len(), |ordinal| {
                fields.get(ordinal).map(|field| Value::from(field.as_str()))
            })?;
            rows.push(row);
        }
        Ok(rows)
    }

    fn next_record<R: Read>(
        &self,
        reader: &mut csv::Reader<R>,
        record: &mut ByteRecord,
    ) -> Result<bool> {
        reader
            .read_byte_record(record)
            .map_err(|source| ImportError::Csv {
                path: self.location.clone(),
                source,
            })
    }

    pub fn read_table(&mut self) -> Result<Vec<Row>> {
        let mut workbook =
            open_workbook_auto(&self.location).map_err(|err| ImportError::Workbook {
                path: self.location.clone(),
                message: err.to_string(),
            })?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ImportError::EmptyWorkbook {
                path: self.location.clone(),
            })?
            .map_err(|err| ImportError::Workbook {
                path: self.location.clone(),
                message: err.to_string(),
            })?;
        self.read_cells(&WorksheetCells::new(range))
    }

    /// Runs the table two-phase pass over a cell grid.
    pub fn read_cells<C: CellSource + ?Sized>(&mut self, cells: &C) -> Result<Vec<Row>> {
        self.schema.begin_resolution();
        let row_count = cells.row_count();
        if row_count > 0 {
            for column in 0..cells.column_count() {
                let name = cells.header_text(column);
                debug!("Source column '{name}' at ordinal {column}");
                self.schema.add(name, column);
            }
        }
        self.schema.mark_resolved();

        (1..row_count)
            .map(|row_index| {
                let width = cells.row_width(row_index);
                Row::from_record(&self.schema, row_index + 1, width, |ordinal| {
                    cells.cell(row_index, ordinal)
                })
            })
            .collect()
    }
}
