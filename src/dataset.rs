//! # Dataset Module
//!
//! Streams the ingredient field out of a recipe dataset, one row at a time.
//!
//! Two encodings are supported:
//!
//! - **CSV** with a header row. The ingredient column is found by name; each
//!   cell becomes an [`IngredientField`] via [`IngredientField::from_cell`].
//! - **JSON Lines**, one object per line. The column's value goes through
//!   [`IngredientField::from_json`], so native arrays arrive already split.
//!
//! Rows that cannot be interpreted are yielded as [`IngredientField::Absent`]
//! and counted as malformed. Only I/O failures on the input are fatal.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{debug, info, warn};
use serde_json::Value;

use crate::errors::ExtractionError;
use crate::record_extractor::IngredientField;

/// Encoding of the input dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    JsonLines,
}

impl InputFormat {
    /// Guess the format from a file extension; anything unrecognised is CSV
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("jsonl") | Some("ndjson") => InputFormat::JsonLines,
            _ => InputFormat::Csv,
        }
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(InputFormat::Csv),
            "jsonl" | "ndjson" | "json-lines" => Ok(InputFormat::JsonLines),
            other => Err(format!("unknown input format '{other}' (expected csv or jsonl)")),
        }
    }
}

/// Counters kept while reading rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatasetStats {
    /// Data rows read (header and blank lines excluded)
    pub rows_read: u64,
    /// Rows whose ingredient field could not be located or decoded
    pub malformed_rows: u64,
}

enum RowSource<R: Read> {
    Csv {
        reader: csv::Reader<R>,
        column: usize,
        record: csv::ByteRecord,
    },
    JsonLines {
        reader: BufReader<R>,
        column: String,
        line: Vec<u8>,
    },
    Exhausted,
}

/// Iterator over the ingredient fields of a dataset
///
/// Yields `Err` at most once, for an I/O failure, and then stops.
pub struct DatasetRows<R: Read> {
    source: RowSource<R>,
    path: PathBuf,
    column_found: bool,
    stats: DatasetStats,
}

/// Open a dataset file and position it at the first data row
///
/// A missing or unreadable file is fatal. A CSV file without the ingredient
/// column is not: it yields no rows and [`DatasetRows::column_found`] reports it.
pub fn open_dataset(
    path: &Path,
    format: InputFormat,
    column: &str,
) -> Result<DatasetRows<File>, ExtractionError> {
    info!("Opening {:?} dataset at: {}", format, path.display());
    let file = File::open(path).map_err(|e| ExtractionError::input(path, e))?;
    DatasetRows::from_reader(file, format, column, path)
}

impl<R: Read> DatasetRows<R> {
    /// Wrap any reader. `label` is only used in log and error messages.
    pub fn from_reader(
        reader: R,
        format: InputFormat,
        column: &str,
        label: impl Into<PathBuf>,
    ) -> Result<Self, ExtractionError> {
        let path = label.into();

        let (source, column_found) = match format {
            InputFormat::Csv => {
                let mut reader = csv::ReaderBuilder::new()
                    .has_headers(true)
                    .flexible(true) // Allow rows with different lengths
                    .from_reader(reader);

                let headers: Vec<String> = reader
                    .byte_headers()
                    .map_err(|e| ExtractionError::input(&path, io::Error::from(e)))?
                    .iter()
                    .map(|h| String::from_utf8_lossy(h).trim().to_string())
                    .collect();
                debug!("Dataset columns: {:?}", headers);

                match headers.iter().position(|h| h == column) {
                    Some(index) => (
                        RowSource::Csv {
                            reader,
                            column: index,
                            record: csv::ByteRecord::new(),
                        },
                        true,
                    ),
                    None => {
                        warn!(
                            "Column '{}' not found in {}; available columns: {:?}. No rows will be processed",
                            column,
                            path.display(),
                            headers
                        );
                        (RowSource::Exhausted, false)
                    }
                }
            }
            InputFormat::JsonLines => (
                RowSource::JsonLines {
                    reader: BufReader::new(reader),
                    column: column.to_string(),
                    line: Vec::new(),
                },
                true,
            ),
        };

        Ok(Self {
            source,
            path,
            column_found,
            stats: DatasetStats::default(),
        })
    }

    /// Whether the ingredient column exists (always true for JSON Lines)
    pub fn column_found(&self) -> bool {
        self.column_found
    }

    /// Counters for the rows read so far
    pub fn stats(&self) -> DatasetStats {
        self.stats
    }
}

fn read_csv_row<R: Read>(
    reader: &mut csv::Reader<R>,
    column: usize,
    record: &mut csv::ByteRecord,
    stats: &mut DatasetStats,
) -> Option<io::Result<IngredientField>> {
    match reader.read_byte_record(record) {
        Ok(false) => None,
        Ok(true) => {
            stats.rows_read += 1;
            match record.get(column) {
                Some(cell) => Some(Ok(IngredientField::from_cell(&String::from_utf8_lossy(cell)))),
                None => {
                    stats.malformed_rows += 1;
                    Some(Ok(IngredientField::Absent))
                }
            }
        }
        Err(e) if e.is_io_error() => Some(Err(io::Error::from(e))),
        Err(e) => {
            debug!("Skipping malformed CSV record: {}", e);
            stats.rows_read += 1;
            stats.malformed_rows += 1;
            Some(Ok(IngredientField::Absent))
        }
    }
}

fn read_json_row<R: Read>(
    reader: &mut BufReader<R>,
    column: &str,
    line: &mut Vec<u8>,
    stats: &mut DatasetStats,
) -> Option<io::Result<IngredientField>> {
    loop {
        line.clear();
        match reader.read_until(b'\n', line) {
            Ok(0) => return None,
            Ok(_) => {
                let text = String::from_utf8_lossy(line);
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                stats.rows_read += 1;

                let field = match serde_json::from_str::<Value>(text) {
                    Ok(Value::Object(mut object)) => object
                        .remove(column)
                        .map_or(IngredientField::Absent, IngredientField::from_json),
                    Ok(_) | Err(_) => {
                        stats.malformed_rows += 1;
                        IngredientField::Absent
                    }
                };
                return Some(Ok(field));
            }
            Err(e) => return Some(Err(e)),
        }
    }
}

impl<R: Read> Iterator for DatasetRows<R> {
    type Item = Result<IngredientField, ExtractionError>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = match &mut self.source {
            RowSource::Csv {
                reader,
                column,
                record,
            } => read_csv_row(reader, *column, record, &mut self.stats),
            RowSource::JsonLines {
                reader,
                column,
                line,
            } => read_json_row(reader, column, line, &mut self.stats),
            RowSource::Exhausted => None,
        };

        match row {
            Some(Ok(field)) => Some(Ok(field)),
            Some(Err(e)) => {
                self.source = RowSource::Exhausted;
                Some(Err(ExtractionError::input(&self.path, e)))
            }
            None => {
                self.source = RowSource::Exhausted;
                None
            }
        }
    }
}
