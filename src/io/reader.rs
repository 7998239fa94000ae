//! Streaming CSV command reader
//!
//! Provides an iterator over the command rows of a replay file. Delegates
//! CSV format concerns to the csv_format module.
//!
//! # Error Handling
//!
//! - Opening the file and reading the header are fatal and returned from
//!   the constructor
//! - A row whose CSV structure cannot be read is fatal and yielded as
//!   `Err(ReplayError)`
//! - A row that is well-formed CSV but fails validation is yielded as a
//!   [`ParsedRow`] carrying the `LedgerError`, so the caller can log it and
//!   move on
//!
//! Rows are read one at a time; memory use does not grow with the file.

use crate::io::csv_format::{convert_command_row, CommandRow};
use crate::types::{LedgerCommand, LedgerError, ReplayError};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// One data row of the input with its line number
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    /// 1-based line in the input file (the header is line 1)
    pub line: u64,
    pub command: Result<LedgerCommand, LedgerError>,
}

/// Streaming reader over command rows
#[derive(Debug)]
pub struct CommandReader<R> {
    reader: csv::Reader<R>,
    headers: StringRecord,
    record: StringRecord,
}

impl CommandReader<File> {
    /// Open a replay file
    ///
    /// # Errors
    ///
    /// - `FileNotFound` if `path` does not exist
    /// - `Io` if the file cannot be opened
    /// - `Csv` if the header row cannot be read
    pub fn from_path(path: &Path) -> Result<Self, ReplayError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ReplayError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ReplayError::from(e),
        })?;

        Self::from_reader(file)
    }
}

impl<R: Read> CommandReader<R> {
    /// Wrap any reader producing CSV text
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (trailing optional columns may be omitted)
    pub fn from_reader(input: R) -> Result<Self, ReplayError> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(input);

        let headers = reader.headers()?.clone();

        Ok(Self {
            reader,
            headers,
            record: StringRecord::new(),
        })
    }
}

impl<R: Read> Iterator for CommandReader<R> {
    type Item = Result<ParsedRow, ReplayError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => {
                let line = self
                    .record
                    .position()
                    .map(|position| position.line())
                    .unwrap_or_default();

                let row = match self.record.deserialize::<CommandRow>(Some(&self.headers)) {
                    Ok(row) => row,
                    Err(e) => return Some(Err(ReplayError::from(e))),
                };

                Some(Ok(ParsedRow {
                    line,
                    command: convert_command_row(&row),
                }))
            }
            Err(e) => Some(Err(ReplayError::from(e))),
        }
    }
}
