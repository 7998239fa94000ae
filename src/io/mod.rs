//! I/O module
//!
//! Handles CSV parsing and output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (row conversion, report serialization)
//! - `reader` - Streaming command reader with iterator interface

pub mod csv_format;
pub mod reader;

pub use csv_format::{convert_command_row, write_balances_csv, write_history_csv, CommandRow};
pub use reader::{CommandReader, ParsedRow};
