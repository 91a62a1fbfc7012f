#![forbid(unsafe_code)]
//! chessref-io: the file boundary.
//!
//! - `readers::csv`: header-having CSV into a `Table`.
//! - `writers::csv`: a `Table` back out as CSV, header first.
//! - `writers::json`: tables as arrays of objects, and any `Serialize` value
//!   (move tree node lists in practice) as pretty JSON.
//!
//! Everything is fully materialized; reference tables are small.

pub mod error;
pub mod readers;
pub mod writers;

pub use error::{Error, Result};
pub use readers::csv::{read_csv, CsvReader};
pub use writers::csv::{write_csv, CsvWriter};
pub use writers::json::{to_json_writer, write_json, write_table_json, TableJson};
