//! Header-having CSV into a `Table`.
//!
//! The first row names the columns. A UTF-8 byte-order mark in front of it
//! is dropped. Rows shorter than the header are padded with `Null`; longer
//! rows are rejected.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chessref_core::config::Config;
use chessref_core::record::Record;
use chessref_core::schema::Schema;
use chessref_core::table::Table;
use chessref_core::types::Scalar;

use crate::error::{Error, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone)]
pub struct CsvReader {
    pub delimiter: u8,
    pub infer_types: bool,
    pub empty_as_null: bool,
}

impl Default for CsvReader {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl CsvReader {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            delimiter: cfg.delimiter,
            infer_types: cfg.infer_types,
            empty_as_null: cfg.empty_as_null,
        }
    }

    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<Table> {
        let path = path.as_ref();
        let table = self.read(File::open(path)?)?;
        tracing::debug!(path = %path.display(), rows = table.len(), columns = table.schema().len(), "loaded csv");
        Ok(table)
    }

    pub fn read<R: Read>(&self, mut reader: R) -> Result<Table> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes[..]);

        let mut rdr = ::csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(body);

        let header: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let schema = Schema::new(header);

        let mut records = Vec::new();
        for (line, row) in rdr.records().enumerate() {
            let row = row?;
            if row.len() > schema.len() {
                return Err(Error::Format(format!(
                    "row {} has {} fields, header has {}",
                    line + 1,
                    row.len(),
                    schema.len()
                )));
            }
            let mut record = Record::with_capacity(schema.len());
            for (i, name) in schema.iter().enumerate() {
                let value = row.get(i).map_or(Scalar::Null, |raw| self.cell(raw));
                record.set(name, value);
            }
            records.push(record);
        }

        Ok(Table::from_parts(schema, records)?)
    }

    fn cell(&self, raw: &str) -> Scalar {
        if raw.is_empty() && self.empty_as_null {
            Scalar::Null
        } else if self.infer_types {
            Scalar::infer(raw)
        } else {
            Scalar::Str(raw.to_string())
        }
    }
}

/// Load a CSV file with the reader settings from `cfg`.
pub fn read_csv(path: impl AsRef<Path>, cfg: &Config) -> Result<Table> {
    CsvReader::from_config(cfg).read_path(path)
}
