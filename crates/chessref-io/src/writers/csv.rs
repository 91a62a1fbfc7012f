//! Table export as CSV: one header row in canonical column order, then one
//! row per record.

use std::io::Write;
use std::path::Path;

use chessref_core::config::Config;
use chessref_core::table::Table;

use crate::error::Result;
use crate::writers::create_file;

pub struct CsvWriter<W: Write> {
    writer: ::csv::Writer<W>,
    rows_written: usize,
}

impl CsvWriter<std::fs::File> {
    pub fn to_path(path: impl AsRef<Path>, cfg: &Config) -> Result<Self> {
        let f = create_file(path.as_ref())?;
        Self::to_writer(f, cfg)
    }
}

impl<W: Write> CsvWriter<W> {
    /// Wrap `writer`; the byte-order mark (if configured) is written immediately.
    pub fn to_writer(mut writer: W, cfg: &Config) -> Result<Self> {
        if cfg.write_bom {
            writer.write_all(b"\xEF\xBB\xBF")?;
        }
        let writer = ::csv::WriterBuilder::new()
            .delimiter(cfg.delimiter)
            .from_writer(writer);
        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    /// Write header and rows. Fails on a table without records, since it has
    /// no header to write.
    pub fn write_table(&mut self, table: &Table) -> Result<()> {
        let header = table.header()?;
        self.writer.write_record(&header)?;
        for record in table {
            self.writer
                .write_record(record.values().map(|v| v.to_string()))?;
            self.rows_written += 1;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::error::Error::Io(e.into_error()))
    }
}

/// Export `table` to `path` with the writer settings from `cfg`. A table
/// without records fails before `path` is created.
pub fn write_csv(table: &Table, path: impl AsRef<Path>, cfg: &Config) -> Result<()> {
    let path = path.as_ref();
    table.header()?;
    let mut w = CsvWriter::to_path(path, cfg)?;
    w.write_table(table)?;
    tracing::debug!(path = %path.display(), rows = w.rows_written(), "wrote csv");
    Ok(())
}
