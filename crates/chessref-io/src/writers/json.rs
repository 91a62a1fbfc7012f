//! JSON export.
//!
//! Tables become an array of objects whose keys follow the canonical column
//! order (serialized directly rather than through `serde_json::Map`, which
//! would sort them). Move trees and other `Serialize` values are written
//! as-is.

use std::io::Write;
use std::path::Path;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use chessref_core::record::Record;
use chessref_core::table::Table;
use chessref_core::types::Scalar;

use crate::error::Result;
use crate::writers::create_file;

/// Serialize adapter: a table as `[{"col": value, ...}, ...]`.
pub struct TableJson<'a>(pub &'a Table);

struct RecordJson<'a>(&'a Record);

struct ScalarJson<'a>(&'a Scalar);

impl Serialize for TableJson<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for record in self.0 {
            seq.serialize_element(&RecordJson(record))?;
        }
        seq.end()
    }
}

impl Serialize for RecordJson<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in self.0.iter() {
            map.serialize_entry(name, &ScalarJson(value))?;
        }
        map.end()
    }
}

impl Serialize for ScalarJson<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.0 {
            Scalar::Null => serializer.serialize_none(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Int(i) => serializer.serialize_i64(*i),
            Scalar::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            Scalar::Float(_) => serializer.serialize_none(),
            Scalar::Str(s) => serializer.serialize_str(s),
        }
    }
}

/// Pretty-print `value` as JSON into `writer`.
pub fn to_json_writer<W: Write, T: Serialize + ?Sized>(mut writer: W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write any serializable value (a move tree node list, typically) to `path`.
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    to_json_writer(std::io::BufWriter::new(create_file(path)?), value)?;
    tracing::debug!(path = %path.display(), "wrote json");
    Ok(())
}

/// Write `table` to `path` as an array of objects.
pub fn write_table_json(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    write_json(&TableJson(table), path)
}
