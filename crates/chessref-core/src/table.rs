//! Homogeneous, ordered collections of records.
//!
//! Every record in a `Table` carries exactly the columns of `schema`, in
//! schema order. `from_records` enforces this once at construction, so
//! operators can rely on it without re-checking per row.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::Record;
use crate::schema::Schema;
use crate::types::Scalar;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    schema: Schema,
    records: Vec<Record>,
}

impl Table {
    /// A table with no records and no columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A table with a known column layout but no records yet.
    pub fn with_schema(schema: Schema) -> Self {
        Self {
            schema,
            records: Vec::new(),
        }
    }

    /// Build from records. The first record fixes the canonical column order;
    /// later records must expose the same column set and are reordered to it.
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        let schema = match records.first() {
            Some(first) => first.columns().collect::<Schema>(),
            None => return Ok(Self::empty()),
        };
        Self::from_parts(schema, records)
    }

    /// Build from an explicit schema; each record must carry exactly its columns.
    pub fn from_parts(schema: Schema, records: Vec<Record>) -> Result<Self> {
        let mut normalised = Vec::with_capacity(records.len());
        for (row, record) in records.into_iter().enumerate() {
            normalised.push(conform(&schema, record, row)?);
        }
        Ok(Self {
            schema,
            records: normalised,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Canonical column order. Undefined for a table without records.
    pub fn header(&self) -> Result<Vec<String>> {
        if self.records.is_empty() {
            return Err(Error::EmptyTable);
        }
        Ok(self.schema.columns.clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Result<Vec<&Scalar>> {
        self.require(name)?;
        self.records.iter().map(|r| r.try_get(name)).collect()
    }

    /// Fail with a schema error unless `name` is a column of a non-empty table.
    /// Tables without records accept any name: there is no row to violate it.
    pub fn require(&self, name: &str) -> Result<()> {
        if self.records.is_empty() || self.schema.contains(name) {
            Ok(())
        } else {
            Err(Error::missing_column(name))
        }
    }

    /// Rename a column on every record in place.
    pub fn rename_column(&mut self, old: &str, new: &str) -> Result<()> {
        if self.records.is_empty() && !self.schema.contains(old) {
            return Ok(());
        }
        let idx = self
            .schema
            .index_of(old)
            .ok_or_else(|| Error::missing_column(old))?;
        for record in &mut self.records {
            record.rename(old, new)?;
        }
        if old != new {
            self.schema.columns[idx] = new.to_string();
            if let Some(dup) = self
                .schema
                .columns
                .iter()
                .enumerate()
                .position(|(i, c)| i != idx && c == new)
            {
                self.schema.columns.remove(dup);
            }
        }
        Ok(())
    }

    /// Write one value per record into `name`: overwritten in place when the
    /// column exists, appended as the last column otherwise.
    pub fn set_column(&mut self, name: &str, values: Vec<Scalar>) -> Result<()> {
        if values.len() != self.records.len() {
            return Err(Error::Invariant(format!(
                "column '{}' has {} values for {} records",
                name,
                values.len(),
                self.records.len()
            )));
        }
        for (record, value) in self.records.iter_mut().zip(values) {
            record.set(name, value);
        }
        if !self.schema.contains(name) {
            self.schema.columns.push(name.to_string());
        }
        Ok(())
    }

    /// Keep the records for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&Record) -> bool) {
        self.records.retain(|r| keep(r));
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn conform(schema: &Schema, record: Record, row: usize) -> Result<Record> {
    let same_set =
        record.len() == schema.len() && schema.iter().all(|c| record.contains(c));
    if !same_set {
        return Err(Error::Schema(format!(
            "record {} has columns [{}], expected [{}]",
            row,
            record.columns().collect::<Vec<_>>().join(", "),
            schema.columns.join(", ")
        )));
    }
    if record.columns().eq(schema.iter()) {
        return Ok(record);
    }
    record.select(&schema.columns)
}
