//! Ordered key-value rows.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Scalar;

/// Build a [`Record`] from `name => value` pairs; values go through `Scalar::from`.
///
/// ```
/// use chessref_core::record;
/// let r = record! { "country" => "RUS", "count" => 2i64 };
/// assert_eq!(r.len(), 2);
/// ```
#[macro_export]
macro_rules! record {
    () => { $crate::record::Record::new() };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut r = $crate::record::Record::new();
        $( r.set($name, $crate::types::Scalar::from($value)); )+
        r
    }};
}

/// One row: column names paired with values, in insertion order.
/// Setting an existing column overwrites it in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<(String, Scalar)>,
}

impl Record {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            fields: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&Scalar> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| v)
    }

    /// Like `get`, but a missing column is a schema error.
    pub fn try_get(&self, column: &str) -> Result<&Scalar> {
        self.get(column).ok_or_else(|| Error::missing_column(column))
    }

    pub fn contains(&self, column: &str) -> bool {
        self.position(column).is_some()
    }

    pub fn set(&mut self, column: impl Into<String>, value: Scalar) {
        let column = column.into();
        match self.position(&column) {
            Some(idx) => self.fields[idx].1 = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn remove(&mut self, column: &str) -> Option<Scalar> {
        let idx = self.position(column)?;
        Some(self.fields.remove(idx).1)
    }

    /// Move the value of `old` under the name `new`, keeping `old`'s position.
    /// An existing `new` column is overwritten (dropped).
    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        let idx = self
            .position(old)
            .ok_or_else(|| Error::missing_column(old))?;
        if old == new {
            return Ok(());
        }
        self.fields[idx].0 = new.to_string();
        if let Some(dup) = self
            .fields
            .iter()
            .enumerate()
            .position(|(i, (name, _))| i != idx && name == new)
        {
            self.fields.remove(dup);
        }
        Ok(())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Scalar> {
        self.fields.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.fields.iter().map(|(name, v)| (name.as_str(), v))
    }

    pub fn into_fields(self) -> Vec<(String, Scalar)> {
        self.fields
    }

    /// A new record holding only `columns`, in that order.
    pub fn select(&self, columns: &[String]) -> Result<Record> {
        let mut out = Record::with_capacity(columns.len());
        for c in columns {
            out.set(c.clone(), self.try_get(c)?.clone());
        }
        Ok(out)
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.fields.iter().position(|(name, _)| name == column)
    }
}

impl<K: Into<String>> FromIterator<(K, Scalar)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Scalar)>>(iter: I) -> Self {
        let mut r = Record::new();
        for (k, v) in iter {
            r.set(k, v);
        }
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_in_place() {
        let mut r = record! { "a" => 1i64, "b" => 2i64 };
        r.set("a", Scalar::Int(10));
        assert_eq!(r.columns().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(r.get("a"), Some(&Scalar::Int(10)));
    }

    #[test]
    fn rename_keeps_position_and_drops_collision() {
        let mut r = record! { "x" => 1i64, "y" => 2i64, "z" => 3i64 };
        r.rename("x", "z").unwrap();
        assert_eq!(r.columns().collect::<Vec<_>>(), vec!["z", "y"]);
        assert_eq!(r.get("z"), Some(&Scalar::Int(1)));
    }

    #[test]
    fn rename_missing_column_is_schema_error() {
        let mut r = record! { "x" => 1i64 };
        assert!(matches!(r.rename("nope", "y"), Err(Error::Schema(_))));
    }

    #[test]
    fn select_orders_by_request() {
        let r = record! { "a" => 1i64, "b" => "two", "c" => 3.0 };
        let s = r.select(&["c".into(), "a".into()]).unwrap();
        assert_eq!(s.columns().collect::<Vec<_>>(), vec!["c", "a"]);
        assert!(r.select(&["missing".into()]).is_err());
    }
}
