//! Grouped counting.
//!
//! One pass over the records; each distinct value of the grouping column
//! gets a running count, and groups keep the order in which their value was
//! first seen.

use std::collections::HashMap;

use chessref_core::record::Record;
use chessref_core::schema::Schema;
use chessref_core::table::Table;
use chessref_core::types::{Scalar, ScalarKey};

use crate::traits::{expect_inputs, OpError, Operator};

#[derive(Debug, Clone)]
pub struct GroupCount {
    /// Column whose distinct values define the groups.
    pub column: String,
    /// Output column holding the group value.
    pub key_label: String,
    /// Output column holding the count.
    pub value_label: String,
}

/// Either shape a group count can be returned in.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupCountOutput {
    Table(Table),
    Counts(GroupCounts),
}

/// Occurrence counts per distinct value, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupCounts {
    entries: Vec<(Scalar, u64)>,
    index: HashMap<ScalarKey, usize>,
}

impl GroupCounts {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, value: &Scalar) -> Option<u64> {
        self.index.get(&value.key()).map(|&i| self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Scalar, u64)> {
        self.entries.iter().map(|(v, n)| (v, *n))
    }

    /// Sum of all counts; equals the number of records counted.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    fn bump(&mut self, value: &Scalar) {
        match self.index.get(&value.key()) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(value.key(), self.entries.len());
                self.entries.push((value.clone(), 1));
            }
        }
    }

    pub fn into_table(self, key_label: &str, value_label: &str) -> Result<Table, OpError> {
        let schema = Schema::new(vec![key_label.to_string(), value_label.to_string()]);
        let records = self
            .entries
            .into_iter()
            .map(|(value, n)| {
                let mut r = Record::with_capacity(2);
                r.set(key_label, value);
                r.set(value_label, Scalar::from(n));
                r
            })
            .collect();
        Ok(Table::from_parts(schema, records)?)
    }
}

impl GroupCount {
    pub fn new(
        column: impl Into<String>,
        key_label: impl Into<String>,
        value_label: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            key_label: key_label.into(),
            value_label: value_label.into(),
        }
    }

    pub fn counts(&self, table: &Table) -> Result<GroupCounts, OpError> {
        table.require(&self.column)?;
        let mut counts = GroupCounts::default();
        for record in table {
            counts.bump(record.try_get(&self.column)?);
        }
        tracing::debug!(
            column = %self.column,
            rows = table.len(),
            groups = counts.len(),
            "group count"
        );
        Ok(counts)
    }

    pub fn table(&self, table: &Table) -> Result<Table, OpError> {
        if self.key_label == self.value_label {
            return Err(OpError::Plan(format!(
                "group count labels must differ, both are '{}'",
                self.key_label
            )));
        }
        self.counts(table)?
            .into_table(&self.key_label, &self.value_label)
    }

    /// `as_table` selects between the two output shapes.
    pub fn eval_as(&self, table: &Table, as_table: bool) -> Result<GroupCountOutput, OpError> {
        if as_table {
            self.table(table).map(GroupCountOutput::Table)
        } else {
            self.counts(table).map(GroupCountOutput::Counts)
        }
    }
}

impl Operator for GroupCount {
    fn name(&self) -> &'static str {
        "group_count"
    }

    fn eval(&self, inputs: &[&Table]) -> Result<Table, OpError> {
        expect_inputs(self, inputs)?;
        self.table(inputs[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chessref_core::record;

    fn grandmasters() -> Table {
        Table::from_records(
            ["RUS", "USA", "RUS", "IND", "RUS"]
                .into_iter()
                .map(|f| record! { "Name" => "x", "Federation" => f })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn counts_in_first_seen_order() {
        let out = GroupCount::new("Federation", "country", "count")
            .table(&grandmasters())
            .unwrap();
        assert_eq!(out.header().unwrap(), vec!["country", "count"]);
        let rows: Vec<(String, Scalar)> = out
            .iter()
            .map(|r| (r.get("country").unwrap().to_string(), r.get("count").unwrap().clone()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("RUS".to_string(), Scalar::Int(3)),
                ("USA".to_string(), Scalar::Int(1)),
                ("IND".to_string(), Scalar::Int(1)),
            ]
        );
    }

    #[test]
    fn counts_sum_to_table_length() {
        let t = grandmasters();
        let counts = GroupCount::new("Federation", "k", "v").counts(&t).unwrap();
        assert_eq!(counts.total(), t.len() as u64);
        assert_eq!(counts.get(&Scalar::from("RUS")), Some(3));
        assert_eq!(counts.get(&Scalar::from("FRA")), None);
    }

    #[test]
    fn flag_selects_output_shape() {
        let gc = GroupCount::new("Federation", "k", "v");
        assert!(matches!(
            gc.eval_as(&grandmasters(), true).unwrap(),
            GroupCountOutput::Table(_)
        ));
        assert!(matches!(
            gc.eval_as(&grandmasters(), false).unwrap(),
            GroupCountOutput::Counts(_)
        ));
    }

    #[test]
    fn integral_floats_share_a_group_with_integers() {
        let t = Table::from_records(vec![
            record! { "n" => 3i64 },
            record! { "n" => 3.0 },
        ])
        .unwrap();
        let counts = GroupCount::new("n", "k", "v").counts(&t).unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get(&Scalar::Int(3)), Some(2));
    }

    #[test]
    fn missing_column_and_equal_labels_fail() {
        let t = grandmasters();
        assert!(matches!(
            GroupCount::new("Title", "k", "v").counts(&t),
            Err(OpError::Schema(_))
        ));
        assert!(matches!(
            GroupCount::new("Federation", "k", "k").table(&t),
            Err(OpError::Plan(_))
        ));
    }

    #[test]
    fn empty_table_yields_empty_counts() {
        let out = GroupCount::new("Federation", "country", "count")
            .table(&Table::empty())
            .unwrap();
        assert!(out.is_empty());
        assert_eq!(out.schema().columns, vec!["country", "count"]);
    }
}
