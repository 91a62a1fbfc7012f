//! Projection onto an ordered column list.

use std::collections::HashSet;

use chessref_core::schema::Schema;
use chessref_core::table::Table;

use crate::traits::{expect_inputs, OpError, Operator};

#[derive(Debug, Clone, Default)]
pub struct Project {
    pub columns: Vec<String>,
}

impl Project {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn apply(&self, table: &Table) -> Result<Table, OpError> {
        if self.columns.is_empty() {
            return Err(OpError::Schema("projection needs at least one column".into()));
        }
        let mut seen = HashSet::new();
        for c in &self.columns {
            if !seen.insert(c.as_str()) {
                return Err(OpError::Schema(format!("column '{}' projected twice", c)));
            }
            table.require(c)?;
        }

        let records = table
            .iter()
            .map(|r| r.select(&self.columns))
            .collect::<Result<Vec<_>, _>>()?;
        let out = Table::from_parts(Schema::new(self.columns.clone()), records)?;
        tracing::trace!(columns = ?self.columns, rows = out.len(), "project");
        Ok(out)
    }
}

impl Operator for Project {
    fn name(&self) -> &'static str {
        "project"
    }

    fn eval(&self, inputs: &[&Table]) -> Result<Table, OpError> {
        expect_inputs(self, inputs)?;
        self.apply(inputs[0])
    }
}
