//! Column renaming, applied in place.

use chessref_core::table::Table;

use crate::traits::{expect_inputs, OpError, Operator};

/// Renames applied in order: `(old, new)`.
///
/// Renaming onto an existing column overwrites it; callers must avoid
/// collisions they do not intend.
#[derive(Debug, Clone, Default)]
pub struct Rename {
    pub renames: Vec<(String, String)>,
}

impl Rename {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            renames: vec![(old.into(), new.into())],
        }
    }

    pub fn then(mut self, old: impl Into<String>, new: impl Into<String>) -> Self {
        self.renames.push((old.into(), new.into()));
        self
    }

    pub fn apply(&self, table: &mut Table) -> Result<(), OpError> {
        for (old, new) in &self.renames {
            table.rename_column(old, new)?;
            tracing::trace!(%old, %new, rows = table.len(), "rename");
        }
        Ok(())
    }
}

impl Operator for Rename {
    fn name(&self) -> &'static str {
        "rename"
    }

    fn eval(&self, inputs: &[&Table]) -> Result<Table, OpError> {
        expect_inputs(self, inputs)?;
        let mut out = inputs[0].clone();
        self.apply(&mut out)?;
        Ok(out)
    }
}
