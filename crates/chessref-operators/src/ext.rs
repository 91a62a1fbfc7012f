//! Method-call sugar over the operator structs.

use chessref_core::record::Record;
use chessref_core::table::Table;
use chessref_core::types::Scalar;

use crate::aggregate::{GroupCount, GroupCountOutput};
use crate::filter::Filter;
use crate::join::NestedLoopJoin;
use crate::project::Project;
use crate::rename::Rename;
use crate::traits::OpError;
use crate::transform::Transform;

pub trait TableExt {
    fn project(&self, columns: &[&str]) -> Result<Table, OpError>;

    fn rename(&mut self, old: &str, new: &str) -> Result<(), OpError>;

    fn group_count(
        &self,
        column: &str,
        key_label: &str,
        value_label: &str,
        as_table: bool,
    ) -> Result<GroupCountOutput, OpError>;

    fn transform<F>(&mut self, source: &str, target: &str, f: F) -> Result<(), OpError>
    where
        F: Fn(&Record, &str) -> Scalar;

    fn filter(&self, expr: &str) -> Result<Table, OpError>;
}

impl TableExt for Table {
    fn project(&self, columns: &[&str]) -> Result<Table, OpError> {
        Project::new(columns.iter().copied()).apply(self)
    }

    fn rename(&mut self, old: &str, new: &str) -> Result<(), OpError> {
        Rename::new(old, new).apply(self)
    }

    fn group_count(
        &self,
        column: &str,
        key_label: &str,
        value_label: &str,
        as_table: bool,
    ) -> Result<GroupCountOutput, OpError> {
        GroupCount::new(column, key_label, value_label).eval_as(self, as_table)
    }

    fn transform<F>(&mut self, source: &str, target: &str, f: F) -> Result<(), OpError>
    where
        F: Fn(&Record, &str) -> Scalar,
    {
        Transform::new(source, target, f).apply(self)
    }

    fn filter(&self, expr: &str) -> Result<Table, OpError> {
        Filter::new(expr).apply(self)
    }
}

/// Equality join with the default (right-wins) merge policy.
pub fn join(left: &Table, right: &Table, left_key: &str, right_key: &str) -> Result<Table, OpError> {
    NestedLoopJoin::new(left_key, right_key).apply(left, right)
}
