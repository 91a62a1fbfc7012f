//! Nested-loop equality join.
//!
//! Every `(l, r)` pair with `l[left_key] == r[right_key]` (compared with
//! `Scalar::key_eq`) produces one merged record, in left-major order. No
//! index is built: cost is O(|left| * |right|), which is fine for reference
//! tables of a few hundred rows.
//!
//! Merged records hold the left columns followed by the right columns not
//! already present. What happens to a column present on both sides is the
//! `MergePolicy`.

use serde::{Deserialize, Serialize};

use chessref_core::record::Record;
use chessref_core::schema::Schema;
use chessref_core::table::Table;

use crate::traits::{expect_inputs, OpError, Operator};

/// Resolution of a column name present in both join inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Keep the left position, take the right value (last write wins).
    #[default]
    RightWins,
    /// Keep the left value.
    LeftWins,
    /// Refuse to join. A join key shared by name is not a collision.
    Error,
    /// Keep both; the right column is renamed `name + suffix`.
    Suffix(String),
}

#[derive(Debug, Clone)]
pub struct NestedLoopJoin {
    pub left_key: String,
    pub right_key: String,
    pub policy: MergePolicy,
}

impl NestedLoopJoin {
    pub fn new(left_key: impl Into<String>, right_key: impl Into<String>) -> Self {
        Self {
            left_key: left_key.into(),
            right_key: right_key.into(),
            policy: MergePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    fn shared_key(&self, column: &str) -> bool {
        self.left_key == self.right_key && column == self.right_key
    }

    /// Output column for a right-hand column, or `None` when it is dropped.
    /// A suffixed name must not already exist on either side.
    fn right_target(
        &self,
        left: &Schema,
        right: &Schema,
        column: &str,
    ) -> Result<Option<String>, OpError> {
        if !left.contains(column) {
            return Ok(Some(column.to_string()));
        }
        match &self.policy {
            MergePolicy::RightWins => Ok(Some(column.to_string())),
            MergePolicy::LeftWins => Ok(None),
            MergePolicy::Error if self.shared_key(column) => Ok(None),
            MergePolicy::Error => Err(OpError::Collision {
                column: column.to_string(),
            }),
            MergePolicy::Suffix(_) if self.shared_key(column) => Ok(None),
            MergePolicy::Suffix(suffix) => {
                let renamed = format!("{}{}", column, suffix);
                if left.contains(&renamed) || right.contains(&renamed) {
                    return Err(OpError::Collision { column: renamed });
                }
                Ok(Some(renamed))
            }
        }
    }

    pub fn apply(&self, left: &Table, right: &Table) -> Result<Table, OpError> {
        left.require(&self.left_key)?;
        right.require(&self.right_key)?;

        // Resolve every right column once; per-pair merging then only copies.
        let mut targets = Vec::with_capacity(right.schema().len());
        let mut schema = left.schema().clone();
        for column in right.schema().iter() {
            let target = self.right_target(left.schema(), right.schema(), column)?;
            if let Some(t) = &target {
                if !schema.contains(t) {
                    schema.columns.push(t.clone());
                }
            }
            targets.push(target);
        }

        let mut records = Vec::new();
        for l in left {
            let lk = l.try_get(&self.left_key)?;
            for r in right {
                if !lk.key_eq(r.try_get(&self.right_key)?) {
                    continue;
                }
                let mut merged: Record = l.clone();
                for ((_, value), target) in r.iter().zip(&targets) {
                    if let Some(t) = target {
                        merged.set(t.clone(), value.clone());
                    }
                }
                records.push(merged);
            }
        }

        tracing::debug!(
            left_key = %self.left_key,
            right_key = %self.right_key,
            left_rows = left.len(),
            right_rows = right.len(),
            matched = records.len(),
            "nested loop join"
        );
        Ok(Table::from_parts(schema, records)?)
    }
}

impl Operator for NestedLoopJoin {
    fn name(&self) -> &'static str {
        "join_nested_loop"
    }

    fn arity(&self) -> usize {
        2
    }

    fn eval(&self, inputs: &[&Table]) -> Result<Table, OpError> {
        expect_inputs(self, inputs)?;
        self.apply(inputs[0], inputs[1])
    }
}
