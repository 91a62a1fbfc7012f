//! Operator trait + common error type.
//!
//! Pipelines hold boxed operators and call `eval` with the tables named by a
//! step. Unary operators read `inputs[0]`; the join reads `inputs[0]` (left)
//! and `inputs[1]` (right).

use chessref_core::table::Table;
use chessref_core::Error as CoreError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpError {
    #[error("planning error: {0}")]
    Plan(String),

    #[error("execution error: {0}")]
    Exec(String),

    #[error("schema error: {0}")]
    Schema(String),

    #[error("column '{column}' exists on both sides of the join")]
    Collision { column: String },

    #[error(transparent)]
    Core(CoreError),
}

impl From<CoreError> for OpError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Schema(msg) => OpError::Schema(msg),
            other => OpError::Core(other),
        }
    }
}

/// Trait that all operators implement.
///
/// `eval` must be deterministic given the same inputs and must not modify
/// them.
pub trait Operator {
    /// Human-readable operator name (stable).
    fn name(&self) -> &'static str;

    /// Number of input tables `eval` expects.
    fn arity(&self) -> usize {
        1
    }

    fn eval(&self, inputs: &[&Table]) -> Result<Table, OpError>;
}

/// Check the input count against `op.arity()`.
pub(crate) fn expect_inputs<O: Operator + ?Sized>(
    op: &O,
    inputs: &[&Table],
) -> Result<(), OpError> {
    if inputs.len() != op.arity() {
        return Err(OpError::Plan(format!(
            "{} expects {} input(s), got {}",
            op.name(),
            op.arity(),
            inputs.len()
        )));
    }
    Ok(())
}
