#![forbid(unsafe_code)]
//! chessref-operators: relational operators over `chessref_core::Table`.
//!
//! - Pure operators (`Project`, `GroupCount`, `Filter`, `NestedLoopJoin`)
//!   return a new table and leave their inputs untouched.
//! - In-place operators (`Rename`, `Transform`) mutate the table they are
//!   given; their `Operator::eval` form works on a copy.
//!
//! `TableExt` exposes the same operations as methods for ad-hoc pipelines.

pub mod aggregate;
pub mod ext;
pub mod filter;
pub mod join;
pub mod project;
pub mod rename;
pub mod traits;
pub mod transform;

pub use aggregate::{GroupCount, GroupCountOutput, GroupCounts};
pub use ext::{join, TableExt};
pub use filter::Filter;
pub use join::{MergePolicy, NestedLoopJoin};
pub use project::Project;
pub use rename::Rename;
pub use traits::{OpError, Operator};
pub use transform::{NormalizeBy, Transform};
