#![forbid(unsafe_code)]
//! chessref-core: the in-memory record table shared by every other crate.
//!
//! - `types`: the `Scalar` cell value.
//! - `schema`: ordered column names.
//! - `record` / `table`: ordered key-value records and homogeneous tables.
//! - `config`: settings layered from defaults, environment and pipelines.
//!
//! Operators that transform tables live in `chessref-operators`; CSV/JSON
//! loading and export live in `chessref-io`. Core performs no IO.

pub mod config;
pub mod error;
pub mod prelude;
pub mod record;
pub mod schema;
pub mod table;
pub mod types;

pub use error::{Error, Result};
