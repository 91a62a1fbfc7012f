//! Convenient re-exports for downstream crates.

pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::record::Record;
pub use crate::schema::Schema;
pub use crate::table::Table;
pub use crate::types::Scalar;
