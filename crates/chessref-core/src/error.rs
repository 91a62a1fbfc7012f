use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Schema error: {0}")]
    Schema(String),

    /// A header (and therefore an export) was requested from a table with no records.
    #[error("table is empty; no schema can be inferred")]
    EmptyTable,

    #[error("Internal invariant failed: {0}")]
    Invariant(String),
}

impl Error {
    pub fn missing_column(column: &str) -> Self {
        Error::Schema(format!("column '{}' not found", column))
    }
}
