use chessref_operators::OpError;
use thiserror::Error;

/// Result type local to chessref-pipeline.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unknown table '{0}'")]
    UnknownTable(String),

    #[error("table '{0}' is defined more than once")]
    DuplicateTable(String),

    #[error("step {step} ({op}) failed: {source}")]
    Op {
        step: usize,
        op: &'static str,
        #[source]
        source: OpError,
    },

    #[error(transparent)]
    Io(#[from] chessref_io::Error),

    #[error(transparent)]
    Core(#[from] chessref_core::Error),

    #[error("invalid pipeline: {0}")]
    Invalid(String),
}
