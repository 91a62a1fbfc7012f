#![forbid(unsafe_code)]
//! chessref-pipeline: declarative table pipelines.
//!
//! A pipeline document names its CSV `sources`, lists `steps` that each read
//! and write named tables, and ends with `sinks` that export tables. The
//! runner executes steps strictly in document order.
//!
//! - `dsl::yaml`: the document model and `parse_yaml_pipeline`.
//! - `validate`: name resolution (every table read must be defined earlier).
//! - `runner`: `Engine`, which loads, evaluates and exports.

pub mod dsl;
pub mod error;
pub mod runner;
pub mod validate;

pub use dsl::yaml::{
    parse_yaml_pipeline, Pipeline, PipelineConfig, Sink, SinkFormat, Source, Step, TransformKind,
};
pub use error::{PipelineError, Result};
pub use runner::{Engine, RunReport, SinkReport, StepReport};
pub use validate::validate_pipeline;
