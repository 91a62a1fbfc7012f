//! Pipeline execution.
//!
//! The engine keeps every named table in memory. A run loads the sources,
//! validates names against what is loaded, then evaluates steps strictly in
//! document order and finally exports the sinks. Steps that work in place
//! (rename, transform) replace their table under the same name.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chessref_core::config::Config;
use chessref_core::table::Table;
use chessref_core::types::Scalar;

use chessref_io::{write_csv, write_table_json, CsvReader};

use chessref_operators::transform::scale;
use chessref_operators::{
    Filter, GroupCount, NestedLoopJoin, NormalizeBy, OpError, Operator, Project, Rename,
    Transform,
};

use crate::dsl::yaml::{Pipeline, SinkFormat, Step, TransformKind};
use crate::error::{PipelineError, Result};
use crate::validate::validate_pipeline;

/// What a run did, step by step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub sources: Vec<(String, usize)>,
    pub steps: Vec<StepReport>,
    pub sinks: Vec<SinkReport>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub index: usize,
    pub op: &'static str,
    pub output: String,
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SinkReport {
    pub table: String,
    pub destination: PathBuf,
    pub format: SinkFormat,
    pub rows: usize,
}

/// Engine owns the configuration and the named tables.
#[derive(Debug)]
pub struct Engine {
    cfg: Config,
    base_dir: Option<PathBuf>,
    tables: HashMap<String, Table>,
}

impl Engine {
    pub fn new(cfg: Config) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            base_dir: None,
            tables: HashMap::new(),
        })
    }

    /// Resolve relative source and sink paths against `dir` instead of the
    /// working directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Register a table under `name` before running. Sources with the same
    /// name are rejected at validation.
    pub fn with_table(mut self, name: impl Into<String>, table: Table) -> Self {
        self.tables.insert(name.into(), table);
        self
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn into_tables(self) -> HashMap<String, Table> {
        self.tables
    }

    fn resolve(&self, path: &str) -> PathBuf {
        match &self.base_dir {
            Some(dir) if Path::new(path).is_relative() => dir.join(path),
            _ => PathBuf::from(path),
        }
    }

    /// Execute `pipeline`. Its `config` block is layered over the engine's
    /// configuration and stays applied afterwards.
    pub fn run(&mut self, pipeline: &Pipeline) -> Result<RunReport> {
        if let Some(overrides) = &pipeline.config {
            overrides.apply_to(&mut self.cfg)?;
            self.cfg.validate()?;
        }
        validate_pipeline(pipeline, self.tables.keys().map(String::as_str))?;

        let mut report = RunReport::default();

        let reader = CsvReader::from_config(&self.cfg);
        for source in &pipeline.sources {
            let table = reader.read_path(self.resolve(&source.path))?;
            tracing::info!(source = %source.name, rows = table.len(), "source loaded");
            report.sources.push((source.name.clone(), table.len()));
            self.tables.insert(source.name.clone(), table);
        }

        for (index, step) in pipeline.steps.iter().enumerate() {
            let out = self.eval_step(index, step)?;
            tracing::info!(
                step = index,
                op = step.op_name(),
                output = step.output(),
                rows = out.len(),
                "step done"
            );
            report.steps.push(StepReport {
                index,
                op: step.op_name(),
                output: step.output().to_string(),
                rows: out.len(),
            });
            self.tables.insert(step.output().to_string(), out);
        }

        for sink in &pipeline.sinks {
            let table = self.lookup(&sink.table)?;
            let destination = self.resolve(&sink.destination);
            match sink.format {
                SinkFormat::Csv => write_csv(table, &destination, &self.cfg)?,
                SinkFormat::Json => write_table_json(table, &destination)?,
            }
            tracing::info!(table = %sink.table, destination = %destination.display(), "sink written");
            report.sinks.push(SinkReport {
                table: sink.table.clone(),
                destination,
                format: sink.format,
                rows: table.len(),
            });
        }

        Ok(report)
    }

    fn lookup(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| PipelineError::UnknownTable(name.to_string()))
    }

    fn eval_step(&self, index: usize, step: &Step) -> Result<Table> {
        let wrap = |source: OpError| PipelineError::Op {
            step: index,
            op: step.op_name(),
            source,
        };

        let op = self.build_operator(step).map_err(wrap)?;
        let inputs = step
            .inputs()
            .into_iter()
            .take(op.arity())
            .map(|name| self.lookup(name))
            .collect::<Result<Vec<&Table>>>()?;

        tracing::debug!(step = index, operator = op.name(), inputs = ?step.inputs(), "evaluating");
        op.eval(&inputs).map_err(wrap)
    }

    /// Instantiate the operator for `step`. Lookup tables used by
    /// `normalize_by` are read here, so the operator itself stays unary.
    fn build_operator(&self, step: &Step) -> std::result::Result<Box<dyn Operator>, OpError> {
        let op: Box<dyn Operator> = match step {
            Step::Project { columns, .. } => Box::new(Project::new(columns.iter().cloned())),
            Step::Rename { from, to, .. } => Box::new(Rename::new(from.as_str(), to.as_str())),
            Step::GroupCount {
                column, key, value, ..
            } => Box::new(GroupCount::new(column.as_str(), key.as_str(), value.as_str())),
            Step::Join {
                left_key,
                right_key,
                merge,
                ..
            } => Box::new(
                NestedLoopJoin::new(left_key.as_str(), right_key.as_str())
                    .with_policy(merge.clone()),
            ),
            Step::Filter { expr, .. } => Box::new(Filter::new(expr.as_str())),
            Step::Transform {
                source,
                target,
                kind,
                ..
            } => match kind {
                TransformKind::Scale { factor, fallback } => Box::new(Transform::with_fallback(
                    source.clone(),
                    target.clone(),
                    Scalar::Int(*fallback),
                    scale(*factor),
                )),
                TransformKind::NormalizeBy {
                    lookup,
                    lookup_key,
                    lookup_value,
                    record_key,
                    factor,
                    fallback,
                } => {
                    let denominators = self
                        .tables
                        .get(lookup)
                        .ok_or_else(|| OpError::Plan(format!("unknown lookup table '{}'", lookup)))?;
                    let norm = NormalizeBy::new(record_key.as_str(), *factor).with_lookup_table(
                        denominators,
                        lookup_key,
                        lookup_value,
                    )?;
                    Box::new(Transform::with_fallback(
                        source.clone(),
                        target.clone(),
                        Scalar::Int(*fallback),
                        move |r, c| norm.compute(r, c),
                    ))
                }
            },
        };
        Ok(op)
    }
}
