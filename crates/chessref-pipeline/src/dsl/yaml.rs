//! YAML document model for table pipelines.
//!
//! Example (the grandmaster-count pipeline):
//! ```yaml
//! config: { write_bom: true }
//! sources:
//!   - { name: gm, path: "reference/WorldChessGrandMaster.csv" }
//!   - { name: latlong, path: "reference/world_country_and_usa_states_latitude_and_longitude_values.csv" }
//! steps:
//!   - { op: group_count, input: gm, output: counts, column: Federation, key: country, value: count }
//!   - { op: join, left: counts, right: latlong, left_key: country, right_key: country, output: joined }
//!   - { op: project, input: joined, output: gm_count, columns: [country, count, latitude, longitude] }
//! sinks:
//!   - { table: gm_count, destination: "transformed/GM count.csv", format: csv }
//! ```

use serde::{Deserialize, Serialize};

use chessref_core::config::Config;
use chessref_operators::MergePolicy;

use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    #[serde(default)]
    pub config: Option<PipelineConfig>,
    #[serde(default)]
    pub sources: Vec<Source>,
    pub steps: Vec<Step>,
    #[serde(default)]
    pub sinks: Vec<Sink>,
}

/// Overrides applied on top of the environment-derived `Config`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub delimiter: Option<char>,
    pub write_bom: Option<bool>,
    pub infer_types: Option<bool>,
    pub empty_as_null: Option<bool>,
}

impl PipelineConfig {
    pub fn apply_to(&self, cfg: &mut Config) -> Result<()> {
        if let Some(d) = self.delimiter {
            cfg.delimiter = u8::try_from(d).map_err(|_| {
                PipelineError::Invalid(format!("delimiter {:?} is not a single byte", d))
            })?;
        }
        if let Some(v) = self.write_bom {
            cfg.write_bom = v;
        }
        if let Some(v) = self.infer_types {
            cfg.infer_types = v;
        }
        if let Some(v) = self.empty_as_null {
            cfg.empty_as_null = v;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum Step {
    Project {
        input: String,
        output: String,
        columns: Vec<String>,
    },

    /// In place.
    Rename {
        table: String,
        from: String,
        to: String,
    },

    GroupCount {
        input: String,
        output: String,
        column: String,
        key: String,
        value: String,
    },

    Join {
        left: String,
        right: String,
        left_key: String,
        right_key: String,
        output: String,
        #[serde(default)]
        merge: MergePolicy,
    },

    Filter {
        input: String,
        output: String,
        expr: String,
    },

    /// In place.
    Transform {
        table: String,
        source: String,
        target: String,
        kind: TransformKind,
    },
}

/// Built-in derived-column functions. Both fall back to `fallback` on
/// records they cannot compute.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    Scale {
        factor: f64,
        #[serde(default)]
        fallback: i64,
    },
    NormalizeBy {
        /// Table holding the denominators.
        lookup: String,
        lookup_key: String,
        lookup_value: String,
        /// Column of the transformed table matched against `lookup_key`.
        record_key: String,
        #[serde(default = "default_factor")]
        factor: f64,
        #[serde(default)]
        fallback: i64,
    },
}

fn default_factor() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sink {
    pub table: String,
    pub destination: String,
    #[serde(default)]
    pub format: SinkFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkFormat {
    #[default]
    Csv,
    Json,
}

impl Step {
    pub fn op_name(&self) -> &'static str {
        match self {
            Step::Project { .. } => "project",
            Step::Rename { .. } => "rename",
            Step::GroupCount { .. } => "group_count",
            Step::Join { .. } => "join",
            Step::Filter { .. } => "filter",
            Step::Transform { .. } => "transform",
        }
    }

    /// Tables read by the step, in operator input order.
    pub fn inputs(&self) -> Vec<&str> {
        match self {
            Step::Project { input, .. }
            | Step::GroupCount { input, .. }
            | Step::Filter { input, .. } => vec![input.as_str()],
            Step::Rename { table, .. } => vec![table.as_str()],
            Step::Join { left, right, .. } => vec![left.as_str(), right.as_str()],
            Step::Transform { table, kind, .. } => match kind {
                TransformKind::Scale { .. } => vec![table.as_str()],
                TransformKind::NormalizeBy { lookup, .. } => vec![table.as_str(), lookup.as_str()],
            },
        }
    }

    /// Table written by the step.
    pub fn output(&self) -> &str {
        match self {
            Step::Project { output, .. }
            | Step::GroupCount { output, .. }
            | Step::Join { output, .. }
            | Step::Filter { output, .. } => output,
            Step::Rename { table, .. } | Step::Transform { table, .. } => table,
        }
    }

    /// True for steps that rewrite their input table instead of defining a new one.
    pub fn in_place(&self) -> bool {
        matches!(self, Step::Rename { .. } | Step::Transform { .. })
    }

    /// One-line human description, used by `explain`.
    pub fn describe(&self) -> String {
        match self {
            Step::Project {
                input,
                output,
                columns,
            } => format!("{} = project {} [{}]", output, input, columns.join(", ")),
            Step::Rename { table, from, to } => {
                format!("{}: rename '{}' -> '{}'", table, from, to)
            }
            Step::GroupCount {
                input,
                output,
                column,
                key,
                value,
            } => format!(
                "{} = group_count {} by '{}' as ({}, {})",
                output, input, column, key, value
            ),
            Step::Join {
                left,
                right,
                left_key,
                right_key,
                output,
                merge,
            } => format!(
                "{} = join {}.{} == {}.{} (merge: {:?}, nested loop)",
                output, left, left_key, right, right_key, merge
            ),
            Step::Filter {
                input,
                output,
                expr,
            } => format!("{} = filter {} where {}", output, input, expr),
            Step::Transform {
                table,
                source,
                target,
                kind,
            } => match kind {
                TransformKind::Scale { factor, fallback } => format!(
                    "{}: '{}' = '{}' * {} (fallback {})",
                    table, target, source, factor, fallback
                ),
                TransformKind::NormalizeBy {
                    lookup,
                    lookup_key,
                    lookup_value,
                    record_key,
                    factor,
                    fallback,
                } => format!(
                    "{}: '{}' = round('{}' / {}['{}' -> '{}'][{}] * {}) (fallback {})",
                    table,
                    target,
                    source,
                    lookup,
                    lookup_key,
                    lookup_value,
                    record_key,
                    factor,
                    fallback
                ),
            },
        }
    }
}

/// Parse a pipeline document. Name resolution is left to `validate_pipeline`,
/// since tables may also be registered on the `Engine` directly.
pub fn parse_yaml_pipeline(yaml_src: &str) -> Result<Pipeline> {
    let doc: Pipeline = serde_yaml::from_str(yaml_src)?;
    if doc.steps.is_empty() && doc.sinks.is_empty() {
        return Err(PipelineError::Invalid("pipeline has no steps and no sinks".into()));
    }
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_step_kind() {
        let yaml = r#"
config:
  write_bom: false
  delimiter: ";"
sources:
  - { name: players, path: "players.csv" }
  - { name: continents, path: "continents2.csv" }
steps:
  - { op: rename, table: continents, from: name, to: "country name" }
  - { op: join, left: players, right: continents, left_key: federation, right_key: alpha-3, output: joined, merge: { suffix: "_right" } }
  - { op: group_count, input: joined, output: totals, column: "country name", key: "country name", value: "total players" }
  - { op: filter, input: totals, output: big, expr: "total players > 10" }
  - { op: project, input: big, output: out, columns: ["country name"] }
  - op: transform
    table: totals
    source: "total players"
    target: scaled
    kind: { scale: { factor: 0.5 } }
sinks:
  - { table: out, destination: "out.json", format: json }
"#;
        let p = parse_yaml_pipeline(yaml).unwrap();
        assert_eq!(p.sources.len(), 2);
        assert_eq!(p.steps.len(), 6);
        assert!(matches!(
            &p.steps[1],
            Step::Join { merge: MergePolicy::Suffix(s), .. } if s == "_right"
        ));
        assert_eq!(p.sinks[0].format, SinkFormat::Json);

        let mut cfg = Config::default();
        p.config.unwrap().apply_to(&mut cfg).unwrap();
        assert!(!cfg.write_bom);
        assert_eq!(cfg.delimiter, b';');
    }

    #[test]
    fn join_merge_defaults_to_right_wins() {
        let yaml = r#"
steps:
  - { op: join, left: a, right: b, left_key: k, right_key: k, output: c }
"#;
        let p = parse_yaml_pipeline(yaml).unwrap();
        assert!(matches!(
            &p.steps[0],
            Step::Join { merge: MergePolicy::RightWins, .. }
        ));
        assert_eq!(p.steps[0].inputs(), vec!["a", "b"]);
        assert_eq!(p.steps[0].output(), "c");
    }

    #[test]
    fn unknown_op_is_rejected() {
        let yaml = r#"
steps:
  - { op: aggregate, input: a, output: b }
"#;
        assert!(matches!(
            parse_yaml_pipeline(yaml),
            Err(PipelineError::Yaml(_))
        ));
    }

    #[test]
    fn empty_document_is_invalid() {
        assert!(matches!(
            parse_yaml_pipeline("steps: []"),
            Err(PipelineError::Invalid(_))
        ));
    }

    #[test]
    fn normalize_by_reads_lookup_table() {
        let yaml = r#"
steps:
  - op: transform
    table: gm_count
    source: count
    target: count_normal
    kind:
      normalize_by:
        lookup: totals
        lookup_key: "country name"
        lookup_value: "total players"
        record_key: country
        factor: 10000
"#;
        let p = parse_yaml_pipeline(yaml).unwrap();
        assert!(p.steps[0].in_place());
        assert_eq!(p.steps[0].inputs(), vec!["gm_count", "totals"]);
        assert!(p.steps[0].describe().contains("10000"));
    }
}
