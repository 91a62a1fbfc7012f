//! Name resolution for pipelines.
//!
//! Tables are defined by sources, by tables registered on the engine, and by
//! the output of non-in-place steps. A step may only read tables defined
//! before it, a name may only be defined once, and sinks may only export
//! defined tables.

use std::collections::HashSet;

use crate::dsl::yaml::Pipeline;
use crate::error::{PipelineError, Result};

/// Check `pipeline`, treating `preloaded` as already-defined tables.
pub fn validate_pipeline<'a>(
    pipeline: &'a Pipeline,
    preloaded: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    let mut defined: HashSet<&str> = preloaded.into_iter().collect();

    for source in &pipeline.sources {
        if source.path.is_empty() {
            return Err(PipelineError::Invalid(format!(
                "source '{}' has an empty path",
                source.name
            )));
        }
        if !defined.insert(source.name.as_str()) {
            return Err(PipelineError::DuplicateTable(source.name.clone()));
        }
    }

    for step in &pipeline.steps {
        for input in step.inputs() {
            if !defined.contains(input) {
                return Err(PipelineError::UnknownTable(input.to_string()));
            }
        }
        if !step.in_place() && !defined.insert(step.output()) {
            return Err(PipelineError::DuplicateTable(step.output().to_string()));
        }
    }

    for sink in &pipeline.sinks {
        if !defined.contains(sink.table.as_str()) {
            return Err(PipelineError::UnknownTable(sink.table.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::yaml::parse_yaml_pipeline;

    const GM_COUNT: &str = r#"
sources:
  - { name: gm, path: "gm.csv" }
  - { name: latlong, path: "latlong.csv" }
steps:
  - { op: group_count, input: gm, output: counts, column: Federation, key: country, value: count }
  - { op: join, left: counts, right: latlong, left_key: country, right_key: country, output: joined }
  - { op: project, input: joined, output: final, columns: [country, count, latitude, longitude] }
sinks:
  - { table: final, destination: "out.csv" }
"#;

    #[test]
    fn linear_pipeline_resolves() {
        let p = parse_yaml_pipeline(GM_COUNT).unwrap();
        assert!(validate_pipeline(&p, []).is_ok());
    }

    #[test]
    fn reading_an_undefined_table_fails() {
        let yaml = GM_COUNT.replace("right: latlong", "right: coordinates");
        let p = parse_yaml_pipeline(&yaml).unwrap();
        assert!(matches!(
            validate_pipeline(&p, []),
            Err(PipelineError::UnknownTable(t)) if t == "coordinates"
        ));
    }

    #[test]
    fn preloaded_tables_count_as_defined() {
        let yaml = r#"
steps:
  - { op: project, input: registered, output: out, columns: [a] }
"#;
        let p = parse_yaml_pipeline(yaml).unwrap();
        assert!(validate_pipeline(&p, []).is_err());
        assert!(validate_pipeline(&p, ["registered"]).is_ok());
    }

    #[test]
    fn redefining_a_table_fails() {
        let yaml = GM_COUNT.replace("output: final", "output: counts");
        let p = parse_yaml_pipeline(&yaml).unwrap();
        assert!(matches!(
            validate_pipeline(&p, []),
            Err(PipelineError::DuplicateTable(t)) if t == "counts"
        ));
    }

    #[test]
    fn sink_of_unknown_table_fails() {
        let yaml = GM_COUNT.replace("table: final", "table: nowhere");
        let p = parse_yaml_pipeline(&yaml).unwrap();
        assert!(matches!(
            validate_pipeline(&p, []),
            Err(PipelineError::UnknownTable(_))
        ));
    }
}
