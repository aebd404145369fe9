//! Post-processing pipeline.
//!
//! Calculators run after field resolution, in declared order, each one a
//! pure function over the field map. Every calculator declares the fields it
//! reads and writes; at analyzer construction the declared order is checked
//! to be a topological order of that dependency graph, so a calculator can
//! only ever read base (rule-written) fields or fields finalized by an
//! earlier stage. Running the pipeline twice over the same map yields the
//! same map.

mod classes;
mod composite;
mod language;
mod versions;

use crate::error::ConfigError;
use crate::resolve::FieldMap;
use rustc_hash::FxHashMap;
use uascope_fields::Field;

pub(crate) use classes::ClassFromName;
pub(crate) use composite::NameVersionComposite;
pub(crate) use language::LanguageName;
pub(crate) use versions::{MajorVersion, MinimalVersion};

/// One post-processing stage.
pub(crate) trait Calculator: Send + Sync {
    /// Diagnostic name.
    fn name(&self) -> &'static str;
    /// Fields this stage reads.
    fn reads(&self) -> Vec<Field>;
    /// Fields this stage writes.
    fn writes(&self) -> Vec<Field>;
    /// Apply the stage to the field map.
    fn apply(&self, map: &mut FieldMap);
}

/// The standard pipeline, in its fixed order.
pub(crate) fn default_pipeline(minimal_version: bool) -> Vec<Box<dyn Calculator>> {
    let mut pipeline: Vec<Box<dyn Calculator>> = Vec::new();

    if minimal_version {
        pipeline.push(Box::new(MinimalVersion::standard()));
    }

    pipeline.push(Box::new(MajorVersion::new(
        "agent-version-major",
        Field::AgentVersion,
        Field::AgentVersionMajor,
    )));
    pipeline.push(Box::new(MajorVersion::new(
        "os-version-major",
        Field::OperatingSystemVersion,
        Field::OperatingSystemVersionMajor,
    )));
    pipeline.push(Box::new(MajorVersion::new(
        "engine-version-major",
        Field::LayoutEngineVersion,
        Field::LayoutEngineVersionMajor,
    )));

    pipeline.push(Box::new(NameVersionComposite::operating_system_name_version()));
    pipeline.push(Box::new(
        NameVersionComposite::operating_system_name_version_major(),
    ));
    pipeline.push(Box::new(NameVersionComposite::agent_name_version()));
    pipeline.push(Box::new(NameVersionComposite::agent_name_version_major()));
    pipeline.push(Box::new(NameVersionComposite::engine_name_version()));
    pipeline.push(Box::new(NameVersionComposite::engine_name_version_major()));

    pipeline.push(Box::new(ClassFromName::agent()));
    pipeline.push(Box::new(ClassFromName::operating_system()));
    pipeline.push(Box::new(ClassFromName::layout_engine()));

    pipeline.push(Box::new(LanguageName::new()));

    pipeline
}

/// Check that the declared order is a topological order: no stage reads a
/// field a later stage writes, and no field has two writers.
pub(crate) fn validate_pipeline(pipeline: &[Box<dyn Calculator>]) -> Result<(), ConfigError> {
    let mut writer_of: FxHashMap<Field, (usize, &'static str)> = FxHashMap::default();
    for (stage, calc) in pipeline.iter().enumerate() {
        for field in calc.writes() {
            if let Some(&(_, first)) = writer_of.get(&field) {
                // Self-rewrites (trimming) aside, a field has one writer.
                if first != calc.name() {
                    return Err(ConfigError::DuplicateWriter {
                        field,
                        first,
                        second: calc.name(),
                    });
                }
            }
            writer_of.insert(field, (stage, calc.name()));
        }
    }

    for (stage, calc) in pipeline.iter().enumerate() {
        for field in calc.reads() {
            if let Some(&(writer_stage, _)) = writer_of.get(&field) {
                let self_write = calc.writes().contains(&field);
                if writer_stage > stage && !self_write {
                    return Err(ConfigError::PipelineOrder {
                        calculator: calc.name(),
                        field,
                    });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::FieldMap;

    #[test]
    fn test_default_pipeline_is_topologically_ordered() {
        validate_pipeline(&default_pipeline(false)).unwrap();
        validate_pipeline(&default_pipeline(true)).unwrap();
    }

    #[test]
    fn test_misordered_pipeline_is_rejected() {
        // NameVersion composition before the major-version stage it reads.
        let pipeline: Vec<Box<dyn Calculator>> = vec![
            Box::new(NameVersionComposite::agent_name_version_major()),
            Box::new(MajorVersion::new(
                "agent-version-major",
                Field::AgentVersion,
                Field::AgentVersionMajor,
            )),
        ];
        assert!(matches!(
            validate_pipeline(&pipeline),
            Err(ConfigError::PipelineOrder { .. })
        ));
    }

    #[test]
    fn test_duplicate_writer_is_rejected() {
        let pipeline: Vec<Box<dyn Calculator>> = vec![
            Box::new(MajorVersion::new(
                "first",
                Field::AgentVersion,
                Field::AgentVersionMajor,
            )),
            Box::new(MajorVersion::new(
                "second",
                Field::OperatingSystemVersion,
                Field::AgentVersionMajor,
            )),
        ];
        assert!(matches!(
            validate_pipeline(&pipeline),
            Err(ConfigError::DuplicateWriter { .. })
        ));
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let pipeline = default_pipeline(false);
        let mut map = FieldMap::default();
        map.set(Field::AgentName, "Firefox".to_string());
        map.set(Field::AgentVersion, "2.0.0.11".to_string());
        map.set(Field::OperatingSystemName, "Windows NT".to_string());
        map.set(Field::OperatingSystemVersion, "XP".to_string());

        for calc in &pipeline {
            calc.apply(&mut map);
        }
        let first: Vec<(Field, String)> = Field::ALL
            .iter()
            .map(|&f| (f, map.get(f).to_string()))
            .collect();

        for calc in &pipeline {
            calc.apply(&mut map);
        }
        let second: Vec<(Field, String)> = Field::ALL
            .iter()
            .map(|&f| (f, map.get(f).to_string()))
            .collect();

        assert_eq!(first, second);
    }
}
