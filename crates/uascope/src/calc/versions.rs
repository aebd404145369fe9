//! Version-shaped field derivations.

use super::Calculator;
use crate::resolve::FieldMap;
use uascope_fields::{Field, UNKNOWN_VERSION};

/// Derives `*VersionMajor` from `*Version`: the substring up to the first
/// dot. `"??"` propagates unchanged; unset sources leave the target unset.
pub(crate) struct MajorVersion {
    name: &'static str,
    from: Field,
    to: Field,
}

impl MajorVersion {
    pub fn new(name: &'static str, from: Field, to: Field) -> Self {
        Self { name, from, to }
    }
}

impl Calculator for MajorVersion {
    fn name(&self) -> &'static str {
        self.name
    }

    fn reads(&self) -> Vec<Field> {
        vec![self.from]
    }

    fn writes(&self) -> Vec<Field> {
        vec![self.to]
    }

    fn apply(&self, map: &mut FieldMap) {
        if !map.is_set(self.from) {
            return;
        }
        let version = map.get(self.from);
        let major = if version == UNKNOWN_VERSION {
            UNKNOWN_VERSION.to_string()
        } else {
            version
                .split('.')
                .next()
                .unwrap_or(UNKNOWN_VERSION)
                .to_string()
        };
        map.set(self.to, major);
    }
}

/// Trims configured version fields to their first two dot-segments
/// (the `show_minimal_version` builder option).
pub(crate) struct MinimalVersion {
    fields: Vec<Field>,
}

impl MinimalVersion {
    pub fn standard() -> Self {
        Self {
            fields: vec![
                Field::AgentVersion,
                Field::OperatingSystemVersion,
                Field::LayoutEngineVersion,
            ],
        }
    }
}

impl Calculator for MinimalVersion {
    fn name(&self) -> &'static str {
        "minimal-version"
    }

    fn reads(&self) -> Vec<Field> {
        self.fields.clone()
    }

    fn writes(&self) -> Vec<Field> {
        self.fields.clone()
    }

    fn apply(&self, map: &mut FieldMap) {
        for &field in &self.fields {
            if !map.is_set(field) {
                continue;
            }
            let version = map.get(field);
            if version == UNKNOWN_VERSION || !version.contains('.') {
                continue;
            }
            let trimmed: String = version.split('.').take(2).collect::<Vec<_>>().join(".");
            map.set(field, trimmed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_major_version() {
        let calc = MajorVersion::new("t", Field::AgentVersion, Field::AgentVersionMajor);
        let mut map = FieldMap::default();

        map.set(Field::AgentVersion, "2.0.0.11".to_string());
        calc.apply(&mut map);
        assert_eq!(map.get(Field::AgentVersionMajor), "2");

        map.set(Field::AgentVersion, "XP".to_string());
        calc.apply(&mut map);
        assert_eq!(map.get(Field::AgentVersionMajor), "XP");

        map.set(Field::AgentVersion, "??".to_string());
        calc.apply(&mut map);
        assert_eq!(map.get(Field::AgentVersionMajor), "??");
    }

    #[test]
    fn test_major_version_leaves_unset_alone() {
        let calc = MajorVersion::new("t", Field::AgentVersion, Field::AgentVersionMajor);
        let mut map = FieldMap::default();
        calc.apply(&mut map);
        assert!(!map.is_set(Field::AgentVersionMajor));
        assert_eq!(map.get(Field::AgentVersionMajor), "??");
    }

    #[test]
    fn test_minimal_version_trims_to_two_segments() {
        let calc = MinimalVersion::standard();
        let mut map = FieldMap::default();
        map.set(Field::AgentVersion, "100.0.4896.127".to_string());
        map.set(Field::OperatingSystemVersion, "XP".to_string());
        calc.apply(&mut map);
        assert_eq!(map.get(Field::AgentVersion), "100.0");
        assert_eq!(map.get(Field::OperatingSystemVersion), "XP");
        assert_eq!(map.get(Field::LayoutEngineVersion), "??");
    }
}
