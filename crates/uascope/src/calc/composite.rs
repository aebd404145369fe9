//! Name + version composition.

use super::Calculator;
use crate::resolve::FieldMap;
use uascope_fields::Field;

/// Composes `<Name> <Version>` into a combined field.
///
/// Always writes, so `AgentNameVersion == AgentName + " " + AgentVersion`
/// holds for every record, including `"Unknown ??"` for agents nothing
/// matched. An optional cleanup hook rewrites awkward well-known
/// combinations (`Windows NT XP` → `Windows XP`).
pub(crate) struct NameVersionComposite {
    name: &'static str,
    name_field: Field,
    version_field: Field,
    target: Field,
    cleanup: Option<fn(&str) -> Option<&'static str>>,
}

impl NameVersionComposite {
    pub fn agent_name_version() -> Self {
        Self {
            name: "agent-name-version",
            name_field: Field::AgentName,
            version_field: Field::AgentVersion,
            target: Field::AgentNameVersion,
            cleanup: None,
        }
    }

    pub fn agent_name_version_major() -> Self {
        Self {
            name: "agent-name-version-major",
            name_field: Field::AgentName,
            version_field: Field::AgentVersionMajor,
            target: Field::AgentNameVersionMajor,
            cleanup: None,
        }
    }

    pub fn engine_name_version() -> Self {
        Self {
            name: "engine-name-version",
            name_field: Field::LayoutEngineName,
            version_field: Field::LayoutEngineVersion,
            target: Field::LayoutEngineNameVersion,
            cleanup: None,
        }
    }

    pub fn engine_name_version_major() -> Self {
        Self {
            name: "engine-name-version-major",
            name_field: Field::LayoutEngineName,
            version_field: Field::LayoutEngineVersionMajor,
            target: Field::LayoutEngineNameVersionMajor,
            cleanup: None,
        }
    }

    pub fn operating_system_name_version() -> Self {
        Self {
            name: "os-name-version",
            name_field: Field::OperatingSystemName,
            version_field: Field::OperatingSystemVersion,
            target: Field::OperatingSystemNameVersion,
            cleanup: Some(cleanup_os_combination),
        }
    }

    pub fn operating_system_name_version_major() -> Self {
        Self {
            name: "os-name-version-major",
            name_field: Field::OperatingSystemName,
            version_field: Field::OperatingSystemVersionMajor,
            target: Field::OperatingSystemNameVersionMajor,
            cleanup: Some(cleanup_os_combination),
        }
    }
}

impl Calculator for NameVersionComposite {
    fn name(&self) -> &'static str {
        self.name
    }

    fn reads(&self) -> Vec<Field> {
        vec![self.name_field, self.version_field]
    }

    fn writes(&self) -> Vec<Field> {
        vec![self.target]
    }

    fn apply(&self, map: &mut FieldMap) {
        let combined = format!("{} {}", map.get(self.name_field), map.get(self.version_field));
        let combined = match self.cleanup.and_then(|f| f(&combined)) {
            Some(replacement) => replacement.to_string(),
            None => combined,
        };
        map.set(self.target, combined);
    }
}

/// Well-known OS name/version combinations that read better in their
/// marketed form.
fn cleanup_os_combination(combined: &str) -> Option<&'static str> {
    let c = combined.to_lowercase();
    Some(match c.as_str() {
        "windows nt 2000" => "Windows 2000",
        "windows nt xp" => "Windows XP",
        "windows nt xp x64 edition" => "Windows XP x64 Edition",
        "windows nt vista" => "Windows Vista",
        "windows nt 7" => "Windows 7",
        "windows nt 8" => "Windows 8",
        "windows nt 8.1" => "Windows 8.1",
        "windows nt 10" => "Windows 10",
        "windows nt 11" => "Windows 11",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_composition() {
        let calc = NameVersionComposite::agent_name_version();
        let mut map = FieldMap::default();
        map.set(Field::AgentName, "Firefox".to_string());
        map.set(Field::AgentVersion, "2.0.0.11".to_string());
        calc.apply(&mut map);
        assert_eq!(map.get(Field::AgentNameVersion), "Firefox 2.0.0.11");
    }

    #[test]
    fn test_unknown_version_composes_with_sentinel() {
        let calc = NameVersionComposite::operating_system_name_version();
        let mut map = FieldMap::default();
        map.set(Field::OperatingSystemName, "Linux".to_string());
        calc.apply(&mut map);
        assert_eq!(map.get(Field::OperatingSystemNameVersion), "Linux ??");
    }

    #[test]
    fn test_fully_unset_composes_defaults() {
        let calc = NameVersionComposite::agent_name_version();
        let mut map = FieldMap::default();
        calc.apply(&mut map);
        assert_eq!(map.get(Field::AgentNameVersion), "Unknown ??");
    }

    #[test]
    fn test_windows_combinations_are_cleaned_up() {
        let calc = NameVersionComposite::operating_system_name_version();
        let mut map = FieldMap::default();
        map.set(Field::OperatingSystemName, "Windows NT".to_string());
        map.set(Field::OperatingSystemVersion, "XP".to_string());
        calc.apply(&mut map);
        assert_eq!(map.get(Field::OperatingSystemNameVersion), "Windows XP");

        map.set(Field::OperatingSystemVersion, "8.1".to_string());
        calc.apply(&mut map);
        assert_eq!(map.get(Field::OperatingSystemNameVersion), "Windows 8.1");

        // Unmapped combinations pass through.
        map.set(Field::OperatingSystemVersion, "3.51".to_string());
        calc.apply(&mut map);
        assert_eq!(map.get(Field::OperatingSystemNameVersion), "Windows NT 3.51");
    }
}
