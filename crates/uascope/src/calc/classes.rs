//! Class-from-name lookups.

use super::Calculator;
use crate::resolve::FieldMap;
use uascope_fields::Field;

/// Fills a `*Class` field from the corresponding `*Name` field through a
/// closed lookup table. Never overwrites a class a rule already set, and
/// leaves the default on a table miss.
pub(crate) struct ClassFromName {
    name: &'static str,
    name_field: Field,
    class_field: Field,
    table: &'static [(&'static str, &'static str)],
}

const AGENT_CLASSES: &[(&str, &str)] = &[
    ("firefox", "Browser"),
    ("chrome", "Browser"),
    ("chromium", "Browser"),
    ("edge", "Browser"),
    ("opera", "Browser"),
    ("safari", "Browser"),
    ("internet explorer", "Browser"),
    ("samsung internet", "Browser"),
    ("curl", "Special"),
    ("wget", "Special"),
];

const OS_CLASSES: &[(&str, &str)] = &[
    ("windows nt", "Desktop"),
    ("windows", "Desktop"),
    ("windows phone", "Mobile"),
    ("linux", "Desktop"),
    ("mac os x", "Desktop"),
    ("ios", "Mobile"),
    ("android", "Mobile"),
    ("chrome os", "Desktop"),
];

const ENGINE_CLASSES: &[(&str, &str)] = &[
    ("gecko", "Browser"),
    ("applewebkit", "Browser"),
    ("blink", "Browser"),
    ("trident", "Browser"),
    ("presto", "Browser"),
    ("khtml", "Browser"),
    ("edgehtml", "Browser"),
];

impl ClassFromName {
    pub fn agent() -> Self {
        Self {
            name: "agent-class",
            name_field: Field::AgentName,
            class_field: Field::AgentClass,
            table: AGENT_CLASSES,
        }
    }

    pub fn operating_system() -> Self {
        Self {
            name: "os-class",
            name_field: Field::OperatingSystemName,
            class_field: Field::OperatingSystemClass,
            table: OS_CLASSES,
        }
    }

    pub fn layout_engine() -> Self {
        Self {
            name: "engine-class",
            name_field: Field::LayoutEngineName,
            class_field: Field::LayoutEngineClass,
            table: ENGINE_CLASSES,
        }
    }
}

impl Calculator for ClassFromName {
    fn name(&self) -> &'static str {
        self.name
    }

    fn reads(&self) -> Vec<Field> {
        vec![self.name_field]
    }

    fn writes(&self) -> Vec<Field> {
        vec![self.class_field]
    }

    fn apply(&self, map: &mut FieldMap) {
        if map.is_set(self.class_field) || !map.is_set(self.name_field) {
            return;
        }
        let name = map.get(self.name_field).to_lowercase();
        if let Some((_, class)) = self.table.iter().find(|(n, _)| *n == name) {
            map.set(self.class_field, (*class).to_string());
        }
    }
}
