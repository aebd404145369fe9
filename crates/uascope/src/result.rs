//! Frozen analysis results.

use crate::resolve::FieldMap;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use uascope_fields::{Field, UNKNOWN};

/// Immutable result of analyzing one user agent.
///
/// Records are frozen at creation and shared as `Arc<AgentRecord>`; they are
/// safe to read from any number of threads and stay valid after the cache
/// that produced them is cleared or dropped.
#[derive(Debug, Clone)]
pub struct AgentRecord {
    raw: String,
    fields: FxHashMap<Field, String>,
    catalog: Vec<Field>,
}

impl AgentRecord {
    /// Freeze a field map into a record covering `catalog`.
    pub(crate) fn freeze(raw: String, map: &FieldMap, catalog: &[Field]) -> Self {
        let fields = catalog
            .iter()
            .map(|&f| (f, map.get(f).to_string()))
            .collect();
        Self {
            raw,
            fields,
            catalog: catalog.to_vec(),
        }
    }

    /// The raw user-agent string this record was computed from.
    pub fn user_agent(&self) -> &str {
        &self.raw
    }

    /// Value of one field. Fields outside the analyzer's configured output
    /// set read as their default sentinel; values are never empty.
    pub fn get(&self, field: Field) -> &str {
        self.fields
            .get(&field)
            .map(String::as_str)
            .unwrap_or_else(|| field.default_value())
    }

    /// Value of one field by name. Unknown names read as `"Unknown"`.
    pub fn get_by_name(&self, name: &str) -> &str {
        match Field::from_name(name) {
            Some(field) => self.get(field),
            None => UNKNOWN,
        }
    }

    /// Names of the fields this record carries, in catalog order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.catalog.iter().map(|f| f.as_str()).collect()
    }

    /// All carried fields as a sorted name → value map.
    pub fn to_map(&self) -> BTreeMap<&'static str, String> {
        self.catalog
            .iter()
            .map(|&f| (f.as_str(), self.get(f).to_string()))
            .collect()
    }

    /// A subset of fields as a sorted name → value map. Unknown names map
    /// to `"Unknown"`.
    pub fn to_map_of<'a>(&self, names: &[&'a str]) -> BTreeMap<&'a str, String> {
        names
            .iter()
            .map(|&n| (n, self.get_by_name(n).to_string()))
            .collect()
    }
}
