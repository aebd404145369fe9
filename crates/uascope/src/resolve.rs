//! Field resolution: proposals in, one winning value per field out.

use rustc_hash::FxHashMap;
use uascope_fields::Field;
use uascope_rules::Proposal;

/// One resolved field value with the provenance the tie-break needs.
#[derive(Debug, Clone)]
pub(crate) struct FieldValue {
    pub value: String,
    pub confidence: u32,
    pub matcher: u32,
}

/// Mutable field map the resolver and calculators work on.
///
/// Fields absent from the map are unset and read as their default sentinel.
/// Once the analyzer freezes the map into a record, nothing mutates it again.
#[derive(Debug, Default)]
pub(crate) struct FieldMap {
    values: FxHashMap<Field, FieldValue>,
}

impl FieldMap {
    /// Current value of a field, or its default sentinel when unset.
    pub fn get(&self, field: Field) -> &str {
        self.values
            .get(&field)
            .map(|v| v.value.as_str())
            .unwrap_or_else(|| field.default_value())
    }

    /// Whether any proposal or calculator set this field.
    pub fn is_set(&self, field: Field) -> bool {
        self.values.contains_key(&field)
    }

    /// Calculator write. Overwrites unconditionally.
    pub fn set(&mut self, field: Field, value: String) {
        self.values.insert(
            field,
            FieldValue {
                value,
                confidence: 1,
                matcher: u32::MAX,
            },
        );
    }
}

/// Select the winning proposal per field.
///
/// Higher confidence wins; equal confidence resolves to the matcher that was
/// loaded earlier. Zero-confidence and empty-valued proposals never count.
pub(crate) fn resolve(proposals: Vec<Proposal>) -> FieldMap {
    let mut map = FieldMap::default();
    for p in proposals {
        if p.confidence == 0 || p.value.is_empty() {
            continue;
        }
        let wins = match map.values.get(&p.field) {
            Some(current) => {
                p.confidence > current.confidence
                    || (p.confidence == current.confidence && p.matcher < current.matcher)
            }
            None => true,
        };
        if wins {
            map.values.insert(
                p.field,
                FieldValue {
                    value: p.value,
                    confidence: p.confidence,
                    matcher: p.matcher,
                },
            );
        }
    }
    map
}
