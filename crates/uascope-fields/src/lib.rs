//! Field catalog for the uascope ecosystem.
//!
//! This crate provides the closed set of output fields an analysis can
//! produce, together with each field's kind and default sentinel. It is
//! shared by the rule, tokenizer and analyzer crates so that matchers,
//! calculators and results all speak the same vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default sentinel for categorical fields that no rule proposed a value for.
pub const UNKNOWN: &str = "Unknown";

/// Default sentinel for version-shaped fields that no rule proposed a value for.
pub const UNKNOWN_VERSION: &str = "??";

/// A named output slot in the analysis result.
///
/// The catalog is closed: every value an analysis emits is keyed by one of
/// these fields. Unset fields hold [`Field::default_value`] rather than an
/// empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    /// Kind of device: Desktop, Phone, Tablet, Robot, Hacker, ...
    DeviceClass,
    /// Marketed name of the device (e.g. "Apple iPhone").
    DeviceName,
    /// Brand of the device (e.g. "Apple", "Google").
    DeviceBrand,
    /// CPU family of the device (e.g. "Intel x86_64").
    DeviceCpu,
    /// CPU word width in bits ("32", "64").
    DeviceCpuBits,
    /// Kind of operating system: Desktop, Mobile, Cloud, ...
    OperatingSystemClass,
    /// Name of the operating system (e.g. "Windows NT", "Linux").
    OperatingSystemName,
    /// Version of the operating system (e.g. "XP", "5.13.0").
    OperatingSystemVersion,
    /// Major component of the operating system version.
    OperatingSystemVersionMajor,
    /// Combined operating system name and version.
    OperatingSystemNameVersion,
    /// Combined operating system name and major version.
    OperatingSystemNameVersionMajor,
    /// Kind of layout engine: Browser, Robot, ...
    LayoutEngineClass,
    /// Name of the layout engine (e.g. "Gecko", "Blink").
    LayoutEngineName,
    /// Version of the layout engine.
    LayoutEngineVersion,
    /// Major component of the layout engine version.
    LayoutEngineVersionMajor,
    /// Combined layout engine name and version.
    LayoutEngineNameVersion,
    /// Combined layout engine name and major version.
    LayoutEngineNameVersionMajor,
    /// Build identifier of the layout engine (e.g. Gecko build date).
    LayoutEngineBuild,
    /// Kind of agent: Browser, Robot, Special, Hacker, ...
    AgentClass,
    /// Name of the agent (e.g. "Firefox", "Chrome").
    AgentName,
    /// Version of the agent.
    AgentVersion,
    /// Major component of the agent version.
    AgentVersionMajor,
    /// Combined agent name and version.
    AgentNameVersion,
    /// Combined agent name and major version.
    AgentNameVersionMajor,
    /// Human readable agent language (e.g. "English (United States)").
    AgentLanguage,
    /// Agent language code as sent on the wire (e.g. "en-us").
    AgentLanguageCode,
    /// Security level claimed by the agent ("Strong security", ...).
    AgentSecurity,
}

/// Shape of a field's values, deciding its default sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free-form categorical value; defaults to `"Unknown"`.
    Categorical,
    /// Version-shaped value; defaults to `"??"`.
    Version,
}

impl Field {
    /// All fields, in catalog order.
    ///
    /// This is the order `field_names()` and full-map conversions use.
    pub const ALL: [Field; 27] = [
        Field::DeviceClass,
        Field::DeviceName,
        Field::DeviceBrand,
        Field::DeviceCpu,
        Field::DeviceCpuBits,
        Field::OperatingSystemClass,
        Field::OperatingSystemName,
        Field::OperatingSystemVersion,
        Field::OperatingSystemVersionMajor,
        Field::OperatingSystemNameVersion,
        Field::OperatingSystemNameVersionMajor,
        Field::LayoutEngineClass,
        Field::LayoutEngineName,
        Field::LayoutEngineVersion,
        Field::LayoutEngineVersionMajor,
        Field::LayoutEngineNameVersion,
        Field::LayoutEngineNameVersionMajor,
        Field::LayoutEngineBuild,
        Field::AgentClass,
        Field::AgentName,
        Field::AgentVersion,
        Field::AgentVersionMajor,
        Field::AgentNameVersion,
        Field::AgentNameVersionMajor,
        Field::AgentLanguage,
        Field::AgentLanguageCode,
        Field::AgentSecurity,
    ];

    /// The field's name as it appears in results and header maps.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::DeviceClass => "DeviceClass",
            Field::DeviceName => "DeviceName",
            Field::DeviceBrand => "DeviceBrand",
            Field::DeviceCpu => "DeviceCpu",
            Field::DeviceCpuBits => "DeviceCpuBits",
            Field::OperatingSystemClass => "OperatingSystemClass",
            Field::OperatingSystemName => "OperatingSystemName",
            Field::OperatingSystemVersion => "OperatingSystemVersion",
            Field::OperatingSystemVersionMajor => "OperatingSystemVersionMajor",
            Field::OperatingSystemNameVersion => "OperatingSystemNameVersion",
            Field::OperatingSystemNameVersionMajor => "OperatingSystemNameVersionMajor",
            Field::LayoutEngineClass => "LayoutEngineClass",
            Field::LayoutEngineName => "LayoutEngineName",
            Field::LayoutEngineVersion => "LayoutEngineVersion",
            Field::LayoutEngineVersionMajor => "LayoutEngineVersionMajor",
            Field::LayoutEngineNameVersion => "LayoutEngineNameVersion",
            Field::LayoutEngineNameVersionMajor => "LayoutEngineNameVersionMajor",
            Field::LayoutEngineBuild => "LayoutEngineBuild",
            Field::AgentClass => "AgentClass",
            Field::AgentName => "AgentName",
            Field::AgentVersion => "AgentVersion",
            Field::AgentVersionMajor => "AgentVersionMajor",
            Field::AgentNameVersion => "AgentNameVersion",
            Field::AgentNameVersionMajor => "AgentNameVersionMajor",
            Field::AgentLanguage => "AgentLanguage",
            Field::AgentLanguageCode => "AgentLanguageCode",
            Field::AgentSecurity => "AgentSecurity",
        }
    }

    /// Look a field up by its result name. Returns `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.as_str() == name)
    }

    /// The shape of this field's values.
    pub fn kind(&self) -> FieldKind {
        match self {
            Field::OperatingSystemVersion
            | Field::OperatingSystemVersionMajor
            | Field::OperatingSystemNameVersion
            | Field::OperatingSystemNameVersionMajor
            | Field::LayoutEngineVersion
            | Field::LayoutEngineVersionMajor
            | Field::LayoutEngineNameVersion
            | Field::LayoutEngineNameVersionMajor
            | Field::LayoutEngineBuild
            | Field::AgentVersion
            | Field::AgentVersionMajor
            | Field::AgentNameVersion
            | Field::AgentNameVersionMajor => FieldKind::Version,
            _ => FieldKind::Categorical,
        }
    }

    /// The sentinel this field holds when no rule proposed a value.
    pub fn default_value(&self) -> &'static str {
        match self.kind() {
            FieldKind::Categorical => UNKNOWN,
            FieldKind::Version => UNKNOWN_VERSION,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
