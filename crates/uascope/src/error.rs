//! Error types for analyzer construction.
//!
//! Everything that can go wrong is rejected while building the analyzer;
//! the parse path itself is total and maps bad input to sentinel values
//! instead of errors.

use thiserror::Error;
use uascope_fields::Field;

/// Error raised while building a [`UserAgentAnalyzer`](crate::UserAgentAnalyzer).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A rule failed to compile.
    #[error(transparent)]
    Rule(#[from] uascope_rules::RuleError),

    /// A calculator reads a field that only a later calculator writes; the
    /// declared order is not a topological order of the dependency graph.
    #[error("calculator '{calculator}' reads '{field}' before it is written")]
    PipelineOrder {
        /// Offending calculator.
        calculator: &'static str,
        /// Field read too early.
        field: Field,
    },

    /// Two calculators declare the same output field.
    #[error("field '{field}' is written by both '{first}' and '{second}'")]
    DuplicateWriter {
        /// Field with two writers.
        field: Field,
        /// Earlier calculator.
        first: &'static str,
        /// Later calculator.
        second: &'static str,
    },

    /// `with_fields` was given a name outside the field catalog.
    #[error("unknown field name: '{0}'")]
    UnknownField(String),
}

/// Result type alias for analyzer construction.
pub type Result<T> = std::result::Result<T, ConfigError>;
