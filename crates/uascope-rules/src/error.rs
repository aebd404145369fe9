//! Error types for rule compilation.

use std::fmt;

/// Result type alias for rule operations.
pub type Result<T> = std::result::Result<T, RuleError>;

/// Error raised while compiling a rule set.
///
/// Evaluation of a compiled rule set cannot fail; everything that could go
/// wrong is rejected here, at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// A matcher is structurally invalid (empty extract list, step sequence
    /// that addresses the wrong token level, ...).
    InvalidMatcher(String),

    /// A value expression references a lookup table that was never
    /// registered with the builder.
    UnknownTable {
        /// Name of the offending matcher.
        matcher: String,
        /// Name of the missing table.
        table: String,
    },

    /// A regex predicate failed to compile.
    InvalidRegex(String),

    /// A required word literal is empty or not lowercase.
    InvalidWord(String),
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleError::InvalidMatcher(msg) => write!(f, "Invalid matcher: {}", msg),
            RuleError::UnknownTable { matcher, table } => {
                write!(f, "Matcher '{}' references unknown table '{}'", matcher, table)
            }
            RuleError::InvalidRegex(msg) => write!(f, "Invalid regex: {}", msg),
            RuleError::InvalidWord(msg) => write!(f, "Invalid required word: {}", msg),
        }
    }
}

impl std::error::Error for RuleError {}
