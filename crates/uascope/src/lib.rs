//! uascope - User-Agent Analysis for Data Pipelines
//!
//! uascope parses HTTP `User-Agent` strings (and the newer `Sec-Ch-Ua-*`
//! Client Hints headers) into a closed catalog of named fields: device,
//! operating system, layout engine and agent. It is built to sit inside
//! high-volume enrichment paths (SQL UDFs, stream processors, log
//! analyzers): one immutable analyzer shared by many threads, a bounded
//! LRU parse cache in front, and a total parse operation that never fails.
//!
//! # Quick Start
//!
//! ```
//! use uascope::{Field, UserAgentAnalyzer};
//!
//! let analyzer = UserAgentAnalyzer::builder()
//!     .cache_size(10_000)
//!     .build()?;
//!
//! let record = analyzer.parse(
//!     "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
//!      Chrome/100.0.4896.127 Safari/537.36",
//! );
//! assert_eq!(record.get(Field::AgentName), "Chrome");
//! assert_eq!(record.get(Field::OperatingSystemName), "Linux");
//! assert_eq!(record.get(Field::DeviceCpu), "Intel x86_64");
//! # Ok::<(), uascope::ConfigError>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! raw input ──► parse cache ──► tokenizer ──► candidate lookup ──► matcher
//!                 (LRU)          (uascope-token)  (word index)      engine
//!                                                                 (uascope-rules)
//!                                                                     │
//!              frozen record ◄── calculators ◄── field resolver ◄── proposals
//! ```
//!
//! The rule store and all post-processing tables are immutable after
//! construction and shared by reference; the cache is the only component
//! that takes a lock, and never across a parse computation.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod analyzer;
mod builder;
mod cache;
mod calc;
mod error;
mod hints;
mod resolve;
mod result;
mod rules;
mod stats;

pub use analyzer::UserAgentAnalyzer;
pub use builder::{UserAgentAnalyzerBuilder, DEFAULT_PARSE_CACHE_SIZE};
pub use cache::{CacheInstantiator, CacheStore};
pub use error::{ConfigError, Result};
pub use result::AgentRecord;
pub use stats::{AnalyzerStats, AnalyzerStatsSnapshot};

/// The field catalog, re-exported for callers.
pub use uascope_fields::{Field, FieldKind, UNKNOWN, UNKNOWN_VERSION};

/// Rule compilation surface, for callers supplying their own rule store.
pub use uascope_rules::{
    CommentSel, Extract, LookupDefault, MatcherSpec, Predicate, ProductSel, Proposal, RuleError,
    RuleStore, RuleStoreBuilder, Step, ValueExpr,
};

/// Library version string.
pub const UASCOPE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!UASCOPE_VERSION.is_empty());
    }

    #[test]
    fn test_analyzer_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<UserAgentAnalyzer>();
        assert_sync::<UserAgentAnalyzer>();
        assert_send::<AgentRecord>();
        assert_sync::<AgentRecord>();
    }
}
