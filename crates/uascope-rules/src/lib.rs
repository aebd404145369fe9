//! Rule store and matcher engine for user-agent analysis.
//!
//! A compiled rule set is an immutable catalog of matchers. Matching runs in
//! two phases, mirroring literal-prefiltered pattern engines:
//!
//! 1. **Candidate lookup**: every matcher declares required word literals;
//!    an inverted index (word → matcher ids) narrows the input's word set to
//!    the matchers whose required words all occur. False positives are
//!    tolerated, the matcher itself decides.
//! 2. **Verification**: each candidate walks its step expressions against
//!    the token tree. Steps narrow a cursor (product index, comment index)
//!    and apply predicates; any failure yields no proposals. On success,
//!    every extract clause emits one `(field, value, confidence)` proposal.
//!
//! The store is built once by [`RuleStoreBuilder`] and frozen; concurrent
//! readers need no synchronization. Malformed matchers (invalid step
//! sequences, unknown lookup tables, bad regexes) are construction-time
//! errors and can never reach evaluation.

mod error;
mod matcher;
mod store;

pub use error::{Result, RuleError};
pub use matcher::{
    CommentSel, Extract, LookupDefault, Matcher, MatcherSpec, Predicate, ProductSel, Proposal,
    Step, ValueExpr,
};
pub use store::{RuleStore, RuleStoreBuilder};
