//! Tokenizer for user-agent strings.
//!
//! Splits a raw `User-Agent` value into a structured token tree:
//!
//! ```text
//! Mozilla/5.0 (Windows; U; Windows NT 5.1; en-US; rv:1.8.1.11) Gecko/20071127 Firefox/2.0.0.11
//! └┬─────┴┬─┘ └──────────────────┬──────────────────────────┘  └────┬─────┘
//!  name  version          comment list (split on ';')           more products
//! ```
//!
//! Tokenization is pure and total: any input, including empty or malformed
//! strings, produces a best-effort tree. Unbalanced quotes and parentheses
//! are closed at end of input. Position indices (product index, comment
//! index) are preserved so matchers can address tokens without re-parsing.
//!
//! The crate also provides [`words`], the lowercased word set of an input,
//! which feeds the rule store's candidate index.

mod tokenizer;
mod tree;

pub use tokenizer::{tokenize, words};
pub use tree::{Comment, CommentEntry, Product, TokenTree};
