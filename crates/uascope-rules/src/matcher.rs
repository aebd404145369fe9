//! Compiled matchers and their evaluation against a token tree.

use crate::error::RuleError;
use regex::{Regex, RegexBuilder};
use rustc_hash::FxHashMap;
use uascope_fields::Field;
use uascope_token::{Comment, Product, TokenTree};

/// Lookup tables shared by all matchers of a store. Keys are lowercased.
pub(crate) type Tables = FxHashMap<String, FxHashMap<String, String>>;

/// One value proposed for one field by one matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    /// Target field.
    pub field: Field,
    /// Proposed value, never empty.
    pub value: String,
    /// Weight of the proposal; higher wins, zero never counts as "set".
    pub confidence: u32,
    /// Load-order id of the emitting matcher, the tie-breaker.
    pub matcher: u32,
}

/// A predicate over one addressed string.
///
/// String comparisons are ASCII-case-insensitive, the convention of
/// user-agent matching. Regexes are compiled case-insensitive at
/// construction time.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Exact match.
    Equals(String),
    /// Prefix match.
    StartsWith(String),
    /// Substring match.
    Contains(String),
    /// Regex match.
    Matches(Regex),
    /// The leading `major[.minor]` version of the addressed string lies in
    /// the inclusive range.
    InRange {
        /// Lower bound as (major, minor).
        lo: (u32, u32),
        /// Upper bound as (major, minor).
        hi: (u32, u32),
    },
}

impl Predicate {
    /// Shorthand for [`Predicate::Equals`].
    pub fn eq(s: &str) -> Self {
        Predicate::Equals(s.to_string())
    }

    /// Shorthand for [`Predicate::StartsWith`].
    pub fn starts(s: &str) -> Self {
        Predicate::StartsWith(s.to_string())
    }

    /// Shorthand for [`Predicate::Contains`].
    pub fn contains(s: &str) -> Self {
        Predicate::Contains(s.to_string())
    }

    /// Compile a case-insensitive regex predicate.
    pub fn regex(pattern: &str) -> Result<Self, RuleError> {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map(Predicate::Matches)
            .map_err(|e| RuleError::InvalidRegex(e.to_string()))
    }

    /// Evaluate the predicate against one string.
    pub fn test(&self, text: &str) -> bool {
        match self {
            Predicate::Equals(s) => text.eq_ignore_ascii_case(s),
            Predicate::StartsWith(s) => starts_with_ignore_ascii_case(text, s),
            Predicate::Contains(s) => contains_ignore_ascii_case(text, s),
            Predicate::Matches(re) => re.is_match(text),
            Predicate::InRange { lo, hi } => match leading_version_pair(text) {
                Some(v) => *lo <= v && v <= *hi,
                None => false,
            },
        }
    }
}

fn starts_with_ignore_ascii_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

fn contains_ignore_ascii_case(text: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    if needle.len() > text.len() {
        return false;
    }
    text.as_bytes()
        .windows(needle.len())
        .any(|w| w.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Parse the leading `major[.minor]` pair of a version-like string.
fn leading_version_pair(text: &str) -> Option<(u32, u32)> {
    let mut parts = text.trim().split(|c: char| !c.is_ascii_digit());
    let major: u32 = parts.next()?.parse().ok()?;
    let minor: u32 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    Some((major, minor))
}

/// Product selection within a step walk.
#[derive(Debug, Clone)]
pub enum ProductSel {
    /// Product at a fixed index.
    At(usize),
    /// First product whose name satisfies the predicate.
    Named(Predicate),
}

/// Comment selection within a step walk.
#[derive(Debug, Clone)]
pub enum CommentSel {
    /// Comment at a fixed index.
    At(usize),
    /// First comment whose text satisfies the predicate.
    Matching(Predicate),
}

/// One step of a walk over the token tree.
///
/// Move steps narrow the cursor; predicate steps test it in place. An
/// out-of-range move or a predicate applied at the wrong level is simply
/// false, it never errors.
#[derive(Debug, Clone)]
pub enum Step {
    /// Move from the root to a product.
    Product(ProductSel),
    /// Move from a product to one of its comments.
    Comment(CommentSel),
    /// Move from a comment into its embedded product sequence.
    Embedded(ProductSel),
    /// Test the product name at the cursor.
    Name(Predicate),
    /// Test the product version at the cursor; absent versions fail.
    Version(Predicate),
    /// Test the comment text at the cursor.
    Text(Predicate),
    /// Test the comment key at the cursor; keyless comments fail.
    Key(Predicate),
    /// Test the comment value at the cursor.
    Value(Predicate),
}

/// Position reached by a step walk.
#[derive(Debug, Clone, Copy)]
enum CursorPos<'a> {
    Root,
    Product(&'a Product),
    Comment(&'a Comment),
}

/// Walk a step path from the root. Returns the final position, or `None`
/// when any step fails.
fn walk<'a>(tree: &'a TokenTree, steps: &[Step]) -> Option<CursorPos<'a>> {
    let mut pos = CursorPos::Root;
    for step in steps {
        pos = match (step, pos) {
            (Step::Product(sel), CursorPos::Root) => {
                CursorPos::Product(select_product(&tree.products, sel)?)
            }
            (Step::Comment(sel), CursorPos::Product(p)) => {
                CursorPos::Comment(select_comment(&p.comments, sel)?)
            }
            (Step::Embedded(sel), CursorPos::Comment(c)) => {
                CursorPos::Product(select_product(&c.products, sel)?)
            }
            (Step::Name(pred), CursorPos::Product(p)) => {
                if !pred.test(&p.name) {
                    return None;
                }
                CursorPos::Product(p)
            }
            (Step::Version(pred), CursorPos::Product(p)) => {
                let version = p.version.as_deref()?;
                if !pred.test(version) {
                    return None;
                }
                CursorPos::Product(p)
            }
            (Step::Text(pred), CursorPos::Comment(c)) => {
                if !pred.test(&c.text) {
                    return None;
                }
                CursorPos::Comment(c)
            }
            (Step::Key(pred), CursorPos::Comment(c)) => {
                let key = c.key()?;
                if !pred.test(key) {
                    return None;
                }
                CursorPos::Comment(c)
            }
            (Step::Value(pred), CursorPos::Comment(c)) => {
                if !pred.test(c.value()) {
                    return None;
                }
                CursorPos::Comment(c)
            }
            // Step applied at the wrong level: false, not an error.
            _ => return None,
        };
    }
    Some(pos)
}

fn select_product<'a>(products: &'a [Product], sel: &ProductSel) -> Option<&'a Product> {
    match sel {
        ProductSel::At(i) => products.get(*i),
        ProductSel::Named(pred) => products.iter().find(|p| pred.test(&p.name)),
    }
}

fn select_comment<'a>(comments: &'a [Comment], sel: &CommentSel) -> Option<&'a Comment> {
    match sel {
        CommentSel::At(i) => comments.get(*i),
        CommentSel::Matching(pred) => comments.iter().find(|c| pred.test(&c.text)),
    }
}

/// Value expression evaluated over the position an extract path reached.
///
/// Evaluation returns `None` when no value can be produced (absent version,
/// lookup miss without default, ...); the whole matcher then yields nothing.
#[derive(Debug, Clone)]
pub enum ValueExpr {
    /// A fixed string.
    Literal(String),
    /// Name of the product at the cursor.
    MatchedName,
    /// Version of the product at the cursor.
    MatchedVersion,
    /// Text of the comment at the cursor.
    MatchedText,
    /// Value of the comment at the cursor (`key=value` value, or the text).
    MatchedValue,
    /// Lowercase of the inner expression.
    Lowercase(Box<ValueExpr>),
    /// First whitespace-separated word of the inner expression.
    FirstWord(Box<ValueExpr>),
    /// First version-shaped word (`16_6`, `5.1`, `10.15.7`) of the inner
    /// expression, with underscores normalized to dots.
    VersionWord(Box<ValueExpr>),
    /// First `segments` dot-separated components of the inner expression.
    SegmentPrefix {
        /// Inner expression.
        expr: Box<ValueExpr>,
        /// Number of components to keep.
        segments: usize,
    },
    /// Inner expression truncated before the first occurrence of `marker`.
    /// Passes the value through unchanged when the marker is absent.
    StripAfter {
        /// Inner expression.
        expr: Box<ValueExpr>,
        /// Marker to cut at.
        marker: String,
    },
    /// Value looked up in a named table registered with the store builder.
    Lookup {
        /// Table name.
        table: String,
        /// Expression producing the key; lowercased before lookup.
        key: Box<ValueExpr>,
        /// Behavior on a missing key.
        default: LookupDefault,
    },
}

/// What a [`ValueExpr::Lookup`] produces when the key is absent.
#[derive(Debug, Clone)]
pub enum LookupDefault {
    /// No value: the matcher yields nothing.
    Fail,
    /// The key itself, as computed (not lowercased).
    Key,
    /// A fixed fallback value.
    Value(String),
}

impl ValueExpr {
    /// Lookup with no default.
    pub fn lookup(table: &str, key: ValueExpr) -> Self {
        ValueExpr::Lookup {
            table: table.to_string(),
            key: Box::new(key),
            default: LookupDefault::Fail,
        }
    }

    /// Lookup falling back to the key itself.
    pub fn lookup_or_key(table: &str, key: ValueExpr) -> Self {
        ValueExpr::Lookup {
            table: table.to_string(),
            key: Box::new(key),
            default: LookupDefault::Key,
        }
    }

    fn eval(&self, pos: CursorPos<'_>, tables: &Tables) -> Option<String> {
        match self {
            ValueExpr::Literal(s) => Some(s.clone()),
            ValueExpr::MatchedName => match pos {
                CursorPos::Product(p) => Some(p.name.clone()),
                _ => None,
            },
            ValueExpr::MatchedVersion => match pos {
                CursorPos::Product(p) => p.version.clone(),
                _ => None,
            },
            ValueExpr::MatchedText => match pos {
                CursorPos::Comment(c) => Some(c.text.clone()),
                _ => None,
            },
            ValueExpr::MatchedValue => match pos {
                CursorPos::Comment(c) => Some(c.value().to_string()),
                _ => None,
            },
            ValueExpr::Lowercase(inner) => Some(inner.eval(pos, tables)?.to_lowercase()),
            ValueExpr::FirstWord(inner) => {
                let v = inner.eval(pos, tables)?;
                v.split_whitespace().next().map(str::to_string)
            }
            ValueExpr::VersionWord(inner) => {
                let v = inner.eval(pos, tables)?;
                first_version_word(&v)
            }
            ValueExpr::SegmentPrefix { expr, segments } => {
                let v = expr.eval(pos, tables)?;
                Some(
                    v.split('.')
                        .take((*segments).max(1))
                        .collect::<Vec<_>>()
                        .join("."),
                )
            }
            ValueExpr::StripAfter { expr, marker } => {
                let v = expr.eval(pos, tables)?;
                match v.find(marker.as_str()) {
                    Some(i) => Some(v[..i].trim_end().to_string()),
                    None => Some(v),
                }
            }
            ValueExpr::Lookup {
                table,
                key,
                default,
            } => {
                let key = key.eval(pos, tables)?;
                let entry = tables
                    .get(table)
                    .and_then(|t| t.get(&key.to_lowercase()))
                    .cloned();
                match (entry, default) {
                    (Some(v), _) => Some(v),
                    (None, LookupDefault::Fail) => None,
                    (None, LookupDefault::Key) => Some(key),
                    (None, LookupDefault::Value(v)) => Some(v.clone()),
                }
            }
        }
    }

    /// Names of all lookup tables this expression references.
    pub(crate) fn table_refs(&self, out: &mut Vec<String>) {
        match self {
            ValueExpr::Lookup { table, key, .. } => {
                out.push(table.clone());
                key.table_refs(out);
            }
            ValueExpr::Lowercase(inner)
            | ValueExpr::FirstWord(inner)
            | ValueExpr::VersionWord(inner) => inner.table_refs(out),
            ValueExpr::SegmentPrefix { expr, .. } | ValueExpr::StripAfter { expr, .. } => {
                expr.table_refs(out)
            }
            _ => {}
        }
    }
}

/// First token that looks like a version number. Underscore-separated
/// versions (`10_15_7`) are normalized to dots. Tokens also split on `/`,
/// so `Trident/7.0` yields `7.0`.
fn first_version_word(text: &str) -> Option<String> {
    for token in text.split(|c: char| c.is_whitespace() || c == '/') {
        let token = token.trim_matches(|c: char| !c.is_ascii_alphanumeric());
        if token.chars().next().is_some_and(|c| c.is_ascii_digit())
            && token
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '.' | '_'))
        {
            return Some(token.replace('_', "."));
        }
    }
    None
}

/// One extract clause: where to look, what to emit, how sure we are.
#[derive(Debug, Clone)]
pub struct Extract {
    /// Target field.
    pub field: Field,
    /// Confidence of the emitted proposal.
    pub confidence: u32,
    /// Path walked from the root to the value's position.
    pub path: Vec<Step>,
    /// Expression producing the value at that position.
    pub value: ValueExpr,
}

/// A compiled matcher: index words, requirements, extracts.
#[derive(Debug, Clone)]
pub struct Matcher {
    pub(crate) id: u32,
    pub(crate) name: String,
    pub(crate) required_words: Vec<String>,
    pub(crate) requires: Vec<Vec<Step>>,
    pub(crate) extracts: Vec<Extract>,
}

impl Matcher {
    /// Diagnostic name of this matcher.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Load-order id, the resolver's tie-breaker.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Required word literals used for candidate lookup.
    pub fn required_words(&self) -> &[String] {
        &self.required_words
    }

    /// Evaluate this matcher against a token tree.
    ///
    /// Appends one proposal per extract clause to `out` when every
    /// requirement and every extract resolves; appends nothing otherwise.
    /// Returns whether the matcher fired.
    pub(crate) fn evaluate(
        &self,
        tree: &TokenTree,
        tables: &Tables,
        out: &mut Vec<Proposal>,
    ) -> bool {
        for require in &self.requires {
            if walk(tree, require).is_none() {
                return false;
            }
        }

        let mut proposals = Vec::with_capacity(self.extracts.len());
        for extract in &self.extracts {
            let Some(pos) = walk(tree, &extract.path) else {
                return false;
            };
            let Some(value) = extract.value.eval(pos, tables) else {
                return false;
            };
            if value.is_empty() {
                return false;
            }
            proposals.push(Proposal {
                field: extract.field,
                value,
                confidence: extract.confidence,
                matcher: self.id,
            });
        }

        out.extend(proposals);
        true
    }
}

/// Declarative matcher description consumed by the store builder.
///
/// # Examples
///
/// ```
/// use uascope_fields::Field;
/// use uascope_rules::{MatcherSpec, Predicate, ProductSel, Step, ValueExpr};
///
/// let spec = MatcherSpec::new("agent: firefox")
///     .word("firefox")
///     .extract(
///         Field::AgentName,
///         500,
///         vec![Step::Product(ProductSel::Named(Predicate::eq("Firefox")))],
///         ValueExpr::Literal("Firefox".to_string()),
///     )
///     .extract(
///         Field::AgentVersion,
///         500,
///         vec![Step::Product(ProductSel::Named(Predicate::eq("Firefox")))],
///         ValueExpr::MatchedVersion,
///     );
/// assert_eq!(spec.required_words, vec!["firefox"]);
/// ```
#[derive(Debug, Clone)]
pub struct MatcherSpec {
    /// Diagnostic name.
    pub name: String,
    /// Word literals for the candidate index, lowercased by the builder.
    pub required_words: Vec<String>,
    /// Paths that must all resolve for the matcher to fire.
    pub requires: Vec<Vec<Step>>,
    /// Extract clauses.
    pub extracts: Vec<Extract>,
}

impl MatcherSpec {
    /// Start a new spec with the given diagnostic name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            required_words: Vec::new(),
            requires: Vec::new(),
            extracts: Vec::new(),
        }
    }

    /// Add a required word literal.
    pub fn word(mut self, word: &str) -> Self {
        self.required_words.push(word.to_lowercase());
        self
    }

    /// Add a requirement path.
    pub fn require(mut self, steps: Vec<Step>) -> Self {
        self.requires.push(steps);
        self
    }

    /// Add an extract clause.
    pub fn extract(
        mut self,
        field: Field,
        confidence: u32,
        path: Vec<Step>,
        value: ValueExpr,
    ) -> Self {
        self.extracts.push(Extract {
            field,
            confidence,
            path,
            value,
        });
        self
    }

    /// Validate step-walk level transitions; used by the store builder.
    pub(crate) fn validate_steps(&self) -> Result<(), RuleError> {
        for steps in self.requires.iter().chain(self.extracts.iter().map(|e| &e.path)) {
            validate_path(&self.name, steps)?;
        }
        if self.extracts.is_empty() {
            return Err(RuleError::InvalidMatcher(format!(
                "matcher '{}' has no extract clauses",
                self.name
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Level {
    Root,
    Product,
    Comment,
}

fn validate_path(name: &str, steps: &[Step]) -> Result<(), RuleError> {
    let mut level = Level::Root;
    for step in steps {
        level = match (step, level) {
            (Step::Product(_), Level::Root) => Level::Product,
            (Step::Comment(_), Level::Product) => Level::Comment,
            (Step::Embedded(_), Level::Comment) => Level::Product,
            (Step::Name(_) | Step::Version(_), Level::Product) => Level::Product,
            (Step::Text(_) | Step::Key(_) | Step::Value(_), Level::Comment) => Level::Comment,
            _ => {
                return Err(RuleError::InvalidMatcher(format!(
                    "matcher '{}' applies a step at the wrong token level",
                    name
                )))
            }
        };
    }
    if level == Level::Root {
        return Err(RuleError::InvalidMatcher(format!(
            "matcher '{}' has an empty step walk",
            name
        )));
    }
    Ok(())
}
