//! Immutable rule store with inverted-index candidate lookup.

use crate::error::RuleError;
use crate::matcher::{Matcher, MatcherSpec, Proposal, Tables};
use rustc_hash::FxHashMap;
use uascope_token::TokenTree;

/// Immutable catalog of compiled matchers.
///
/// Built once by [`RuleStoreBuilder`] and frozen; after that, candidate
/// lookup and evaluation are read-only and need no synchronization.
///
/// # Candidate lookup
///
/// The store keeps an inverted index from required word literal to the ids
/// of the matchers requiring it. A matcher becomes a candidate for an input
/// when all of its required words occur in the input's word set; matchers
/// that declare no required words are candidates for every input. The
/// candidate set is a superset of the matchers that will actually fire.
#[derive(Debug)]
pub struct RuleStore {
    matchers: Vec<Matcher>,
    /// word -> ids of matchers requiring that word, ascending.
    index: FxHashMap<String, Vec<u32>>,
    /// Matchers with no required words, ascending.
    unindexed: Vec<u32>,
    tables: Tables,
    samples: Vec<String>,
}

impl RuleStore {
    /// Start building a rule store.
    pub fn builder() -> RuleStoreBuilder {
        RuleStoreBuilder::default()
    }

    /// Number of compiled matchers.
    pub fn matcher_count(&self) -> usize {
        self.matchers.len()
    }

    /// Number of distinct words in the candidate index.
    pub fn index_word_count(&self) -> usize {
        self.index.len()
    }

    /// Sample user agents registered with the rules, for preheating.
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    /// Ids of the candidate matchers for an input word set, in load order.
    pub fn candidates(&self, words: &[String]) -> Vec<u32> {
        let mut hits: FxHashMap<u32, usize> = FxHashMap::default();
        for word in words {
            if let Some(postings) = self.index.get(word.as_str()) {
                for &id in postings {
                    *hits.entry(id).or_insert(0) += 1;
                }
            }
        }

        let mut out = self.unindexed.clone();
        for (&id, &count) in &hits {
            if count == self.matchers[id as usize].required_words().len() {
                out.push(id);
            }
        }
        out.sort_unstable();
        out
    }

    /// Evaluate all candidate matchers against a token tree, collecting
    /// proposals in rule-load order.
    ///
    /// Returns the proposals and the number of matchers that fired.
    pub fn run(&self, tree: &TokenTree, words: &[String]) -> (Vec<Proposal>, usize) {
        let mut proposals = Vec::new();
        let mut fired = 0;
        for id in self.candidates(words) {
            if self.matchers[id as usize].evaluate(tree, &self.tables, &mut proposals) {
                fired += 1;
            }
        }
        (proposals, fired)
    }

    /// A registered lookup table, by name.
    pub fn table(&self, name: &str) -> Option<&FxHashMap<String, String>> {
        self.tables.get(name)
    }
}

/// Builder for [`RuleStore`].
///
/// Matchers are compiled in the order they are added; that order is the
/// load order the resolver's tie-break is defined over, and is part of this
/// builder's contract.
///
/// # Examples
///
/// ```
/// use uascope_fields::Field;
/// use uascope_rules::{MatcherSpec, Predicate, ProductSel, RuleStore, Step, ValueExpr};
///
/// let store = RuleStore::builder()
///     .table("greetings", &[("hi", "Hello")])
///     .matcher(
///         MatcherSpec::new("demo").word("demo").extract(
///             Field::AgentName,
///             100,
///             vec![Step::Product(ProductSel::Named(Predicate::eq("Demo")))],
///             ValueExpr::MatchedName,
///         ),
///     )
///     .build()
///     .unwrap();
/// assert_eq!(store.matcher_count(), 1);
/// ```
#[derive(Default)]
pub struct RuleStoreBuilder {
    specs: Vec<MatcherSpec>,
    tables: Tables,
    samples: Vec<String>,
}

impl RuleStoreBuilder {
    /// Register a lookup table. Keys are lowercased.
    pub fn table(mut self, name: &str, entries: &[(&str, &str)]) -> Self {
        let table = entries
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.to_string()))
            .collect();
        self.tables.insert(name.to_string(), table);
        self
    }

    /// Add a matcher. Load order is the order of these calls.
    pub fn matcher(mut self, spec: MatcherSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Register a sample user agent for preheating and rule tests.
    pub fn sample(mut self, user_agent: &str) -> Self {
        self.samples.push(user_agent.to_string());
        self
    }

    /// Drop all registered samples (the `drop_tests` builder option).
    pub fn drop_samples(mut self) -> Self {
        self.samples.clear();
        self
    }

    /// Compile and freeze the store.
    ///
    /// Fails on malformed matchers: empty extract lists, step walks that
    /// address the wrong token level, empty required words, and references
    /// to unregistered lookup tables.
    pub fn build(self) -> Result<RuleStore, RuleError> {
        let mut matchers = Vec::with_capacity(self.specs.len());
        let mut index: FxHashMap<String, Vec<u32>> = FxHashMap::default();
        let mut unindexed = Vec::new();

        for (id, spec) in self.specs.into_iter().enumerate() {
            let id = id as u32;
            spec.validate_steps()?;

            let mut refs = Vec::new();
            for extract in &spec.extracts {
                extract.value.table_refs(&mut refs);
            }
            for table in refs {
                if !self.tables.contains_key(&table) {
                    return Err(RuleError::UnknownTable {
                        matcher: spec.name.clone(),
                        table,
                    });
                }
            }

            let mut required_words: Vec<String> = Vec::with_capacity(spec.required_words.len());
            for word in &spec.required_words {
                if word.is_empty() {
                    return Err(RuleError::InvalidWord(format!(
                        "matcher '{}' requires an empty word",
                        spec.name
                    )));
                }
                let word = word.to_lowercase();
                if !required_words.contains(&word) {
                    required_words.push(word);
                }
            }

            if required_words.is_empty() {
                unindexed.push(id);
            } else {
                for word in &required_words {
                    index.entry(word.clone()).or_default().push(id);
                }
            }

            matchers.push(Matcher {
                id,
                name: spec.name,
                required_words,
                requires: spec.requires,
                extracts: spec.extracts,
            });
        }

        Ok(RuleStore {
            matchers,
            index,
            unindexed,
            tables: self.tables,
            samples: self.samples,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{Predicate, ProductSel, Step, ValueExpr};
    use uascope_fields::Field;
    use uascope_token::{tokenize, words};

    fn product_rule(name: &str, word: &str, product: &str, confidence: u32) -> MatcherSpec {
        MatcherSpec::new(name).word(word).extract(
            Field::AgentName,
            confidence,
            vec![Step::Product(ProductSel::Named(Predicate::eq(product)))],
            ValueExpr::MatchedName,
        )
    }

    #[test]
    fn test_candidates_require_all_words() {
        let store = RuleStore::builder()
            .matcher(product_rule("one", "firefox", "Firefox", 1))
            .matcher(
                product_rule("two", "gecko", "Gecko", 1).word("firefox"), // gecko AND firefox
            )
            .matcher(product_rule("three", "chrome", "Chrome", 1))
            .build()
            .unwrap();

        let ws = words("Mozilla/5.0 Gecko/20071127 Firefox/2.0.0.11");
        assert_eq!(store.candidates(&ws), vec![0, 1]);

        let ws = words("Gecko/20071127");
        assert_eq!(store.candidates(&ws), Vec::<u32>::new());

        let ws = words("Chrome/100.0");
        assert_eq!(store.candidates(&ws), vec![2]);
    }

    #[test]
    fn test_unindexed_matchers_are_always_candidates() {
        let store = RuleStore::builder()
            .matcher(MatcherSpec::new("lang").extract(
                Field::AgentLanguageCode,
                1,
                vec![
                    Step::Product(ProductSel::At(0)),
                    Step::Comment(crate::matcher::CommentSel::Matching(
                        Predicate::regex("^[a-z]{2}(-[a-z]{2})?$").unwrap(),
                    )),
                ],
                ValueExpr::Lowercase(Box::new(ValueExpr::MatchedText)),
            ))
            .build()
            .unwrap();
        assert_eq!(store.candidates(&words("anything at all")), vec![0]);
    }

    #[test]
    fn test_run_collects_in_load_order() {
        let store = RuleStore::builder()
            .matcher(product_rule("late-but-first", "agent", "Agent", 10))
            .matcher(product_rule("second", "agent", "Agent", 10))
            .build()
            .unwrap();

        let tree = tokenize("Agent/1.0");
        let (proposals, fired) = store.run(&tree, &words("Agent/1.0"));
        assert_eq!(fired, 2);
        assert_eq!(proposals.len(), 2);
        assert!(proposals[0].matcher < proposals[1].matcher);
    }

    #[test]
    fn test_candidate_set_is_superset() {
        // Word present but predicate fails: candidate, does not fire.
        let store = RuleStore::builder()
            .matcher(product_rule("strict", "firefox", "Firefox", 1))
            .build()
            .unwrap();
        let ua = "NotFirefox/1.0 (firefox)";
        let ws = words(ua);
        assert_eq!(store.candidates(&ws), vec![0]);
        let (proposals, fired) = store.run(&tokenize(ua), &ws);
        assert_eq!(fired, 0);
        assert!(proposals.is_empty());
    }

    #[test]
    fn test_unknown_table_is_a_build_error() {
        let err = RuleStore::builder()
            .matcher(MatcherSpec::new("bad").word("x").extract(
                Field::AgentName,
                1,
                vec![Step::Product(ProductSel::At(0))],
                ValueExpr::lookup("never-registered", ValueExpr::MatchedName),
            ))
            .build()
            .unwrap_err();
        assert!(matches!(err, RuleError::UnknownTable { .. }));
    }

    #[test]
    fn test_empty_required_word_is_a_build_error() {
        let err = RuleStore::builder()
            .matcher(product_rule("bad", "", "X", 1))
            .build()
            .unwrap_err();
        assert!(matches!(err, RuleError::InvalidWord(_)));
    }
}
