//! The analyzer: rule store + calculators + cache behind one parse API.

use crate::cache::ParseCache;
use crate::calc::Calculator;
use crate::hints;
use crate::resolve::resolve;
use crate::result::AgentRecord;
use crate::rules::{default_rule_store, NULL_SENTINEL};
use crate::stats::{AnalyzerStats, AnalyzerStatsSnapshot};
use rustc_hash::FxHashSet;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use uascope_fields::Field;
use uascope_rules::{Proposal, RuleStore};
use uascope_token::{tokenize, words};

/// Analyzes user-agent strings (and Client-Hints header maps) into field
/// records.
///
/// Build one analyzer per process via [`UserAgentAnalyzer::builder`] and
/// share it: after construction the rule store and calculator tables are
/// immutable and read without synchronization; the parse cache is the only
/// internally locked component. The analyzer is `Send + Sync`.
///
/// # Examples
///
/// ```
/// use uascope::{Field, UserAgentAnalyzer};
///
/// let analyzer = UserAgentAnalyzer::builder().build()?;
/// let record = analyzer.parse(
///     "Mozilla/5.0 (Windows; U; Windows NT 5.1; en-US; rv:1.8.1.11) \
///      Gecko/20071127 Firefox/2.0.0.11",
/// );
/// assert_eq!(record.get(Field::AgentName), "Firefox");
/// assert_eq!(record.get(Field::OperatingSystemVersion), "XP");
/// # Ok::<(), uascope::ConfigError>(())
/// ```
pub struct UserAgentAnalyzer {
    pub(crate) rules: OnceLock<Arc<RuleStore>>,
    pub(crate) restrict: Option<FxHashSet<Field>>,
    pub(crate) drop_tests: bool,
    pub(crate) show_matcher_stats: bool,
    pub(crate) wanted: Vec<Field>,
    pub(crate) pipeline: Vec<Box<dyn Calculator>>,
    pub(crate) cache: Option<ParseCache>,
    pub(crate) stats: Arc<AnalyzerStats>,
    pub(crate) destroyed: AtomicBool,
}

impl UserAgentAnalyzer {
    /// Start configuring an analyzer.
    pub fn builder() -> crate::builder::UserAgentAnalyzerBuilder {
        crate::builder::UserAgentAnalyzerBuilder::new()
    }

    /// Analyze one user-agent string.
    ///
    /// Total: any string, including empty or garbage input, produces a
    /// record. Empty input is classified as a Hacker agent. Results are
    /// cached by the raw string.
    ///
    /// # Panics
    ///
    /// Panics when called after [`destroy`](Self::destroy); that is a
    /// programmer error.
    pub fn parse(&self, user_agent: &str) -> Arc<AgentRecord> {
        self.ensure_alive();
        AnalyzerStats::bump(&self.stats.parses);
        match &self.cache {
            Some(cache) => {
                cache.get_or_compute(user_agent, &self.stats, || self.compute(user_agent, &[]))
            }
            None => self.compute(user_agent, &[]),
        }
    }

    /// Analyze an optional user-agent string; `None` classifies like the
    /// empty string (a request without a User-Agent is a Hacker).
    pub fn parse_opt(&self, user_agent: Option<&str>) -> Arc<AgentRecord> {
        self.parse(user_agent.unwrap_or(""))
    }

    /// Analyze a header map: `User-Agent` plus any `Sec-Ch-Ua-*` Client
    /// Hints. Header names are case-insensitive; unknown headers are
    /// ignored. Results are cached by the canonical concatenation of the
    /// sorted known-header subset.
    pub fn parse_headers(&self, headers: &HashMap<String, String>) -> Arc<AgentRecord> {
        self.ensure_alive();
        AnalyzerStats::bump(&self.stats.parses);

        let known = hints::known_subset(headers);
        let key = hints::canonical_key(&known);
        let compute = || {
            let ua = known.get("user-agent").cloned().unwrap_or_default();
            let extra = hints::proposals(&known);
            self.compute(&ua, &extra)
        };

        match &self.cache {
            Some(cache) => cache.get_or_compute(&key, &self.stats, compute),
            None => compute(),
        }
    }

    /// Analyze one string and return a single field's value. Unknown field
    /// names yield `"Unknown"`.
    pub fn parse_field(&self, user_agent: &str, field_name: &str) -> String {
        self.parse(user_agent).get_by_name(field_name).to_string()
    }

    /// Names of the fields this analyzer emits, in catalog order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.wanted.iter().map(|f| f.as_str()).collect()
    }

    /// Pre-parse the rule samples to warm the cache and lazy structures.
    /// Cycles through the sample corpus until `iterations` parses ran;
    /// returns how many actually did (zero when samples were dropped).
    pub fn preheat(&self, iterations: usize) -> usize {
        let samples: Vec<String> = self.rule_store().samples().to_vec();
        if samples.is_empty() || iterations == 0 {
            return 0;
        }
        let mut done = 0;
        for ua in samples.iter().cycle().take(iterations) {
            self.parse(ua);
            done += 1;
        }
        tracing::debug!(parses = done, "preheat finished");
        done
    }

    /// Snapshot of the analyzer's counters.
    pub fn stats(&self) -> AnalyzerStatsSnapshot {
        self.stats.snapshot()
    }

    /// Atomically drop all cached results. Records already handed out stay
    /// valid.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    /// Number of currently cached results.
    pub fn cache_len(&self) -> usize {
        self.cache.as_ref().map_or(0, |c| c.len())
    }

    /// Release the cache and poison the analyzer. Any later parse call is a
    /// programmer error and panics; concurrent parses that already started
    /// finish normally and their records stay valid.
    pub fn destroy(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
        self.clear_cache();
    }

    fn ensure_alive(&self) {
        if self.destroyed.load(Ordering::SeqCst) {
            panic!("UserAgentAnalyzer used after destroy()");
        }
    }

    /// The compiled rule store, building it on first use in delayed mode.
    pub(crate) fn rule_store(&self) -> &Arc<RuleStore> {
        self.rules.get_or_init(|| {
            let store = default_rule_store(self.restrict.as_ref(), self.drop_tests)
                .expect("the built-in rule set always compiles");
            log_store(&store, self.show_matcher_stats);
            Arc::new(store)
        })
    }

    /// Tokenize, match, resolve and post-process one input. `extra` carries
    /// header-derived proposals.
    fn compute(&self, user_agent: &str, extra: &[Proposal]) -> Arc<AgentRecord> {
        AnalyzerStats::bump(&self.stats.engine_runs);
        let store = self.rule_store();

        let effective = if user_agent.trim().is_empty() {
            NULL_SENTINEL
        } else {
            user_agent
        };
        let tree = tokenize(effective);
        let word_set = words(effective);

        let (mut proposals, _fired) = store.run(&tree, &word_set);
        proposals.extend_from_slice(extra);

        let mut map = resolve(proposals);
        for calc in &self.pipeline {
            calc.apply(&mut map);
        }

        Arc::new(AgentRecord::freeze(
            user_agent.to_string(),
            &map,
            &self.wanted,
        ))
    }
}

pub(crate) fn log_store(store: &RuleStore, show_matcher_stats: bool) {
    if show_matcher_stats {
        tracing::info!(
            matchers = store.matcher_count(),
            index_words = store.index_word_count(),
            samples = store.samples().len(),
            "rule store compiled"
        );
    } else {
        tracing::debug!(matchers = store.matcher_count(), "rule store compiled");
    }
}
