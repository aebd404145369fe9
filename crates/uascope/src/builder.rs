//! Fluent analyzer configuration.

use crate::analyzer::{log_store, UserAgentAnalyzer};
use crate::cache::{CacheInstantiator, DefaultCacheInstantiator, ParseCache};
use crate::calc::{default_pipeline, validate_pipeline};
use crate::error::ConfigError;
use crate::rules::default_rule_store;
use crate::stats::AnalyzerStats;
use rustc_hash::FxHashSet;
use std::num::NonZeroUsize;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, OnceLock};
use uascope_fields::Field;
use uascope_rules::RuleStore;

/// Default parse cache capacity.
pub const DEFAULT_PARSE_CACHE_SIZE: usize = 10_000;

/// Builder for [`UserAgentAnalyzer`].
///
/// # Examples
///
/// ```
/// use uascope::UserAgentAnalyzer;
///
/// // Defaults: 10k-entry cache, delayed rule compilation.
/// let analyzer = UserAgentAnalyzer::builder().build()?;
///
/// // Tuned for a long-running enrichment pipeline.
/// let analyzer = UserAgentAnalyzer::builder()
///     .cache_size(100_000)
///     .with_fields(["AgentName", "AgentVersion", "OperatingSystemName"])?
///     .drop_tests()
///     .immediate_initialization()
///     .build()?;
/// # Ok::<(), uascope::ConfigError>(())
/// ```
pub struct UserAgentAnalyzerBuilder {
    cache_size: usize,
    cache_instantiator: Box<dyn CacheInstantiator>,
    fields: Option<Vec<String>>,
    rule_store: Option<RuleStore>,
    show_matcher_stats: bool,
    show_minimal_version: bool,
    drop_tests: bool,
    immediate: bool,
    preheat: usize,
}

impl UserAgentAnalyzerBuilder {
    pub(crate) fn new() -> Self {
        Self {
            cache_size: DEFAULT_PARSE_CACHE_SIZE,
            cache_instantiator: Box::new(DefaultCacheInstantiator),
            fields: None,
            rule_store: None,
            show_matcher_stats: false,
            show_minimal_version: false,
            drop_tests: false,
            immediate: false,
            preheat: 0,
        }
    }

    /// Set the parse cache capacity. Zero disables caching entirely.
    pub fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = size;
        self
    }

    /// Disable the parse cache (same as `cache_size(0)`).
    pub fn disable_caching(self) -> Self {
        self.cache_size(0)
    }

    /// Supply a custom bounded-map factory for the parse cache.
    pub fn cache_instantiator(mut self, instantiator: impl CacheInstantiator + 'static) -> Self {
        self.cache_instantiator = Box::new(instantiator);
        self
    }

    /// Restrict output to the named fields. Unlisted fields may be skipped
    /// during matching for speed and read as their default sentinel in
    /// records. Unknown names fail `build`.
    pub fn with_fields<I, S>(mut self, fields: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = fields.into_iter().map(|s| s.as_ref().to_string()).collect();
        for name in &names {
            if Field::from_name(name).is_none() {
                return Err(ConfigError::UnknownField(name.clone()));
            }
        }
        self.fields = Some(names);
        Ok(self)
    }

    /// Use a custom compiled rule store instead of the built-in rule set.
    pub fn rule_store(mut self, store: RuleStore) -> Self {
        self.rule_store = Some(store);
        self
    }

    /// Log rule store statistics at info level after compilation.
    pub fn show_matcher_stats(mut self) -> Self {
        self.show_matcher_stats = true;
        self
    }

    /// Trim version fields to their first two components.
    pub fn show_minimal_version(mut self) -> Self {
        self.show_minimal_version = true;
        self
    }

    /// Do not retain the rule sample corpus in memory.
    pub fn drop_tests(mut self) -> Self {
        self.drop_tests = true;
        self
    }

    /// Compile the rule store during `build` instead of on first parse.
    pub fn immediate_initialization(mut self) -> Self {
        self.immediate = true;
        self
    }

    /// Compile the rule store lazily on first parse (the default).
    pub fn delayed_initialization(mut self) -> Self {
        self.immediate = false;
        self
    }

    /// Pre-parse `iterations` rule samples after construction to warm the
    /// cache and lazy structures. Implies rule compilation at build time.
    pub fn preheat(mut self, iterations: usize) -> Self {
        self.preheat = iterations;
        self
    }

    /// Validate the configuration and construct the analyzer.
    pub fn build(self) -> Result<UserAgentAnalyzer, ConfigError> {
        // Output catalog, in field-catalog order.
        let requested: Option<FxHashSet<Field>> = self.fields.as_ref().map(|names| {
            names
                .iter()
                .filter_map(|n| Field::from_name(n))
                .collect::<FxHashSet<Field>>()
        });
        let wanted: Vec<Field> = match &requested {
            None => Field::ALL.to_vec(),
            Some(set) => Field::ALL.iter().copied().filter(|f| set.contains(f)).collect(),
        };

        let pipeline = default_pipeline(self.show_minimal_version);
        validate_pipeline(&pipeline)?;

        // Matching must still produce everything the requested fields are
        // derived from, so the restriction set is the requested set closed
        // over calculator reads (walked backwards, the pipeline order being
        // topological).
        let restrict = requested.map(|mut set| {
            for calc in pipeline.iter().rev() {
                if calc.writes().iter().any(|f| set.contains(f)) {
                    set.extend(calc.reads());
                }
            }
            set
        });

        let cache = match NonZeroUsize::new(self.cache_size) {
            Some(capacity) => {
                tracing::debug!(capacity = capacity.get(), "parse cache enabled");
                Some(ParseCache::new(self.cache_instantiator.instantiate(capacity)))
            }
            None => {
                tracing::debug!("parse cache disabled");
                None
            }
        };

        let analyzer = UserAgentAnalyzer {
            rules: OnceLock::new(),
            restrict,
            drop_tests: self.drop_tests,
            show_matcher_stats: self.show_matcher_stats,
            wanted,
            pipeline,
            cache,
            stats: Arc::new(AnalyzerStats::default()),
            destroyed: AtomicBool::new(false),
        };

        if let Some(store) = self.rule_store {
            log_store(&store, self.show_matcher_stats);
            let _ = analyzer.rules.set(Arc::new(store));
        } else if self.immediate || self.preheat > 0 {
            let store = default_rule_store(analyzer.restrict.as_ref(), self.drop_tests)?;
            log_store(&store, self.show_matcher_stats);
            let _ = analyzer.rules.set(Arc::new(store));
        }

        if self.preheat > 0 {
            analyzer.preheat(self.preheat);
        }

        Ok(analyzer)
    }
}
