//! The built-in rule set.
//!
//! The analyzer core consumes any compiled [`RuleStore`]; this module builds
//! the one shipped with the crate. Rules are declared programmatically, in
//! load order, grouped by concern. Confidence bands:
//!
//! * `1..10_000`: ordinary rules; more specific rules sit higher.
//! * `10_000`: the Hacker rules for null/empty input.
//! * `20_000+`: reserved for Client-Hints proposals (see `hints`).

mod agents;
mod engines;
mod misc;
mod os;

use rustc_hash::FxHashSet;
use uascope_fields::Field;
use uascope_rules::{
    CommentSel, Predicate, ProductSel, RuleError, RuleStore, Step, ValueExpr,
};

/// Token substituted for null or empty input, classified through the
/// standard rule path as a Hacker.
pub(crate) const NULL_SENTINEL: &str = "<<<null>>>";

const WINDOWS_VERSIONS: &[(&str, &str)] = &[
    ("5.0", "2000"),
    ("5.01", "2000"),
    ("5.1", "XP"),
    ("5.2", "XP x64 Edition"),
    ("6.0", "Vista"),
    ("6.1", "7"),
    ("6.2", "8"),
    ("6.3", "8.1"),
    ("10.0", "10"),
];

const ANDROID_BRANDS: &[(&str, &str)] = &[
    ("pixel", "Google"),
    ("nexus", "Google"),
    ("sm", "Samsung"),
    ("gt", "Samsung"),
    ("galaxy", "Samsung"),
    ("mi", "Xiaomi"),
    ("redmi", "Xiaomi"),
    ("oneplus", "OnePlus"),
    ("huawei", "Huawei"),
    ("htc", "HTC"),
    ("lg", "LG"),
    ("moto", "Motorola"),
    ("sony", "Sony"),
];

/// Sample user agents registered with the rules; preheat cycles through
/// these, and the integration tests reuse them as a smoke corpus.
const SAMPLES: &[&str] = &[
    "Mozilla/5.0 (Windows; U; Windows NT 5.1; en-US; rv:1.8.1.11) Gecko/20071127 Firefox/2.0.0.11",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/103.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/100.0.4896.127 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.5 Safari/605.1.15",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 16_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.5 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.5 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/112.0.0.0 Mobile Safari/537.36",
    "Mozilla/5.0 (Linux; U; Android 4.0.3; de-de; Galaxy S II Build/GRJ22) AppleWebKit/534.30 (KHTML, like Gecko) Version/4.0 Mobile Safari/534.30",
    "Mozilla/5.0 (Windows NT 6.1; Trident/7.0; rv:11.0) like Gecko",
    "Mozilla/4.0 (compatible; MSIE 6.0; Windows NT 5.1)",
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
    "Mozilla/5.0 (Windows Phone 8.1; ARM; Trident/7.0; Touch; rv:11.0; IEMobile/11.0) like Gecko",
    "Opera/9.80 (Windows NT 6.1) Presto/2.12.388 Version/12.16",
    "curl/7.68.0",
    "Wget/1.20.3 (linux-gnu)",
];

/// Build the default rule store.
///
/// With `wanted` set, extracts targeting other fields are dropped and
/// matchers left without extracts are skipped entirely; values for the
/// dropped fields are then unspecified. `drop_tests` discards the sample
/// corpus to save memory.
pub(crate) fn default_rule_store(
    wanted: Option<&FxHashSet<Field>>,
    drop_tests: bool,
) -> Result<RuleStore, RuleError> {
    let mut specs = Vec::new();
    specs.extend(agents::matchers());
    specs.extend(engines::matchers());
    specs.extend(os::matchers());
    specs.extend(misc::matchers()?);

    if let Some(wanted) = wanted {
        specs = specs
            .into_iter()
            .filter_map(|mut spec| {
                spec.extracts.retain(|e| wanted.contains(&e.field));
                (!spec.extracts.is_empty()).then_some(spec)
            })
            .collect();
    }

    let mut builder = RuleStore::builder()
        .table("windows-versions", WINDOWS_VERSIONS)
        .table("android-brands", ANDROID_BRANDS);
    for spec in specs {
        builder = builder.matcher(spec);
    }
    for ua in SAMPLES {
        builder = builder.sample(ua);
    }
    if drop_tests {
        builder = builder.drop_samples();
    }
    builder.build()
}

// Shared path helpers for the rule modules.

/// Path to the first product whose name satisfies `pred`.
fn product(pred: Predicate) -> Vec<Step> {
    vec![Step::Product(ProductSel::Named(pred))]
}

/// Path to the first comment of the first product satisfying `pred`.
fn comment(pred: Predicate) -> Vec<Step> {
    vec![
        Step::Product(ProductSel::At(0)),
        Step::Comment(CommentSel::Matching(pred)),
    ]
}

/// Path to a fixed comment position of the first product.
fn comment_at(index: usize) -> Vec<Step> {
    vec![
        Step::Product(ProductSel::At(0)),
        Step::Comment(CommentSel::At(index)),
    ]
}

fn lit(value: &str) -> ValueExpr {
    ValueExpr::Literal(value.to_string())
}

/// First version-shaped word of the matched comment text.
fn comment_version() -> ValueExpr {
    ValueExpr::VersionWord(Box::new(ValueExpr::MatchedText))
}
