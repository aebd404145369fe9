//! Layout engine rules.

use super::{comment, comment_version, lit, product};
use uascope_fields::Field;
use uascope_rules::{MatcherSpec, Predicate, ProductSel, Step, ValueExpr};

/// Path to a Chromium-family product carrying Blink (version 28 was the
/// first Blink release).
fn blink_product(name: &str) -> Vec<Step> {
    vec![
        Step::Product(ProductSel::Named(Predicate::eq(name))),
        Step::Version(Predicate::InRange {
            lo: (28, 0),
            hi: (u32::MAX, u32::MAX),
        }),
    ]
}

fn blink_rule(rule: &str, word: &str, product_name: &str) -> MatcherSpec {
    MatcherSpec::new(rule)
        .word(word)
        .extract(
            Field::LayoutEngineName,
            550,
            blink_product(product_name),
            lit("Blink"),
        )
        .extract(
            Field::LayoutEngineVersion,
            550,
            blink_product(product_name),
            ValueExpr::SegmentPrefix {
                expr: Box::new(ValueExpr::MatchedVersion),
                segments: 2,
            },
        )
}

pub(super) fn matchers() -> Vec<MatcherSpec> {
    vec![
        // Gecko: the product version is a build date; the engine version
        // travels in the `rv:` comment entry.
        MatcherSpec::new("engine: gecko")
            .word("gecko")
            .extract(
                Field::LayoutEngineName,
                500,
                product(Predicate::eq("Gecko")),
                lit("Gecko"),
            )
            .extract(
                Field::LayoutEngineBuild,
                500,
                product(Predicate::eq("Gecko")),
                ValueExpr::MatchedVersion,
            ),
        MatcherSpec::new("engine: gecko version")
            .word("gecko")
            .word("rv")
            .require(product(Predicate::eq("Gecko")))
            .extract(
                Field::LayoutEngineVersion,
                500,
                comment(Predicate::starts("rv:")),
                ValueExpr::MatchedValue,
            ),
        MatcherSpec::new("engine: webkit")
            .word("applewebkit")
            .extract(
                Field::LayoutEngineName,
                500,
                product(Predicate::eq("AppleWebKit")),
                lit("AppleWebKit"),
            )
            .extract(
                Field::LayoutEngineVersion,
                500,
                product(Predicate::eq("AppleWebKit")),
                ValueExpr::MatchedVersion,
            ),
        // Chromium-family agents report AppleWebKit for compatibility but
        // actually run Blink; its version tracks the agent's major.minor.
        blink_rule("engine: blink (chrome)", "chrome", "Chrome"),
        blink_rule("engine: blink (chromium)", "chromium", "Chromium"),
        MatcherSpec::new("engine: trident")
            .word("trident")
            .extract(
                Field::LayoutEngineName,
                500,
                comment(Predicate::starts("Trident")),
                lit("Trident"),
            )
            .extract(
                Field::LayoutEngineVersion,
                500,
                comment(Predicate::starts("Trident")),
                comment_version(),
            ),
        MatcherSpec::new("engine: presto")
            .word("presto")
            .extract(
                Field::LayoutEngineName,
                500,
                product(Predicate::eq("Presto")),
                lit("Presto"),
            )
            .extract(
                Field::LayoutEngineVersion,
                500,
                product(Predicate::eq("Presto")),
                ValueExpr::MatchedVersion,
            ),
    ]
}
