//! Agent (browser / tool) rules.

use super::{comment, comment_version, lit, product};
use uascope_fields::Field;
use uascope_rules::{CommentSel, MatcherSpec, Predicate, ProductSel, Step, ValueExpr};

/// A plain `Name/Version` product rule: both extracts come from the same
/// product, and both must resolve.
fn product_agent(name: &str, word: &str, product_name: &str, agent: &str, conf: u32) -> MatcherSpec {
    MatcherSpec::new(name)
        .word(word)
        .extract(
            Field::AgentName,
            conf,
            product(Predicate::eq(product_name)),
            lit(agent),
        )
        .extract(
            Field::AgentVersion,
            conf,
            product(Predicate::eq(product_name)),
            ValueExpr::MatchedVersion,
        )
}

pub(super) fn matchers() -> Vec<MatcherSpec> {
    let mut rules = Vec::new();

    rules.push(product_agent("agent: firefox", "firefox", "Firefox", "Firefox", 500));
    rules.push(product_agent("agent: firefox ios", "fxios", "FxiOS", "Firefox", 550));
    rules.push(product_agent("agent: chrome", "chrome", "Chrome", "Chrome", 500));
    rules.push(product_agent("agent: chromium", "chromium", "Chromium", "Chromium", 490));
    rules.push(product_agent("agent: chrome ios", "crios", "CriOS", "Chrome", 550));
    rules.push(product_agent("agent: edge", "edg", "Edg", "Edge", 560));
    rules.push(product_agent("agent: edge legacy", "edge", "Edge", "Edge", 560));
    rules.push(product_agent("agent: opera blink", "opr", "OPR", "Opera", 560));
    rules.push(product_agent("agent: opera presto", "opera", "Opera", "Opera", 560));
    rules.push(product_agent(
        "agent: samsung internet",
        "samsungbrowser",
        "SamsungBrowser",
        "Samsung Internet",
        560,
    ));

    // Safari's own product version is an engine build; the application
    // version travels in a separate `Version/x` product.
    rules.push(
        MatcherSpec::new("agent: safari").word("safari").extract(
            Field::AgentName,
            100,
            product(Predicate::eq("Safari")),
            lit("Safari"),
        ),
    );
    rules.push(
        MatcherSpec::new("agent: safari version")
            .word("safari")
            .word("version")
            .require(product(Predicate::eq("Safari")))
            .extract(
                Field::AgentName,
                400,
                product(Predicate::eq("Version")),
                lit("Safari"),
            )
            .extract(
                Field::AgentVersion,
                400,
                product(Predicate::eq("Version")),
                ValueExpr::MatchedVersion,
            ),
    );

    // Internet Explorer, classic and the Trident/rv form of IE 11.
    rules.push(
        MatcherSpec::new("agent: msie")
            .word("msie")
            .extract(
                Field::AgentName,
                500,
                comment(Predicate::starts("MSIE")),
                lit("Internet Explorer"),
            )
            .extract(
                Field::AgentVersion,
                500,
                comment(Predicate::starts("MSIE")),
                comment_version(),
            ),
    );
    rules.push(
        MatcherSpec::new("agent: ie11")
            .word("trident")
            .word("rv")
            .require(comment(Predicate::starts("Trident")))
            .extract(
                Field::AgentName,
                550,
                comment(Predicate::starts("rv:")),
                lit("Internet Explorer"),
            )
            .extract(
                Field::AgentVersion,
                550,
                vec![
                    Step::Product(ProductSel::At(0)),
                    Step::Comment(CommentSel::Matching(Predicate::starts("rv:"))),
                    Step::Key(Predicate::eq("rv")),
                ],
                ValueExpr::MatchedValue,
            ),
    );

    // Command line clients.
    rules.push(
        MatcherSpec::new("agent: curl")
            .word("curl")
            .extract(
                Field::AgentName,
                500,
                product(Predicate::eq("curl")),
                ValueExpr::MatchedName,
            )
            .extract(
                Field::AgentVersion,
                500,
                product(Predicate::eq("curl")),
                ValueExpr::MatchedVersion,
            ),
    );
    rules.push(
        MatcherSpec::new("agent: wget")
            .word("wget")
            .extract(
                Field::AgentName,
                500,
                product(Predicate::eq("Wget")),
                lit("Wget"),
            )
            .extract(
                Field::AgentVersion,
                500,
                product(Predicate::eq("Wget")),
                ValueExpr::MatchedVersion,
            ),
    );

    rules
}
