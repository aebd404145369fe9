//! Hacker classification, robots, security tokens and language codes.

use super::{comment, lit, product, NULL_SENTINEL};
use uascope_fields::Field;
use uascope_rules::{
    CommentSel, MatcherSpec, Predicate, ProductSel, RuleError, Step, ValueExpr,
};

/// Confidence of the Hacker rules: above every ordinary rule, below the
/// Client-Hints band.
const HACKER: u32 = 10_000;

const ROBOT_MARKER: &str = "bot|crawler|spider";

pub(super) fn matchers() -> Result<Vec<MatcherSpec>, RuleError> {
    let mut rules = Vec::new();

    // Null or empty input is replaced by the sentinel token upstream and
    // classified here, through the ordinary rule path.
    let hacker_path = || product(Predicate::eq(NULL_SENTINEL));
    let mut hacker = MatcherSpec::new("hacker: missing user agent").word("null");
    for field in [
        Field::DeviceClass,
        Field::DeviceName,
        Field::DeviceBrand,
        Field::OperatingSystemClass,
        Field::OperatingSystemName,
        Field::OperatingSystemVersion,
        Field::LayoutEngineClass,
        Field::LayoutEngineName,
        Field::LayoutEngineVersion,
        Field::AgentClass,
        Field::AgentName,
        Field::AgentVersion,
    ] {
        hacker = hacker.extract(field, HACKER, hacker_path(), lit("Hacker"));
    }
    rules.push(hacker);

    // Robots announcing themselves as a product (`Googlebot/2.1 (...)`).
    let robot_name = Predicate::regex(ROBOT_MARKER)?;
    rules.push(
        MatcherSpec::new("robot: product")
            .extract(
                Field::AgentName,
                800,
                product(robot_name.clone()),
                ValueExpr::MatchedName,
            )
            .extract(
                Field::AgentClass,
                800,
                product(robot_name.clone()),
                lit("Robot"),
            )
            .extract(
                Field::DeviceClass,
                800,
                product(robot_name.clone()),
                lit("Robot"),
            ),
    );
    rules.push(MatcherSpec::new("robot: product version").extract(
        Field::AgentVersion,
        800,
        product(robot_name.clone()),
        ValueExpr::MatchedVersion,
    ));

    // Robots hiding in a `(compatible; Googlebot/2.1; ...)` comment.
    let robot_comment = |tail: Vec<Step>| {
        let mut steps = vec![
            Step::Product(ProductSel::At(0)),
            Step::Comment(CommentSel::Matching(robot_name.clone())),
        ];
        steps.extend(tail);
        steps
    };
    rules.push(
        MatcherSpec::new("robot: comment")
            .extract(
                Field::AgentName,
                800,
                robot_comment(vec![Step::Embedded(ProductSel::Named(robot_name.clone()))]),
                ValueExpr::MatchedName,
            )
            .extract(
                Field::AgentClass,
                800,
                robot_comment(vec![Step::Embedded(ProductSel::Named(robot_name.clone()))]),
                lit("Robot"),
            )
            .extract(
                Field::DeviceClass,
                800,
                robot_comment(vec![Step::Embedded(ProductSel::Named(robot_name.clone()))]),
                lit("Robot"),
            ),
    );
    rules.push(MatcherSpec::new("robot: comment version").extract(
        Field::AgentVersion,
        800,
        robot_comment(vec![Step::Embedded(ProductSel::Named(robot_name.clone()))]),
        ValueExpr::MatchedVersion,
    ));

    // Legacy security tokens.
    for (rule, word, token, value) in [
        ("security: strong", "u", "U", "Strong security"),
        ("security: weak", "i", "I", "Weak security"),
        ("security: none", "n", "N", "No security"),
    ] {
        rules.push(MatcherSpec::new(rule).word(word).extract(
            Field::AgentSecurity,
            500,
            comment(Predicate::eq(token)),
            lit(value),
        ));
    }

    // Language codes travel as their own comment entry (`en-US`, `de`).
    rules.push(MatcherSpec::new("language: comment").extract(
        Field::AgentLanguageCode,
        500,
        comment(Predicate::regex("^[a-z]{2}(?:[-_][a-z]{2})?$")?),
        ValueExpr::Lowercase(Box::new(ValueExpr::MatchedText)),
    ));

    Ok(rules)
}
