//! Operating system, device and CPU rules.

use super::{comment, comment_at, comment_version, lit};
use uascope_fields::Field;
use uascope_rules::{MatcherSpec, Predicate, Step, ValueExpr};

/// A device/CPU marker comment: one comment substring sets DeviceCpu and/or
/// DeviceCpuBits.
fn cpu_rule(
    name: &str,
    word: &str,
    marker: &str,
    cpu: Option<&str>,
    bits: Option<&str>,
    conf: u32,
) -> MatcherSpec {
    let mut spec = MatcherSpec::new(name).word(word);
    if let Some(cpu) = cpu {
        spec = spec.extract(
            Field::DeviceCpu,
            conf,
            comment(Predicate::contains(marker)),
            lit(cpu),
        );
    }
    if let Some(bits) = bits {
        spec = spec.extract(
            Field::DeviceCpuBits,
            conf,
            comment(Predicate::contains(marker)),
            lit(bits),
        );
    }
    spec
}

pub(super) fn matchers() -> Vec<MatcherSpec> {
    let mut rules = Vec::new();

    // Windows. The generic rule catches pre-NT agents at low confidence;
    // the NT rules carry the version lookup. NT agents without an explicit
    // 64-bit marker are 32-bit.
    rules.push(
        MatcherSpec::new("os: windows")
            .word("windows")
            .extract(
                Field::OperatingSystemName,
                140,
                comment(Predicate::starts("Windows")),
                lit("Windows"),
            )
            .extract(
                Field::OperatingSystemClass,
                140,
                comment(Predicate::starts("Windows")),
                lit("Desktop"),
            )
            .extract(
                Field::DeviceClass,
                140,
                comment(Predicate::starts("Windows")),
                lit("Desktop"),
            )
            .extract(
                Field::DeviceName,
                140,
                comment(Predicate::starts("Windows")),
                lit("Desktop"),
            ),
    );
    rules.push(
        MatcherSpec::new("os: windows nt")
            .word("windows")
            .word("nt")
            .extract(
                Field::OperatingSystemName,
                500,
                comment(Predicate::starts("Windows NT")),
                lit("Windows NT"),
            )
            .extract(
                Field::OperatingSystemClass,
                500,
                comment(Predicate::starts("Windows NT")),
                lit("Desktop"),
            )
            .extract(
                Field::DeviceClass,
                500,
                comment(Predicate::starts("Windows NT")),
                lit("Desktop"),
            )
            .extract(
                Field::DeviceName,
                500,
                comment(Predicate::starts("Windows NT")),
                lit("Desktop"),
            )
            .extract(
                Field::DeviceCpuBits,
                50,
                comment(Predicate::starts("Windows NT")),
                lit("32"),
            ),
    );
    rules.push(
        MatcherSpec::new("os: windows nt version")
            .word("windows")
            .word("nt")
            .extract(
                Field::OperatingSystemVersion,
                500,
                comment(Predicate::starts("Windows NT")),
                ValueExpr::lookup_or_key("windows-versions", comment_version()),
            ),
    );
    rules.push(
        MatcherSpec::new("os: windows phone")
            .word("windows")
            .word("phone")
            .extract(
                Field::OperatingSystemName,
                550,
                comment(Predicate::starts("Windows Phone")),
                lit("Windows Phone"),
            )
            .extract(
                Field::OperatingSystemClass,
                550,
                comment(Predicate::starts("Windows Phone")),
                lit("Mobile"),
            )
            .extract(
                Field::DeviceClass,
                550,
                comment(Predicate::starts("Windows Phone")),
                lit("Phone"),
            ),
    );
    rules.push(
        MatcherSpec::new("os: windows phone version")
            .word("windows")
            .word("phone")
            .extract(
                Field::OperatingSystemVersion,
                550,
                comment(Predicate::starts("Windows Phone")),
                comment_version(),
            ),
    );

    // Linux desktops. Android overrides these at higher confidence.
    rules.push(
        MatcherSpec::new("os: linux")
            .word("linux")
            .extract(
                Field::OperatingSystemName,
                400,
                comment(Predicate::starts("Linux")),
                lit("Linux"),
            )
            .extract(
                Field::OperatingSystemClass,
                400,
                comment(Predicate::starts("Linux")),
                lit("Desktop"),
            )
            .extract(
                Field::DeviceClass,
                350,
                comment(Predicate::starts("Linux")),
                lit("Desktop"),
            )
            .extract(
                Field::DeviceName,
                350,
                comment(Predicate::starts("Linux")),
                lit("Linux Desktop"),
            ),
    );
    rules.push(MatcherSpec::new("os: x11").word("x11").extract(
        Field::DeviceClass,
        300,
        comment(Predicate::eq("X11")),
        lit("Desktop"),
    ));

    // Android.
    rules.push(
        MatcherSpec::new("os: android")
            .word("android")
            .extract(
                Field::OperatingSystemName,
                500,
                comment(Predicate::starts("Android")),
                lit("Android"),
            )
            .extract(
                Field::OperatingSystemClass,
                500,
                comment(Predicate::starts("Android")),
                lit("Mobile"),
            )
            .extract(
                Field::DeviceClass,
                400,
                comment(Predicate::starts("Android")),
                lit("Phone"),
            )
            .extract(
                Field::DeviceName,
                400,
                comment(Predicate::starts("Android")),
                lit("Android Mobile"),
            ),
    );
    rules.push(
        MatcherSpec::new("os: android version")
            .word("android")
            .extract(
                Field::OperatingSystemVersion,
                500,
                comment(Predicate::starts("Android")),
                comment_version(),
            ),
    );

    // Device model: modern agents put it right after the Android comment,
    // older ones append a `Build/` tag to it.
    let model_from_build = ValueExpr::StripAfter {
        expr: Box::new(ValueExpr::MatchedText),
        marker: " Build/".to_string(),
    };
    let brand_key = |model: ValueExpr| {
        ValueExpr::lookup(
            "android-brands",
            ValueExpr::FirstWord(Box::new(ValueExpr::StripAfter {
                expr: Box::new(model),
                marker: "-".to_string(),
            })),
        )
    };
    rules.push(
        MatcherSpec::new("device: android model (build tag)")
            .word("android")
            .word("build")
            .require(comment(Predicate::starts("Android")))
            .extract(
                Field::DeviceName,
                510,
                comment(Predicate::contains("Build/")),
                model_from_build.clone(),
            ),
    );
    rules.push(
        MatcherSpec::new("device: android brand (build tag)")
            .word("android")
            .word("build")
            .require(comment(Predicate::starts("Android")))
            .extract(
                Field::DeviceBrand,
                510,
                comment(Predicate::contains("Build/")),
                brand_key(model_from_build.clone()),
            ),
    );
    rules.push(
        MatcherSpec::new("device: android model (position)")
            .word("android")
            .require({
                let mut steps = comment_at(1);
                steps.push(Step::Text(Predicate::starts("Android")));
                steps
            })
            .extract(Field::DeviceName, 500, comment_at(2), model_from_build.clone()),
    );
    rules.push(
        MatcherSpec::new("device: android brand (position)")
            .word("android")
            .require({
                let mut steps = comment_at(1);
                steps.push(Step::Text(Predicate::starts("Android")));
                steps
            })
            .extract(
                Field::DeviceBrand,
                500,
                comment_at(2),
                brand_key(model_from_build),
            ),
    );

    // Apple.
    rules.push(
        MatcherSpec::new("os: mac")
            .word("mac")
            .word("os")
            .word("x")
            .extract(
                Field::OperatingSystemName,
                500,
                comment(Predicate::contains("Mac OS X")),
                lit("Mac OS X"),
            )
            .extract(
                Field::OperatingSystemClass,
                500,
                comment(Predicate::contains("Mac OS X")),
                lit("Desktop"),
            )
            .extract(
                Field::DeviceClass,
                500,
                comment(Predicate::contains("Mac OS X")),
                lit("Desktop"),
            )
            .extract(
                Field::DeviceName,
                500,
                comment(Predicate::contains("Mac OS X")),
                lit("Apple Macintosh"),
            )
            .extract(
                Field::DeviceBrand,
                500,
                comment(Predicate::contains("Mac OS X")),
                lit("Apple"),
            ),
    );
    rules.push(
        MatcherSpec::new("os: mac version")
            .word("mac")
            .word("os")
            .word("x")
            .extract(
                Field::OperatingSystemVersion,
                500,
                comment(Predicate::contains("Mac OS X")),
                comment_version(),
            ),
    );

    for (rule, word, device_class, device_name, os_comment) in [
        (
            "os: iphone",
            "iphone",
            "Phone",
            "Apple iPhone",
            "CPU iPhone OS",
        ),
        ("os: ipad", "ipad", "Tablet", "Apple iPad", "CPU OS"),
    ] {
        rules.push(
            MatcherSpec::new(rule)
                .word(word)
                .extract(
                    Field::DeviceClass,
                    600,
                    comment(Predicate::eq(word)),
                    lit(device_class),
                )
                .extract(
                    Field::DeviceName,
                    600,
                    comment(Predicate::eq(word)),
                    lit(device_name),
                )
                .extract(
                    Field::DeviceBrand,
                    600,
                    comment(Predicate::eq(word)),
                    lit("Apple"),
                )
                .extract(
                    Field::OperatingSystemName,
                    600,
                    comment(Predicate::eq(word)),
                    lit("iOS"),
                )
                .extract(
                    Field::OperatingSystemClass,
                    600,
                    comment(Predicate::eq(word)),
                    lit("Mobile"),
                ),
        );
        rules.push(
            MatcherSpec::new(match rule {
                "os: iphone" => "os: iphone version",
                _ => "os: ipad version",
            })
            .word(word)
            .extract(
                Field::OperatingSystemVersion,
                600,
                comment(Predicate::starts(os_comment)),
                comment_version(),
            ),
        );
    }

    // CPU markers.
    rules.push(cpu_rule(
        "cpu: x86_64",
        "x86_64",
        "x86_64",
        Some("Intel x86_64"),
        Some("64"),
        500,
    ));
    rules.push(cpu_rule(
        "cpu: amd64",
        "amd64",
        "amd64",
        Some("AMD x86_64"),
        Some("64"),
        500,
    ));
    rules.push(cpu_rule(
        "cpu: i686",
        "i686",
        "i686",
        Some("Intel i686"),
        Some("32"),
        500,
    ));
    rules.push(cpu_rule(
        "cpu: i386",
        "i386",
        "i386",
        Some("Intel i386"),
        Some("32"),
        500,
    ));
    rules.push(cpu_rule(
        "cpu: aarch64",
        "aarch64",
        "aarch64",
        Some("ARM"),
        Some("64"),
        500,
    ));
    rules.push(cpu_rule(
        "cpu: arm64",
        "arm64",
        "arm64",
        Some("ARM"),
        Some("64"),
        500,
    ));
    rules.push(cpu_rule("cpu: wow64", "wow64", "WOW64", None, Some("64"), 400));
    rules.push(cpu_rule("cpu: win64", "win64", "Win64", None, Some("64"), 450));
    rules.push(cpu_rule(
        "cpu: x64",
        "x64",
        "x64",
        Some("Intel x86_64"),
        Some("64"),
        440,
    ));

    rules
}
