//! Client Hints header mapping.
//!
//! `Sec-Ch-Ua-*` headers carry structured replacements for parts of the
//! user-agent string. They are turned into ordinary field proposals in a
//! confidence band above every rule, so plain resolution implements the
//! override; no special code runs downstream. Empty header values yield
//! nothing, leaving the plain UA-derived fields in place.

use std::collections::BTreeMap;
use std::collections::HashMap;
use uascope_fields::Field;
use uascope_rules::Proposal;

/// Headers the analyzer understands, lowercased. Everything else in a
/// header-map input is ignored.
pub(crate) const KNOWN_HEADERS: [&str; 11] = [
    "sec-ch-ua",
    "sec-ch-ua-arch",
    "sec-ch-ua-bitness",
    "sec-ch-ua-full-version",
    "sec-ch-ua-full-version-list",
    "sec-ch-ua-mobile",
    "sec-ch-ua-model",
    "sec-ch-ua-platform",
    "sec-ch-ua-platform-version",
    "sec-ch-ua-wow64",
    "user-agent",
];

/// Pseudo matcher id carried by header-derived proposals. Larger than any
/// rule id, so a rule wins a (theoretical) confidence tie.
const HINT_SOURCE: u32 = u32::MAX;

/// Confidence band for header-derived proposals.
const HINT_BASE: u32 = 20_000;

/// The known-header subset of a header map, with lowercased names.
///
/// A `BTreeMap` so iteration is sorted, which makes the canonical cache key
/// independent of the caller's map order.
pub(crate) fn known_subset(headers: &HashMap<String, String>) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            let lower = name.to_lowercase();
            KNOWN_HEADERS
                .contains(&lower.as_str())
                .then(|| (lower, value.clone()))
        })
        .collect()
}

/// Canonical cache key for a header-map input: `name=value` lines over the
/// sorted known-header subset.
pub(crate) fn canonical_key(known: &BTreeMap<String, String>) -> String {
    let mut key = String::new();
    for (name, value) in known {
        key.push_str(name);
        key.push('=');
        key.push_str(value);
        key.push('\n');
    }
    key
}

/// Turn the known headers into field proposals.
pub(crate) fn proposals(known: &BTreeMap<String, String>) -> Vec<Proposal> {
    let mut out = Vec::new();
    let mut push = |field: Field, value: String, confidence: u32| {
        if !value.is_empty() {
            out.push(Proposal {
                field,
                value,
                confidence,
                matcher: HINT_SOURCE,
            });
        }
    };

    let get = |name: &str| known.get(name).map(String::as_str).unwrap_or("");

    // Brand lists: the full-version list beats the low-entropy one.
    if let Some((brand, version)) = pick_brand(&parse_brand_list(get("sec-ch-ua"))) {
        push(Field::AgentName, brand, HINT_BASE + 10);
        push(Field::AgentVersion, version, HINT_BASE);
    }
    if let Some((brand, version)) = pick_brand(&parse_brand_list(get("sec-ch-ua-full-version-list")))
    {
        push(Field::AgentName, brand, HINT_BASE + 20);
        push(Field::AgentVersion, version, HINT_BASE + 20);
    }
    push(
        Field::AgentVersion,
        sf_string(get("sec-ch-ua-full-version")),
        HINT_BASE + 15,
    );

    let platform = sf_string(get("sec-ch-ua-platform"));
    if !platform.is_empty() {
        push(
            Field::OperatingSystemName,
            normalize_platform(&platform),
            HINT_BASE + 10,
        );
    }
    let platform_version = sf_string(get("sec-ch-ua-platform-version"));
    if !platform_version.is_empty() {
        let version = if platform.eq_ignore_ascii_case("Windows") {
            windows_platform_version(&platform_version)
        } else {
            platform_version
        };
        push(Field::OperatingSystemVersion, version, HINT_BASE + 10);
    }

    let bitness = sf_string(get("sec-ch-ua-bitness"));
    push(Field::DeviceCpuBits, bitness.clone(), HINT_BASE + 10);
    if get("sec-ch-ua-wow64").trim() == "?1" {
        push(Field::DeviceCpuBits, "64".to_string(), HINT_BASE);
    }

    let arch = sf_string(get("sec-ch-ua-arch"));
    if !arch.is_empty() {
        let cpu = match arch.to_lowercase().as_str() {
            "x86" if bitness == "64" => "Intel x86_64".to_string(),
            "x86" => "Intel x86".to_string(),
            "arm" => "ARM".to_string(),
            other => other.to_string(),
        };
        push(Field::DeviceCpu, cpu, HINT_BASE);
    }

    push(
        Field::DeviceName,
        sf_string(get("sec-ch-ua-model")),
        HINT_BASE + 10,
    );
    if get("sec-ch-ua-mobile").trim() == "?1" {
        push(Field::DeviceClass, "Phone".to_string(), HINT_BASE);
    }

    out
}

/// Unwrap a structured-field string: surrounding quotes dropped, `\"` and
/// `\\` unescaped. Unquoted input passes through trimmed.
fn sf_string(value: &str) -> String {
    let value = value.trim();
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        let inner = &value[1..value.len() - 1];
        let mut out = String::with_capacity(inner.len());
        let mut escaped = false;
        for c in inner.chars() {
            if escaped {
                out.push(c);
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else {
                out.push(c);
            }
        }
        out
    } else {
        value.to_string()
    }
}

/// Parse a `"Brand";v="1.2", "Other";v="3"` list into (brand, version)
/// pairs, GREASE entries included.
fn parse_brand_list(value: &str) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut escaped = false;

    for c in value.chars() {
        match c {
            '\\' if in_quote && !escaped => {
                escaped = true;
                current.push(c);
            }
            '"' if !escaped => {
                in_quote = !in_quote;
                current.push(c);
            }
            ',' if !in_quote => {
                entries.push(std::mem::take(&mut current));
            }
            c => {
                escaped = false;
                current.push(c);
            }
        }
    }
    entries.push(current);

    entries
        .into_iter()
        .filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                return None;
            }
            // The brand may itself contain ';' inside its quotes, so the
            // brand/parameter split has to honor them.
            let (brand, params) = if entry.starts_with('"') {
                match closing_quote(entry) {
                    Some(i) => (sf_string(&entry[..=i]), &entry[i + 1..]),
                    None => (sf_string(entry), ""),
                }
            } else {
                match entry.split_once(';') {
                    Some((b, p)) => (b.trim().to_string(), p),
                    None => (entry.to_string(), ""),
                }
            };
            if brand.is_empty() {
                return None;
            }
            let version = params
                .split(';')
                .filter_map(|p| p.trim().strip_prefix("v="))
                .next()
                .map(sf_string)
                .unwrap_or_default();
            Some((brand, version))
        })
        .collect()
}

/// Byte index of the quote closing a string that starts with `"`.
fn closing_quote(entry: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in entry.char_indices().skip(1) {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => return Some(i),
            _ => {}
        }
    }
    None
}

/// GREASE brands spell "Not A Brand" with rotating punctuation.
fn is_grease(brand: &str) -> bool {
    let normalized: String = brand
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    normalized.contains("not") && normalized.ends_with("brand")
}

/// Pick the most concrete brand: not GREASE, and a marketed name over the
/// generic "Chromium" engine brand when both are present.
fn pick_brand(brands: &[(String, String)]) -> Option<(String, String)> {
    let concrete = brands
        .iter()
        .find(|(b, _)| !is_grease(b) && !b.eq_ignore_ascii_case("Chromium"));
    let (brand, version) = concrete.or_else(|| brands.iter().find(|(b, _)| !is_grease(b)))?;
    Some((normalize_brand(brand), version.clone()))
}

fn normalize_brand(brand: &str) -> String {
    match brand {
        "Google Chrome" => "Chrome".to_string(),
        "Microsoft Edge" => "Edge".to_string(),
        other => other.to_string(),
    }
}

/// Platform names are aligned with the names the rule set produces.
fn normalize_platform(platform: &str) -> String {
    match platform {
        "macOS" => "Mac OS X".to_string(),
        "Windows" => "Windows NT".to_string(),
        other => other.to_string(),
    }
}

/// The Windows platform-version encodes marketing versions: 0.x maps to the
/// NT 6 era, majors 1-12 mean Windows 10 and 13+ means Windows 11.
fn windows_platform_version(version: &str) -> String {
    match version {
        "0.1" => return "7".to_string(),
        "0.2" => return "8".to_string(),
        "0.3" => return "8.1".to_string(),
        _ => {}
    }
    let major: u32 = version.split('.').next().and_then(|m| m.parse().ok()).unwrap_or(0);
    if major >= 13 {
        "11".to_string()
    } else if major >= 1 {
        "10".to_string()
    } else {
        version.to_string()
    }
}
