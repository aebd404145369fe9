// Header-map analysis: Client Hints overriding UA-derived fields.

use std::collections::HashMap;
use uascope::{Field, UserAgentAnalyzer};

const CHROME_LINUX_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/100.0.4896.127 Safari/537.36";

fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn analyzer() -> UserAgentAnalyzer {
    UserAgentAnalyzer::builder()
        .immediate_initialization()
        .build()
        .expect("analyzer builds")
}

#[test]
fn test_platform_hints_override_ua_fields() {
    let a = analyzer();
    let r = a.parse_headers(&headers(&[
        ("User-Agent", CHROME_LINUX_UA),
        ("Sec-Ch-Ua-Platform", "\"Linux\""),
        ("Sec-Ch-Ua-Platform-Version", "\"5.13.0\""),
        ("Sec-Ch-Ua-Bitness", "\"64\""),
    ]));

    assert_eq!(r.get(Field::DeviceCpu), "Intel x86_64");
    assert_eq!(r.get(Field::DeviceCpuBits), "64");
    assert_eq!(r.get(Field::OperatingSystemName), "Linux");
    assert_eq!(r.get(Field::OperatingSystemVersion), "5.13.0");
    assert_eq!(r.get(Field::OperatingSystemVersionMajor), "5");
    assert_eq!(r.get(Field::OperatingSystemNameVersion), "Linux 5.13.0");
    assert_eq!(r.get(Field::AgentName), "Chrome");
    assert_eq!(r.get(Field::AgentVersion), "100.0.4896.127");
}

#[test]
fn test_empty_hint_values_change_nothing() {
    let a = analyzer();
    let r = a.parse_headers(&headers(&[
        ("User-Agent", CHROME_LINUX_UA),
        ("Sec-Ch-Ua-Platform", "\"\""),
        ("Sec-Ch-Ua-Platform-Version", "\"\""),
        ("Sec-Ch-Ua-Bitness", ""),
    ]));

    assert_eq!(r.get(Field::OperatingSystemVersion), "??");
    assert_eq!(r.get(Field::OperatingSystemNameVersion), "Linux ??");
    assert_eq!(r.get(Field::AgentName), "Chrome");
    assert_eq!(r.get(Field::AgentVersion), "100.0.4896.127");

    // Field-by-field identical to the plain string parse.
    let plain = a.parse(CHROME_LINUX_UA);
    assert_eq!(r.to_map(), plain.to_map());
}

#[test]
fn test_brand_list_sets_agent() {
    let a = analyzer();
    let r = a.parse_headers(&headers(&[
        ("User-Agent", CHROME_LINUX_UA),
        (
            "Sec-Ch-Ua",
            "\" Not A;Brand\";v=\"99\", \"Chromium\";v=\"101\", \"Google Chrome\";v=\"101\"",
        ),
        (
            "Sec-Ch-Ua-Full-Version-List",
            "\" Not A;Brand\";v=\"99.0.0.0\", \"Chromium\";v=\"101.0.4951.41\", \"Google Chrome\";v=\"101.0.4951.41\"",
        ),
    ]));

    // The hint wins over the UA-derived 100.x version.
    assert_eq!(r.get(Field::AgentName), "Chrome");
    assert_eq!(r.get(Field::AgentVersion), "101.0.4951.41");
    assert_eq!(r.get(Field::AgentVersionMajor), "101");
}

#[test]
fn test_header_names_are_case_insensitive_and_unknown_ignored() {
    let a = analyzer();
    let lower = a.parse_headers(&headers(&[
        ("user-agent", CHROME_LINUX_UA),
        ("sec-ch-ua-platform", "\"Linux\""),
    ]));
    let mixed = a.parse_headers(&headers(&[
        ("USER-AGENT", CHROME_LINUX_UA),
        ("Sec-CH-UA-Platform", "\"Linux\""),
        ("X-Unknown-Header", "ignored"),
        ("Accept-Language", "en-US"),
    ]));
    assert_eq!(lower.to_map(), mixed.to_map());
}

#[test]
fn test_header_cache_key_is_order_independent() {
    let a = analyzer();
    a.parse_headers(&headers(&[
        ("User-Agent", CHROME_LINUX_UA),
        ("Sec-Ch-Ua-Platform", "\"Linux\""),
    ]));
    let runs = a.stats().engine_runs;

    // Same headers, different casing and (map) ordering: served from cache.
    a.parse_headers(&headers(&[
        ("sec-ch-ua-platform", "\"Linux\""),
        ("user-agent", CHROME_LINUX_UA),
    ]));
    assert_eq!(a.stats().engine_runs, runs);
}

#[test]
fn test_windows_platform_version_hint() {
    let a = analyzer();
    let r = a.parse_headers(&headers(&[
        (
            "User-Agent",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/103.0.0.0 Safari/537.36",
        ),
        ("Sec-Ch-Ua-Platform", "\"Windows\""),
        ("Sec-Ch-Ua-Platform-Version", "\"15.0.0\""),
    ]));
    // Platform version 13+ means Windows 11 even though the UA still says
    // NT 10.0.
    assert_eq!(r.get(Field::OperatingSystemName), "Windows NT");
    assert_eq!(r.get(Field::OperatingSystemVersion), "11");
    assert_eq!(r.get(Field::OperatingSystemNameVersion), "Windows 11");
}

#[test]
fn test_mobile_and_model_hints() {
    let a = analyzer();
    let r = a.parse_headers(&headers(&[
        (
            "User-Agent",
            "Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/112.0.0.0 Mobile Safari/537.36",
        ),
        ("Sec-Ch-Ua-Mobile", "?1"),
        ("Sec-Ch-Ua-Model", "\"Pixel 7 Pro\""),
    ]));
    assert_eq!(r.get(Field::DeviceClass), "Phone");
    assert_eq!(r.get(Field::DeviceName), "Pixel 7 Pro");
}

#[test]
fn test_headers_without_user_agent_classify_as_hacker() {
    let a = analyzer();
    let r = a.parse_headers(&headers(&[("Sec-Ch-Ua-Mobile", "?0")]));
    assert_eq!(r.get(Field::AgentName), "Hacker");
    assert_eq!(r.get(Field::AgentClass), "Hacker");
}
