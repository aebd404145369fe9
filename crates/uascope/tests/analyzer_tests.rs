// End-to-end analysis scenarios over the built-in rule set.

use uascope::{Field, UserAgentAnalyzer};

const FIREFOX_UA: &str =
    "Mozilla/5.0 (Windows; U; Windows NT 5.1; en-US; rv:1.8.1.11) Gecko/20071127 Firefox/2.0.0.11";
const CHROME_LINUX_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/100.0.4896.127 Safari/537.36";

fn analyzer() -> UserAgentAnalyzer {
    UserAgentAnalyzer::builder()
        .immediate_initialization()
        .build()
        .expect("analyzer builds")
}

#[test]
fn test_firefox_on_windows_xp() {
    let a = analyzer();
    let r = a.parse(FIREFOX_UA);

    assert_eq!(r.get(Field::DeviceClass), "Desktop");
    assert_eq!(r.get(Field::DeviceName), "Desktop");
    assert_eq!(r.get(Field::DeviceBrand), "Unknown");
    assert_eq!(r.get(Field::DeviceCpuBits), "32");

    assert_eq!(r.get(Field::OperatingSystemClass), "Desktop");
    assert_eq!(r.get(Field::OperatingSystemName), "Windows NT");
    assert_eq!(r.get(Field::OperatingSystemVersion), "XP");
    assert_eq!(r.get(Field::OperatingSystemVersionMajor), "XP");
    assert_eq!(r.get(Field::OperatingSystemNameVersion), "Windows XP");
    assert_eq!(r.get(Field::OperatingSystemNameVersionMajor), "Windows XP");

    assert_eq!(r.get(Field::LayoutEngineClass), "Browser");
    assert_eq!(r.get(Field::LayoutEngineName), "Gecko");
    assert_eq!(r.get(Field::LayoutEngineVersion), "1.8.1.11");
    assert_eq!(r.get(Field::LayoutEngineVersionMajor), "1");
    assert_eq!(r.get(Field::LayoutEngineNameVersion), "Gecko 1.8.1.11");
    assert_eq!(r.get(Field::LayoutEngineBuild), "20071127");

    assert_eq!(r.get(Field::AgentClass), "Browser");
    assert_eq!(r.get(Field::AgentName), "Firefox");
    assert_eq!(r.get(Field::AgentVersion), "2.0.0.11");
    assert_eq!(r.get(Field::AgentVersionMajor), "2");
    assert_eq!(r.get(Field::AgentNameVersion), "Firefox 2.0.0.11");
    assert_eq!(r.get(Field::AgentNameVersionMajor), "Firefox 2");
    assert_eq!(r.get(Field::AgentLanguageCode), "en-us");
    assert_eq!(r.get(Field::AgentLanguage), "English (United States)");
    assert_eq!(r.get(Field::AgentSecurity), "Strong security");
}

#[test]
fn test_empty_input_is_a_hacker() {
    let a = analyzer();
    let r = a.parse("");
    assert_eq!(r.get(Field::AgentName), "Hacker");
    assert_eq!(r.get(Field::AgentClass), "Hacker");
    assert_eq!(r.get(Field::DeviceClass), "Hacker");
}

#[test]
fn test_null_input_classifies_like_empty() {
    let a = analyzer();
    let null = a.parse_opt(None);
    let empty = a.parse("");
    assert_eq!(null.to_map(), empty.to_map());
}

#[test]
fn test_chrome_on_linux() {
    let a = analyzer();
    let r = a.parse(CHROME_LINUX_UA);

    assert_eq!(r.get(Field::DeviceClass), "Desktop");
    assert_eq!(r.get(Field::DeviceName), "Linux Desktop");
    assert_eq!(r.get(Field::DeviceCpu), "Intel x86_64");
    assert_eq!(r.get(Field::DeviceCpuBits), "64");
    assert_eq!(r.get(Field::OperatingSystemName), "Linux");
    assert_eq!(r.get(Field::OperatingSystemVersion), "??");
    assert_eq!(r.get(Field::OperatingSystemNameVersion), "Linux ??");
    assert_eq!(r.get(Field::AgentName), "Chrome");
    assert_eq!(r.get(Field::AgentVersion), "100.0.4896.127");
    assert_eq!(r.get(Field::AgentVersionMajor), "100");
    assert_eq!(r.get(Field::LayoutEngineName), "Blink");
    assert_eq!(r.get(Field::LayoutEngineVersion), "100.0");
}

#[test]
fn test_field_restricted_parse() {
    let a = analyzer();
    assert_eq!(a.parse_field(FIREFOX_UA, "AgentSecurity"), "Strong security");
    assert_eq!(a.parse_field(FIREFOX_UA, "NoSuchField"), "Unknown");
    assert_eq!(a.parse_field(FIREFOX_UA, ""), "Unknown");
}

#[test]
fn test_internet_explorer_forms() {
    let a = analyzer();

    let r = a.parse("Mozilla/4.0 (compatible; MSIE 6.0; Windows NT 5.1)");
    assert_eq!(r.get(Field::AgentName), "Internet Explorer");
    assert_eq!(r.get(Field::AgentVersion), "6.0");
    assert_eq!(r.get(Field::OperatingSystemVersion), "XP");

    let r = a.parse("Mozilla/5.0 (Windows NT 6.1; Trident/7.0; rv:11.0) like Gecko");
    assert_eq!(r.get(Field::AgentName), "Internet Explorer");
    assert_eq!(r.get(Field::AgentVersion), "11.0");
    assert_eq!(r.get(Field::LayoutEngineName), "Trident");
    assert_eq!(r.get(Field::LayoutEngineVersion), "7.0");
    // The "like Gecko" claim must not look like a Gecko engine.
    assert_ne!(r.get(Field::LayoutEngineName), "Gecko");
    assert_eq!(r.get(Field::OperatingSystemNameVersion), "Windows 7");
}

#[test]
fn test_safari_version_product() {
    let a = analyzer();
    let r = a.parse(
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 \
         (KHTML, like Gecko) Version/16.5 Safari/605.1.15",
    );
    assert_eq!(r.get(Field::AgentName), "Safari");
    assert_eq!(r.get(Field::AgentVersion), "16.5");
    assert_eq!(r.get(Field::OperatingSystemName), "Mac OS X");
    assert_eq!(r.get(Field::OperatingSystemVersion), "10.15.7");
    assert_eq!(r.get(Field::DeviceName), "Apple Macintosh");
    assert_eq!(r.get(Field::DeviceBrand), "Apple");
    assert_eq!(r.get(Field::LayoutEngineName), "AppleWebKit");
}

#[test]
fn test_iphone() {
    let a = analyzer();
    let r = a.parse(
        "Mozilla/5.0 (iPhone; CPU iPhone OS 16_6 like Mac OS X) AppleWebKit/605.1.15 \
         (KHTML, like Gecko) Version/16.5 Mobile/15E148 Safari/604.1",
    );
    assert_eq!(r.get(Field::DeviceClass), "Phone");
    assert_eq!(r.get(Field::DeviceName), "Apple iPhone");
    assert_eq!(r.get(Field::DeviceBrand), "Apple");
    assert_eq!(r.get(Field::OperatingSystemName), "iOS");
    assert_eq!(r.get(Field::OperatingSystemClass), "Mobile");
    assert_eq!(r.get(Field::OperatingSystemVersion), "16.6");
}

#[test]
fn test_android_device_model_and_brand() {
    let a = analyzer();

    let r = a.parse(
        "Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/112.0.0.0 Mobile Safari/537.36",
    );
    assert_eq!(r.get(Field::OperatingSystemName), "Android");
    assert_eq!(r.get(Field::OperatingSystemVersion), "13");
    assert_eq!(r.get(Field::DeviceClass), "Phone");
    assert_eq!(r.get(Field::DeviceName), "Pixel 7");
    assert_eq!(r.get(Field::DeviceBrand), "Google");

    let r = a.parse(
        "Mozilla/5.0 (Linux; U; Android 4.0.3; de-de; Galaxy S II Build/GRJ22) \
         AppleWebKit/534.30 (KHTML, like Gecko) Version/4.0 Mobile Safari/534.30",
    );
    assert_eq!(r.get(Field::DeviceName), "Galaxy S II");
    assert_eq!(r.get(Field::DeviceBrand), "Samsung");
    assert_eq!(r.get(Field::AgentLanguageCode), "de-de");
    assert_eq!(r.get(Field::AgentSecurity), "Strong security");
}

#[test]
fn test_robot_in_comment() {
    let a = analyzer();
    let r = a.parse("Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)");
    assert_eq!(r.get(Field::AgentName), "Googlebot");
    assert_eq!(r.get(Field::AgentVersion), "2.1");
    assert_eq!(r.get(Field::AgentClass), "Robot");
    assert_eq!(r.get(Field::DeviceClass), "Robot");
}

#[test]
fn test_command_line_clients() {
    let a = analyzer();

    let r = a.parse("curl/7.68.0");
    assert_eq!(r.get(Field::AgentName), "curl");
    assert_eq!(r.get(Field::AgentVersion), "7.68.0");
    assert_eq!(r.get(Field::AgentClass), "Special");

    let r = a.parse("Wget/1.20.3 (linux-gnu)");
    assert_eq!(r.get(Field::AgentName), "Wget");
    assert_eq!(r.get(Field::AgentClass), "Special");
}

#[test]
fn test_parse_is_total_and_deterministic() {
    let a = analyzer();
    let inputs = [
        "",
        " ",
        "garbage",
        "(((((",
        ")))))",
        "a/b/c/d (;;;) =",
        "Mozilla/5.0 (Windows",
        "\"unterminated",
        FIREFOX_UA,
        CHROME_LINUX_UA,
    ];
    for input in inputs {
        let first = a.parse(input);
        let second = a.parse(input);
        assert_eq!(first.to_map(), second.to_map(), "input {input:?}");
    }
}

#[test]
fn test_sentinels_never_empty_and_version_invariants() {
    let a = analyzer();
    let corpus = [
        "",
        "garbage",
        FIREFOX_UA,
        CHROME_LINUX_UA,
        "curl/7.68.0",
        "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
        "Opera/9.80 (Windows NT 6.1) Presto/2.12.388 Version/12.16",
    ];
    for ua in corpus {
        let r = a.parse(ua);
        for field in Field::ALL {
            assert!(!r.get(field).is_empty(), "{field} empty for {ua:?}");
        }

        // AgentVersionMajor is "??" or the prefix of AgentVersion up to the
        // first dot.
        let version = r.get(Field::AgentVersion);
        let major = r.get(Field::AgentVersionMajor);
        if major != "??" {
            assert_eq!(major, version.split('.').next().unwrap(), "for {ua:?}");
        }

        // NameVersion is always the space-joined composition.
        assert_eq!(
            r.get(Field::AgentNameVersion),
            format!("{} {}", r.get(Field::AgentName), r.get(Field::AgentVersion)),
            "for {ua:?}"
        );
    }
}

#[test]
fn test_with_fields_restriction() {
    let a = UserAgentAnalyzer::builder()
        .with_fields(["AgentNameVersionMajor"])
        .expect("known field")
        .immediate_initialization()
        .build()
        .expect("analyzer builds");

    let r = a.parse(FIREFOX_UA);
    // The requested field is fully derived even though its inputs are not
    // part of the output set.
    assert_eq!(r.get(Field::AgentNameVersionMajor), "Firefox 2");
    assert_eq!(a.field_names(), vec!["AgentNameVersionMajor"]);
    assert_eq!(r.field_names(), vec!["AgentNameVersionMajor"]);

    let err = UserAgentAnalyzer::builder().with_fields(["NoSuchField"]);
    assert!(err.is_err());
}

#[test]
fn test_minimal_version_option() {
    let a = UserAgentAnalyzer::builder()
        .show_minimal_version()
        .build()
        .expect("analyzer builds");
    let r = a.parse(CHROME_LINUX_UA);
    assert_eq!(r.get(Field::AgentVersion), "100.0");
    assert_eq!(r.get(Field::AgentVersionMajor), "100");
    assert_eq!(r.get(Field::AgentNameVersion), "Chrome 100.0");
}

#[test]
#[should_panic(expected = "destroy")]
fn test_parse_after_destroy_panics() {
    let a = analyzer();
    a.parse(FIREFOX_UA);
    a.destroy();
    a.parse(FIREFOX_UA);
}
