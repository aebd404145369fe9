//! Agent language expansion.

use super::Calculator;
use crate::resolve::FieldMap;
use uascope_fields::Field;

/// Expands `AgentLanguageCode` (`en-us`) into a human readable
/// `AgentLanguage` (`English (United States)`) through a closed locale
/// table. Codes outside the table pass through unchanged.
pub(crate) struct LanguageName;

const LOCALES: &[(&str, &str)] = &[
    ("ar", "Arabic"),
    ("cs", "Czech"),
    ("da", "Danish"),
    ("de", "German"),
    ("de-at", "German (Austria)"),
    ("de-ch", "German (Switzerland)"),
    ("de-de", "German (Germany)"),
    ("el", "Greek"),
    ("en", "English"),
    ("en-au", "English (Australia)"),
    ("en-ca", "English (Canada)"),
    ("en-gb", "English (United Kingdom)"),
    ("en-us", "English (United States)"),
    ("es", "Spanish"),
    ("es-es", "Spanish (Spain)"),
    ("es-mx", "Spanish (Mexico)"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("fr-ca", "French (Canada)"),
    ("fr-fr", "French (France)"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hu", "Hungarian"),
    ("id", "Indonesian"),
    ("it", "Italian"),
    ("it-it", "Italian (Italy)"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("nb", "Norwegian Bokmål"),
    ("nl", "Dutch"),
    ("nl-nl", "Dutch (Netherlands)"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("pt-br", "Portuguese (Brazil)"),
    ("pt-pt", "Portuguese (Portugal)"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("sv", "Swedish"),
    ("th", "Thai"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("vi", "Vietnamese"),
    ("zh", "Chinese"),
    ("zh-cn", "Chinese (China)"),
    ("zh-tw", "Chinese (Taiwan)"),
];

impl LanguageName {
    pub fn new() -> Self {
        LanguageName
    }
}

impl Calculator for LanguageName {
    fn name(&self) -> &'static str {
        "agent-language"
    }

    fn reads(&self) -> Vec<Field> {
        vec![Field::AgentLanguageCode]
    }

    fn writes(&self) -> Vec<Field> {
        vec![Field::AgentLanguage]
    }

    fn apply(&self, map: &mut FieldMap) {
        if !map.is_set(Field::AgentLanguageCode) {
            return;
        }
        let code = map.get(Field::AgentLanguageCode).to_lowercase();
        let language = LOCALES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, l)| (*l).to_string())
            .unwrap_or(code);
        map.set(Field::AgentLanguage, language);
    }
}
