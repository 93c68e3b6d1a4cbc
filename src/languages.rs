use itertools::Itertools;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageOption {
    pub code: &'static str,
    pub name: &'static str,
}

pub const LANGUAGES: [LanguageOption; 6] = [
    LanguageOption { code: "en", name: "English" },
    LanguageOption { code: "pt", name: "Portuguese" },
    LanguageOption { code: "es", name: "Spanish" },
    LanguageOption { code: "fr", name: "French" },
    LanguageOption { code: "de", name: "German" },
    LanguageOption { code: "it", name: "Italian" },
];

/// Looks up a catalog entry, ignoring ASCII case.
pub fn find(code: &str) -> Option<&'static LanguageOption> {
    LANGUAGES
        .iter()
        .find(|lang| lang.code.eq_ignore_ascii_case(code.trim()))
}

pub fn display_name(code: &str) -> &str {
    match find(code) {
        Some(lang) => lang.name,
        None => code,
    }
}

pub fn catalog_line() -> String {
    LANGUAGES
        .iter()
        .map(|lang| format!("{} ({})", lang.name, lang.code))
        .join(", ")
}
