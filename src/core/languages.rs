// src/core/languages.rs
use crate::core::types::{Direction, LanguageProfile, ScriptFamily};
use std::collections::HashMap;

use Direction::{LeftToRight as Ltr, RightToLeft as Rtl};
use ScriptFamily as S;

pub const ENGLISH: &str = "english";

macro_rules! lang {
    ($name:literal, $script:expr, $dir:expr, [$($alias:literal),* $(,)?]) => {
        LanguageProfile {
            name: $name,
            aliases: &[$($alias),*],
            script: $script,
            direction: $dir,
        }
    };
}

/// Every language the engine accepts. Aliases cover ISO 639-1/639-3 codes,
/// native names and misspellings seen in user profiles.
static LANGUAGES: &[LanguageProfile] = &[
    lang!("english", S::Latin, Ltr, ["en", "eng", "englisch", "inglish"]),
    lang!("spanish", S::Latin, Ltr, ["es", "spa", "español", "espanol", "spainish"]),
    lang!("french", S::Latin, Ltr, ["fr", "fra", "fre", "français", "francais"]),
    lang!("german", S::Latin, Ltr, ["de", "deu", "ger", "deutsch"]),
    lang!("portuguese", S::Latin, Ltr, ["pt", "por", "português", "portugues"]),
    lang!("italian", S::Latin, Ltr, ["it", "ita", "italiano"]),
    lang!("dutch", S::Latin, Ltr, ["nl", "nld", "nederlands"]),
    lang!("indonesian", S::Latin, Ltr, ["id", "ind", "bahasa indonesia"]),
    lang!("malay", S::Latin, Ltr, ["ms", "msa", "bahasa melayu"]),
    lang!("turkish", S::Latin, Ltr, ["tr", "tur", "türkçe", "turkce"]),
    lang!("vietnamese", S::Latin, Ltr, ["vi", "vie", "tiếng việt"]),
    lang!("swahili", S::Latin, Ltr, ["sw", "swa", "kiswahili"]),
    lang!("filipino", S::Latin, Ltr, ["fil", "tl", "tagalog"]),
    lang!("polish", S::Latin, Ltr, ["pl", "pol", "polski"]),
    lang!("hindi", S::Devanagari, Ltr, ["hi", "hin", "हिन्दी", "हिंदी", "hindhi", "hindee"]),
    lang!("marathi", S::Devanagari, Ltr, ["mr", "mar", "मराठी"]),
    lang!("nepali", S::Devanagari, Ltr, ["ne", "nep", "नेपाली", "nepalese"]),
    lang!("sanskrit", S::Devanagari, Ltr, ["sa", "san", "संस्कृतम्"]),
    lang!("bengali", S::Bengali, Ltr, ["bn", "ben", "bangla", "বাংলা", "bengoli"]),
    lang!("assamese", S::Bengali, Ltr, ["as", "asm", "অসমীয়া"]),
    lang!("tamil", S::Tamil, Ltr, ["ta", "tam", "தமிழ்", "thamil"]),
    lang!("telugu", S::Telugu, Ltr, ["te", "tel", "తెలుగు", "telgu", "telegu"]),
    lang!("kannada", S::Kannada, Ltr, ["kn", "kan", "ಕನ್ನಡ", "kanada", "kannad"]),
    lang!("malayalam", S::Malayalam, Ltr, ["ml", "mal", "മലയാളം", "malyalam"]),
    lang!("gujarati", S::Gujarati, Ltr, ["gu", "guj", "ગુજરાતી", "gujrati"]),
    lang!("punjabi", S::Gurmukhi, Ltr, ["pa", "pan", "ਪੰਜਾਬੀ", "panjabi"]),
    lang!("odia", S::Odia, Ltr, ["or", "ori", "ory", "oriya", "ଓଡ଼ିଆ"]),
    lang!("sinhala", S::Sinhala, Ltr, ["si", "sin", "sinhalese", "සිංහල"]),
    lang!("arabic", S::Arabic, Rtl, ["ar", "ara", "العربية"]),
    lang!("urdu", S::Arabic, Rtl, ["ur", "urd", "اردو"]),
    lang!("persian", S::Arabic, Rtl, ["fa", "fas", "per", "farsi", "فارسی"]),
    lang!("hebrew", S::Hebrew, Rtl, ["he", "heb", "iw", "עברית"]),
    lang!("chinese", S::Cjk, Ltr, ["zh", "zho", "chi", "mandarin", "中文"]),
    lang!("japanese", S::Cjk, Ltr, ["ja", "jpn", "日本語"]),
    lang!("korean", S::Cjk, Ltr, ["ko", "kor", "한국어"]),
    lang!("thai", S::Indochinese, Ltr, ["th", "tha", "ไทย"]),
    lang!("lao", S::Indochinese, Ltr, ["lo", "lao language", "ລາວ"]),
    lang!("khmer", S::Indochinese, Ltr, ["km", "khm", "cambodian"]),
    lang!("burmese", S::Indochinese, Ltr, ["my", "mya", "bur", "myanmar"]),
    lang!("tibetan", S::Indochinese, Ltr, ["bo", "bod", "tib"]),
    lang!("russian", S::Cyrillic, Ltr, ["ru", "rus", "русский"]),
    lang!("ukrainian", S::Cyrillic, Ltr, ["uk", "ukr", "українська"]),
    lang!("bulgarian", S::Cyrillic, Ltr, ["bg", "bul", "български"]),
    lang!("greek", S::Greek, Ltr, ["el", "ell", "gre", "ελληνικά"]),
    lang!("armenian", S::Armenian, Ltr, ["hy", "hye", "arm", "հայերեն"]),
    lang!("georgian", S::Georgian, Ltr, ["ka", "kat", "geo", "ქართული"]),
    lang!("amharic", S::Ethiopic, Ltr, ["am", "amh", "አማርኛ"]),
];

/// Lookup table from every accepted spelling to its canonical profile.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    by_alias: HashMap<String, usize>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        let mut by_alias = HashMap::new();
        for (idx, profile) in LANGUAGES.iter().enumerate() {
            by_alias.insert(profile.name.to_string(), idx);
            for alias in profile.aliases {
                by_alias.insert(normalize_key(alias), idx);
            }
        }
        Self { by_alias }
    }

    /// Resolves a code, native name or misspelling to the canonical profile.
    pub fn resolve(&self, name: &str) -> Option<&'static LanguageProfile> {
        self.by_alias
            .get(&normalize_key(name))
            .map(|&idx| &LANGUAGES[idx])
    }

    /// Canonical name, or the trimmed lower-cased input when unknown.
    pub fn canonical_name(&self, name: &str) -> String {
        self.resolve(name)
            .map(|p| p.name.to_string())
            .unwrap_or_else(|| normalize_key(name))
    }

    pub fn supported(&self) -> impl Iterator<Item = &'static LanguageProfile> {
        LANGUAGES.iter()
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_key(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_native_names_and_misspellings_resolve() {
        let registry = LanguageRegistry::new();
        for alias in ["hi", "HIN", " Hindi ", "हिन्दी", "hindhi"] {
            assert_eq!(registry.resolve(alias).map(|p| p.name), Some("hindi"), "{alias}");
        }
        assert_eq!(registry.resolve("telgu").map(|p| p.name), Some("telugu"));
        assert!(registry.resolve("klingon").is_none());
        assert_eq!(registry.canonical_name(" Klingon "), "klingon");
    }

    #[test]
    fn every_alias_is_unique() {
        let mut seen = HashMap::new();
        for profile in LANGUAGES {
            for key in std::iter::once(profile.name).chain(profile.aliases.iter().copied()) {
                if let Some(prev) = seen.insert(normalize_key(key), profile.name) {
                    panic!("alias {key} shared by {prev} and {}", profile.name);
                }
            }
        }
    }

    #[test]
    fn directions_follow_script() {
        let registry = LanguageRegistry::new();
        assert_eq!(registry.resolve("urdu").map(|p| p.direction), Some(Direction::RightToLeft));
        assert_eq!(registry.resolve("tamil").map(|p| p.direction), Some(Direction::LeftToRight));
        assert!(!registry.resolve("spanish").map_or(true, |p| p.needs_transliteration()));
    }
}
