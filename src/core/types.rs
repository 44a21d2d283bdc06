// src/core/types.rs
use serde::{Deserialize, Serialize};

/// The closed set of writing systems the engine knows about.
/// Every language belongs to exactly one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptFamily {
    Latin,
    Devanagari,
    Bengali,
    Tamil,
    Telugu,
    Kannada,
    Malayalam,
    Gujarati,
    Gurmukhi,
    Odia,
    Sinhala,
    Arabic,
    Hebrew,
    /// Han, Kana and Hangul.
    Cjk,
    /// Thai, Lao, Khmer, Myanmar and Tibetan.
    Indochinese,
    Cyrillic,
    Greek,
    Armenian,
    Georgian,
    Ethiopic,
}

impl ScriptFamily {
    pub fn is_latin(self) -> bool {
        self == ScriptFamily::Latin
    }

    pub fn name(self) -> &'static str {
        match self {
            ScriptFamily::Latin => "latin",
            ScriptFamily::Devanagari => "devanagari",
            ScriptFamily::Bengali => "bengali",
            ScriptFamily::Tamil => "tamil",
            ScriptFamily::Telugu => "telugu",
            ScriptFamily::Kannada => "kannada",
            ScriptFamily::Malayalam => "malayalam",
            ScriptFamily::Gujarati => "gujarati",
            ScriptFamily::Gurmukhi => "gurmukhi",
            ScriptFamily::Odia => "odia",
            ScriptFamily::Sinhala => "sinhala",
            ScriptFamily::Arabic => "arabic",
            ScriptFamily::Hebrew => "hebrew",
            ScriptFamily::Cjk => "cjk",
            ScriptFamily::Indochinese => "indochinese",
            ScriptFamily::Cyrillic => "cyrillic",
            ScriptFamily::Greek => "greek",
            ScriptFamily::Armenian => "armenian",
            ScriptFamily::Georgian => "georgian",
            ScriptFamily::Ethiopic => "ethiopic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    LeftToRight,
    RightToLeft,
}

/// Static description of one language. Built once from the language table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageProfile {
    /// Canonical lower-case English name, e.g. "hindi".
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub script: ScriptFamily,
    pub direction: Direction,
}

impl LanguageProfile {
    /// Latin-script languages never need transliteration into themselves.
    pub fn needs_transliteration(&self) -> bool {
        !self.script.is_latin()
    }
}

/// Output of the script detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Detection {
    pub language: &'static str,
    pub script: ScriptFamily,
    pub confidence: f32,
}

/// The immutable outcome of a transliteration or translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub text: String,
    pub original_text: String,
    pub source_language: String,
    pub target_language: String,
    pub is_translated: bool,
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TranslationResult {
    /// A result that leaves the text untouched.
    pub fn passthrough(text: &str, source: &str, target: &str) -> Self {
        Self {
            text: text.to_string(),
            original_text: text.to_string(),
            source_language: source.to_string(),
            target_language: target.to_string(),
            is_translated: false,
            confidence: 0.0,
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Normal,
    Low,
}

impl Priority {
    /// Dispatch rank, lower runs first.
    pub(crate) fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Normal => 1,
            Priority::Low => 2,
        }
    }
}

/// What a queued task asks the engine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Translate,
    Transliterate,
}
