// src/core/detector.rs
use crate::core::types::{Detection, ScriptFamily};
use crate::error::{Result, TranslationError};
use std::ops::RangeInclusive;

/// Confidence reported when a non-Latin script pattern matches.
pub const MATCH_CONFIDENCE: f32 = 0.95;
/// Confidence reported for the Latin fallback.
pub const LATIN_FALLBACK_CONFIDENCE: f32 = 0.5;

struct ScriptPattern {
    script: ScriptFamily,
    language: &'static str,
    ranges: &'static [RangeInclusive<u32>],
}

/// Candidate patterns in priority order: South Asian, then Indochinese and
/// Tibetan, then CJK (Kana before Hangul before Han so Japanese text that
/// mixes Kanji is not reported as Chinese), then Arabic and Hebrew, then
/// Cyrillic and the remaining alphabets. Latin is the fallback.
static PATTERNS: &[ScriptPattern] = &[
    ScriptPattern { script: ScriptFamily::Devanagari, language: "hindi", ranges: &[0x0900..=0x097F, 0xA8E0..=0xA8FF] },
    ScriptPattern { script: ScriptFamily::Bengali, language: "bengali", ranges: &[0x0980..=0x09FF] },
    ScriptPattern { script: ScriptFamily::Gurmukhi, language: "punjabi", ranges: &[0x0A00..=0x0A7F] },
    ScriptPattern { script: ScriptFamily::Gujarati, language: "gujarati", ranges: &[0x0A80..=0x0AFF] },
    ScriptPattern { script: ScriptFamily::Odia, language: "odia", ranges: &[0x0B00..=0x0B7F] },
    ScriptPattern { script: ScriptFamily::Tamil, language: "tamil", ranges: &[0x0B80..=0x0BFF] },
    ScriptPattern { script: ScriptFamily::Telugu, language: "telugu", ranges: &[0x0C00..=0x0C7F] },
    ScriptPattern { script: ScriptFamily::Kannada, language: "kannada", ranges: &[0x0C80..=0x0CFF] },
    ScriptPattern { script: ScriptFamily::Malayalam, language: "malayalam", ranges: &[0x0D00..=0x0D7F] },
    ScriptPattern { script: ScriptFamily::Sinhala, language: "sinhala", ranges: &[0x0D80..=0x0DFF] },
    ScriptPattern { script: ScriptFamily::Indochinese, language: "thai", ranges: &[0x0E00..=0x0E7F] },
    ScriptPattern { script: ScriptFamily::Indochinese, language: "lao", ranges: &[0x0E80..=0x0EFF] },
    ScriptPattern { script: ScriptFamily::Indochinese, language: "tibetan", ranges: &[0x0F00..=0x0FFF] },
    ScriptPattern { script: ScriptFamily::Indochinese, language: "burmese", ranges: &[0x1000..=0x109F] },
    ScriptPattern { script: ScriptFamily::Indochinese, language: "khmer", ranges: &[0x1780..=0x17FF, 0x19E0..=0x19FF] },
    ScriptPattern { script: ScriptFamily::Cjk, language: "japanese", ranges: &[0x3040..=0x309F, 0x30A0..=0x30FF, 0x31F0..=0x31FF] },
    ScriptPattern { script: ScriptFamily::Cjk, language: "korean", ranges: &[0x1100..=0x11FF, 0x3130..=0x318F, 0xAC00..=0xD7AF] },
    ScriptPattern { script: ScriptFamily::Cjk, language: "chinese", ranges: &[0x3400..=0x4DBF, 0x4E00..=0x9FFF, 0xF900..=0xFAFF, 0x20000..=0x2A6DF] },
    ScriptPattern { script: ScriptFamily::Arabic, language: "arabic", ranges: &[0x0600..=0x06FF, 0x0750..=0x077F, 0x08A0..=0x08FF, 0xFB50..=0xFDFF, 0xFE70..=0xFEFF] },
    ScriptPattern { script: ScriptFamily::Hebrew, language: "hebrew", ranges: &[0x0590..=0x05FF, 0xFB1D..=0xFB4F] },
    ScriptPattern { script: ScriptFamily::Cyrillic, language: "russian", ranges: &[0x0400..=0x04FF, 0x0500..=0x052F] },
    ScriptPattern { script: ScriptFamily::Greek, language: "greek", ranges: &[0x0370..=0x03FF, 0x1F00..=0x1FFF] },
    ScriptPattern { script: ScriptFamily::Armenian, language: "armenian", ranges: &[0x0530..=0x058F] },
    ScriptPattern { script: ScriptFamily::Georgian, language: "georgian", ranges: &[0x10A0..=0x10FF, 0x2D00..=0x2D2F] },
    ScriptPattern { script: ScriptFamily::Ethiopic, language: "amharic", ranges: &[0x1200..=0x137F, 0x1380..=0x139F] },
];

impl ScriptPattern {
    fn matches(&self, text: &str) -> bool {
        text.chars().any(|c| {
            let code = c as u32;
            self.ranges.iter().any(|r| r.contains(&code))
        })
    }
}

/// Classifies text by Unicode block. Stateless; first pattern to match wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptDetector;

impl ScriptDetector {
    pub fn new() -> Self {
        Self
    }

    /// Detects the script, falling back to Latin with a lower confidence.
    pub fn detect(&self, text: &str) -> Detection {
        self.detect_strict(text).unwrap_or(Detection {
            language: "english",
            script: ScriptFamily::Latin,
            confidence: LATIN_FALLBACK_CONFIDENCE,
        })
    }

    /// Like [`detect`](Self::detect) but reports the Latin fallback as
    /// [`TranslationError::DetectionAmbiguous`].
    pub fn detect_strict(&self, text: &str) -> Result<Detection> {
        PATTERNS
            .iter()
            .find(|p| p.matches(text))
            .map(|p| Detection {
                language: p.language,
                script: p.script,
                confidence: MATCH_CONFIDENCE,
            })
            .ok_or(TranslationError::DetectionAmbiguous)
    }

    /// True when Latin letters outnumber every other letter in the text.
    pub fn is_predominantly_latin(&self, text: &str) -> bool {
        let (latin, other) = text
            .chars()
            .filter(|c| c.is_alphabetic())
            .fold((0usize, 0usize), |(latin, other), c| {
                if is_latin_letter(c) {
                    (latin + 1, other)
                } else {
                    (latin, other + 1)
                }
            });
        latin > 0 && latin > other
    }
}

pub(crate) fn is_latin_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
        || matches!(c as u32, 0x00C0..=0x024F | 0x1E00..=0x1EFF)
            && c.is_alphabetic()
}
