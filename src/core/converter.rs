// src/core/converter.rs
use crate::core::detector::ScriptDetector;
use crate::core::languages::LanguageRegistry;
use crate::core::tables::{ScriptBlock, ScriptTables, MAX_CONSONANT_LEN, MAX_VOWEL_LEN};
use crate::error::{Result, TranslationError};
use std::sync::Arc;

/// Latin to native-script converter.
///
/// Left-to-right greedy matcher: consonant clusters are tried longest first,
/// a consonant may be followed by a vowel sign, and anything else falls back
/// to an independent vowel or passes through untouched. No joiner is inserted
/// between bare consonants; only conjuncts listed in the table are produced.
#[derive(Debug, Clone)]
pub struct Transliterator {
    tables: Arc<ScriptTables>,
    languages: Arc<LanguageRegistry>,
    detector: ScriptDetector,
}

impl Transliterator {
    pub fn new(tables: Arc<ScriptTables>, languages: Arc<LanguageRegistry>) -> Self {
        Self {
            tables,
            languages,
            detector: ScriptDetector::new(),
        }
    }

    /// Whether `language` has a table to transliterate into.
    pub fn supports(&self, language: &str) -> bool {
        self.languages
            .resolve(language)
            .is_some_and(|p| self.tables.get(p.script).is_some())
    }

    /// Transliterates a full roman string. Unknown languages, Latin targets
    /// and text that is already non-Latin are returned unchanged.
    pub fn transliterate(&self, text: &str, target_language: &str) -> String {
        match self.block_for(text, target_language) {
            Ok(Some(block)) => convert(text, block, false).unwrap_or_else(|_| text.to_string()),
            _ => text.to_string(),
        }
    }

    /// Like [`transliterate`](Self::transliterate), but fails on the first
    /// letter without a mapping and on unknown languages.
    pub fn transliterate_strict(&self, text: &str, target_language: &str) -> Result<String> {
        match self.block_for(text, target_language)? {
            Some(block) => convert(text, block, true),
            None => Ok(text.to_string()),
        }
    }

    fn block_for(&self, text: &str, target_language: &str) -> Result<Option<&ScriptBlock>> {
        let profile = self
            .languages
            .resolve(target_language)
            .ok_or_else(|| TranslationError::UnknownLanguage(target_language.to_string()))?;
        if !profile.needs_transliteration() {
            return Ok(None);
        }
        // Already native: nothing to do.
        if !self.detector.detect(text).script.is_latin() {
            return Ok(None);
        }
        Ok(self.tables.get(profile.script))
    }
}

impl Default for Transliterator {
    fn default() -> Self {
        Self::new(
            Arc::new(ScriptTables::builtin()),
            Arc::new(LanguageRegistry::new()),
        )
    }
}

fn fold(c: char) -> char {
    c.to_ascii_lowercase()
}

fn lookup<'b>(
    chars: &[char],
    pos: usize,
    max_len: usize,
    table: impl Fn(&str) -> Option<&'b str>,
) -> Option<(&'b str, usize)> {
    let available = chars.len() - pos;
    (1..=max_len.min(available)).rev().find_map(|len| {
        let window = &chars[pos..pos + len];
        if !window.iter().all(|c| c.is_alphabetic()) {
            return None;
        }
        let key: String = window.iter().map(|&c| fold(c)).collect();
        table(&key).map(|glyph| (glyph, len))
    })
}

fn convert(text: &str, block: &ScriptBlock, strict: bool) -> Result<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() * 3);
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];
        if !c.is_alphabetic() {
            out.push(c);
            pos += 1;
            continue;
        }

        if let Some((glyph, len)) = lookup(&chars, pos, MAX_CONSONANT_LEN, |k| block.consonant(k)) {
            out.push_str(glyph);
            pos += len;
            // No sign means the inherent vowel.
            if let Some((sign, len)) = lookup(&chars, pos, MAX_VOWEL_LEN, |k| block.vowel_sign(k)) {
                out.push_str(sign);
                pos += len;
            }
            continue;
        }

        if let Some((glyph, len)) = lookup(&chars, pos, MAX_VOWEL_LEN, |k| block.vowel(k)) {
            out.push_str(glyph);
            pos += len;
            continue;
        }

        if strict {
            return Err(TranslationError::TransliterationUnmappable { ch: c, position: pos });
        }
        out.push(c);
        pos += 1;
    }
    Ok(out)
}
