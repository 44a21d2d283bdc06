// src/core/pivot.rs
use crate::core::converter::Transliterator;
use crate::core::detector::ScriptDetector;
use crate::core::dictionary::{Leg, LegOutcome, PhraseDictionaries};
use crate::core::languages::{LanguageRegistry, ENGLISH};
use crate::core::tables::ScriptTables;
use crate::core::types::TranslationResult;
use std::sync::Arc;

/// Confidence of a translation where every leg was a full-phrase hit.
pub const EXACT_CONFIDENCE: f32 = 1.0;
/// Confidence whenever a sub-phrase, word or transliteration fallback was used.
pub const FALLBACK_CONFIDENCE: f32 = 0.85;

/// Source -> English -> Target translation over the phrase dictionaries.
///
/// Pure and reentrant: the same input always yields the same result, and
/// nothing here raises. Missing dictionaries degrade to pass-through.
#[derive(Debug, Clone)]
pub struct PivotTranslator {
    languages: Arc<LanguageRegistry>,
    dictionaries: Arc<PhraseDictionaries>,
    transliterator: Transliterator,
    detector: ScriptDetector,
    fallback_confidence: f32,
}

impl PivotTranslator {
    pub fn new(
        languages: Arc<LanguageRegistry>,
        dictionaries: Arc<PhraseDictionaries>,
        transliterator: Transliterator,
    ) -> Self {
        Self {
            languages,
            dictionaries,
            transliterator,
            detector: ScriptDetector::new(),
            fallback_confidence: FALLBACK_CONFIDENCE,
        }
    }

    pub fn with_fallback_confidence(mut self, confidence: f32) -> Self {
        self.fallback_confidence = confidence;
        self
    }

    pub fn dictionaries(&self) -> &PhraseDictionaries {
        &self.dictionaries
    }

    pub fn transliterator(&self) -> &Transliterator {
        &self.transliterator
    }

    pub fn translate(&self, text: &str, source_language: &str, target_language: &str) -> TranslationResult {
        let source = self.languages.canonical_name(source_language);
        let target = self.languages.canonical_name(target_language);

        if source == target || text.trim().is_empty() {
            return TranslationResult::passthrough(text, &source, &target);
        }

        let to_english = (source != ENGLISH)
            .then(|| self.dictionaries.translate_leg(&source, text, Leg::ToEnglish));
        let pivot_text = to_english.as_ref().map_or(text, |leg| leg.text.as_str());
        let from_english = (target != ENGLISH)
            .then(|| self.dictionaries.translate_leg(&target, pivot_text, Leg::FromEnglish));

        let missed = |leg: &Option<LegOutcome>| leg.as_ref().is_some_and(|l| l.substitutions == 0);
        let exact = |leg: &Option<LegOutcome>| leg.as_ref().map_or(true, |l| l.exact);

        let mut output = from_english
            .as_ref()
            .map_or(pivot_text, |leg| leg.text.as_str())
            .to_string();
        let mut transliterated = false;

        if missed(&to_english) || missed(&from_english) {
            let target_is_native = self
                .languages
                .resolve(&target)
                .is_some_and(|p| p.needs_transliteration());
            if target_is_native && self.detector.detect(text).script.is_latin() {
                let native = self.transliterator.transliterate(&output, &target);
                transliterated = native != output;
                output = native;
            }
        }

        if output == text {
            return TranslationResult::passthrough(text, &source, &target);
        }

        let confidence = if exact(&to_english) && exact(&from_english) && !transliterated {
            EXACT_CONFIDENCE
        } else {
            self.fallback_confidence
        };

        TranslationResult {
            text: output,
            original_text: text.to_string(),
            source_language: source,
            target_language: target,
            is_translated: true,
            confidence,
            error: None,
        }
    }
}

impl Default for PivotTranslator {
    fn default() -> Self {
        let languages = Arc::new(LanguageRegistry::new());
        let transliterator = Transliterator::new(Arc::new(ScriptTables::builtin()), Arc::clone(&languages));
        Self::new(languages, Arc::new(PhraseDictionaries::builtin()), transliterator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_phrase_into_hindi() {
        let r = PivotTranslator::default().translate("thank you", "english", "hindi");
        assert_eq!(r.text, "धन्यवाद");
        assert!(r.is_translated);
        assert_eq!(r.confidence, EXACT_CONFIDENCE);
        assert_eq!(r.original_text, "thank you");
        assert_eq!(r.target_language, "hindi");
    }

    #[test]
    fn same_language_is_a_passthrough() {
        let pivot = PivotTranslator::default();
        for (text, a, b) in [("thank you", "hindi", "hi"), ("hola", "es", "spanish"), ("", "en", "en")] {
            let r = pivot.translate(text, a, b);
            assert_eq!(r.text, text);
            assert!(!r.is_translated);
        }
    }

    #[test]
    fn pivots_through_english() {
        let r = PivotTranslator::default().translate("धन्यवाद", "hindi", "telugu");
        assert_eq!(r.text, "ధన్యవాదాలు");
        assert_eq!(r.confidence, EXACT_CONFIDENCE);

        let r = PivotTranslator::default().translate("hola amigo", "spanish", "tamil");
        assert_eq!(r.text, "வணக்கம் நண்பன்");
        assert_eq!(r.confidence, FALLBACK_CONFIDENCE);
    }

    #[test]
    fn out_of_dictionary_falls_back_to_transliteration() {
        let r = PivotTranslator::default().translate("xyzzy123", "english", "telugu");
        assert!(r.is_translated);
        assert_ne!(r.text, "xyzzy123");
        assert!(r.text.ends_with("123"));
        assert_eq!(r.confidence, FALLBACK_CONFIDENCE);
    }

    #[test]
    fn sinhala_and_armenian_targets_get_native_script() {
        let pivot = PivotTranslator::default();
        let r = pivot.translate("xyz", "english", "sinhala");
        assert!(r.is_translated);
        assert_eq!(r.text, "ක්සයජ");
        assert_eq!(r.confidence, FALLBACK_CONFIDENCE);

        let r = pivot.translate("barev", "english", "hy");
        assert_eq!(r.text, "բարեվ");
        assert_eq!(r.target_language, "armenian");
    }

    #[test]
    fn latin_target_without_entries_passes_through() {
        let r = PivotTranslator::default().translate("xyzzy", "english", "german");
        assert_eq!(r.text, "xyzzy");
        assert!(!r.is_translated);
        assert_eq!(r.confidence, 0.0);
    }

    #[test]
    fn into_english_only_runs_one_leg() {
        let r = PivotTranslator::default().translate("gracias", "es", "en");
        assert_eq!(r.text, "thank you");
        assert_eq!(r.confidence, EXACT_CONFIDENCE);
        assert_eq!(r.source_language, "spanish");
    }
}
