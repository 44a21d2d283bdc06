// src/core/engine.rs
use crate::batch::{translate_messages, ChatMessage};
use crate::cache::ResultCache;
use crate::config::EngineConfig;
use crate::core::converter::Transliterator;
use crate::core::detector::ScriptDetector;
use crate::core::dictionary::PhraseDictionaries;
use crate::core::languages::{LanguageRegistry, ENGLISH};
use crate::core::pivot::{PivotTranslator, EXACT_CONFIDENCE};
use crate::core::tables::ScriptTables;
use crate::core::types::{Detection, LanguageProfile, Priority, TaskKind, TranslationResult};
use crate::error::{Result, TranslationError};
use crate::persistence::load_snapshot;
use crate::preview::LivePreview;
use crate::queue::{TaskHandle, TranslationBackend, TranslationQueue, TranslationTask};
use crate::remote::{HttpRemoteTranslator, RemoteRequest, RemoteTranslator};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// The stateless part shared with queue workers.
struct EngineCore {
    languages: Arc<LanguageRegistry>,
    pivot: PivotTranslator,
    cache: Arc<ResultCache>,
}

impl EngineCore {
    fn translate(&self, text: &str, source: &str, target: &str) -> TranslationResult {
        self.pivot.translate(text, source, target)
    }

    fn transliterate(&self, text: &str, target: &str) -> TranslationResult {
        let rendered = self.pivot.transliterator().transliterate(text, target);
        if rendered == text {
            return TranslationResult::passthrough(text, ENGLISH, target);
        }
        TranslationResult {
            text: rendered,
            is_translated: true,
            confidence: EXACT_CONFIDENCE,
            ..TranslationResult::passthrough(text, ENGLISH, target)
        }
    }
}

#[async_trait]
impl TranslationBackend for EngineCore {
    async fn run(&self, task: &TranslationTask) -> Result<TranslationResult> {
        Ok(match task.kind {
            TaskKind::Translate => self.translate(&task.text, &task.source_language, &task.target_language),
            TaskKind::Transliterate => self.transliterate(&task.text, &task.target_language),
        })
    }
}

/// Entry point for every caller: synchronous transforms, queued work,
/// batches, previews and the network fallback.
///
/// Cloning is cheap; clones share the cache and the queue.
#[derive(Clone)]
pub struct TranslationEngine {
    core: Arc<EngineCore>,
    queue: TranslationQueue,
    remote: Option<Arc<dyn RemoteTranslator>>,
    detector: ScriptDetector,
    config: EngineConfig,
}

impl TranslationEngine {
    /// Built-in tables and dictionaries with default settings.
    pub fn new() -> Self {
        Self::assemble(EngineConfig::default(), PhraseDictionaries::builtin(), None)
    }

    /// Same as [`new`](Self::new) but with the given dictionaries.
    pub fn with_dictionaries(dictionaries: PhraseDictionaries) -> Self {
        Self::assemble(EngineConfig::default(), dictionaries, None)
    }

    /// Loads the dictionary snapshot and remote endpoint named by `config`.
    pub fn from_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let dictionaries = match &config.dictionary_snapshot {
            Some(path) => load_snapshot(path, &LanguageRegistry::new())?,
            None => PhraseDictionaries::builtin(),
        };
        let remote = match &config.remote {
            Some(remote) => {
                let http = HttpRemoteTranslator::new(remote.endpoint.as_str(), remote.timeout())?;
                info!(endpoint = http.endpoint(), "remote fallback enabled");
                Some(Arc::new(http) as Arc<dyn RemoteTranslator>)
            }
            None => None,
        };
        Ok(Self::assemble(config, dictionaries, remote))
    }

    fn assemble(
        config: EngineConfig,
        dictionaries: PhraseDictionaries,
        remote: Option<Arc<dyn RemoteTranslator>>,
    ) -> Self {
        let languages = Arc::new(LanguageRegistry::new());
        let transliterator = Transliterator::new(Arc::new(ScriptTables::builtin()), Arc::clone(&languages));
        let pivot = PivotTranslator::new(Arc::clone(&languages), Arc::new(dictionaries), transliterator)
            .with_fallback_confidence(config.fallback_confidence);
        let cache = Arc::new(
            ResultCache::new(config.cache_capacity, config.cache_ttl())
                .with_key_prefix_chars(config.cache_key_prefix_chars),
        );
        let core = Arc::new(EngineCore { languages, pivot, cache: Arc::clone(&cache) });
        let queue = TranslationQueue::with_cache(core.clone(), config.max_concurrent, cache);
        debug!(max_concurrent = queue.max_concurrent(), remote = remote.is_some(), "engine assembled");
        Self { core, queue, remote, detector: ScriptDetector::new(), config }
    }

    /// Replaces the network fallback.
    pub fn with_remote(mut self, remote: Arc<dyn RemoteTranslator>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &ResultCache {
        &self.core.cache
    }

    pub fn queue(&self) -> &TranslationQueue {
        &self.queue
    }

    pub fn dictionaries(&self) -> &PhraseDictionaries {
        self.core.pivot.dictionaries()
    }

    pub fn languages(&self) -> &LanguageRegistry {
        &self.core.languages
    }

    pub fn supported_languages(&self) -> impl Iterator<Item = &'static LanguageProfile> + '_ {
        self.core.languages.supported()
    }

    pub fn detect(&self, text: &str) -> Detection {
        self.detector.detect(text)
    }

    /// Roman text into the native script of `target_language`. Unsupported
    /// targets and text that is already native come back unchanged.
    pub fn transliterate(&self, text: &str, target_language: &str) -> String {
        self.core.pivot.transliterator().transliterate(text, target_language)
    }

    /// Dictionary translation with the result cache in front. Never fails;
    /// unknown languages come back as a pass-through with `error` set.
    pub fn translate(&self, text: &str, source_language: &str, target_language: &str) -> TranslationResult {
        let languages = &self.core.languages;
        let source = languages.canonical_name(source_language);
        let target = languages.canonical_name(target_language);

        if let Some(unknown) = [source_language, target_language]
            .into_iter()
            .find(|name| languages.resolve(name).is_none())
        {
            return TranslationResult::passthrough(text, &source, &target)
                .with_error(TranslationError::UnknownLanguage(unknown.to_string()));
        }
        if source == target || text.trim().is_empty() {
            return TranslationResult::passthrough(text, &source, &target);
        }

        let key = self.core.cache.key(TaskKind::Translate, &source, &target, text);
        if let Some(hit) = self.core.cache.get(&key) {
            return hit;
        }
        let result = self.core.translate(text, &source, &target);
        if result.is_translated {
            self.core.cache.set(key, result.clone());
        }
        result
    }

    /// Like [`translate`](Self::translate), but rejects empty or unknown
    /// language identifiers.
    pub fn try_translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<TranslationResult> {
        self.resolve(source_language)?;
        self.resolve(target_language)?;
        Ok(self.translate(text, source_language, target_language))
    }

    /// Queues a translation and returns its outcome future without waiting.
    /// Must be called from within a Tokio runtime.
    pub fn enqueue_translation(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
        priority: Priority,
    ) -> Result<TaskHandle> {
        let source = self.resolve(source_language)?.name;
        let target = self.resolve(target_language)?.name;
        Ok(self.queue.enqueue(TaskKind::Translate, text, source, target, priority))
    }

    /// Queues a transliteration; this is what the live preview uses.
    pub fn enqueue_transliteration(
        &self,
        text: &str,
        target_language: &str,
        priority: Priority,
    ) -> Result<TaskHandle> {
        let target = self.resolve(target_language)?.name;
        Ok(self.queue.enqueue(TaskKind::Transliterate, text, ENGLISH, target, priority))
    }

    /// Translates a page of chat history, keyed by message id.
    #[instrument(skip(self, messages), fields(count = messages.len()))]
    pub async fn batch_translate(
        &self,
        messages: &[ChatMessage],
        current_user_id: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<HashMap<String, TranslationResult>> {
        let source = self.resolve(source_language)?.name;
        let target = self.resolve(target_language)?.name;
        Ok(translate_messages(&self.queue, messages, current_user_id, source, target).await)
    }

    /// Local translation first; the remote service is asked only when the
    /// local result is untranslated or not an exact dictionary hit. A remote
    /// answer that declines to translate keeps the local result. A remote
    /// failure returns the original text untranslated, with `error` set.
    #[instrument(skip(self, text))]
    pub async fn translate_with_fallback(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> TranslationResult {
        let local = self.translate(text, source_language, target_language);
        let Some(remote) = &self.remote else {
            return local;
        };
        if local.error.is_some()
            || local.source_language == local.target_language
            || text.trim().is_empty()
            || (local.is_translated && local.confidence >= EXACT_CONFIDENCE)
        {
            return local;
        }

        let request = RemoteRequest {
            text: text.to_string(),
            source_language: local.source_language.clone(),
            target_language: local.target_language.clone(),
        };
        match remote.translate(&request).await {
            Ok(response) if response.is_translated && !response.translated_text.trim().is_empty() => {
                debug!("remote translation used");
                TranslationResult {
                    text: response.translated_text,
                    is_translated: true,
                    confidence: self.config.fallback_confidence,
                    ..local
                }
            }
            Ok(_) => local,
            Err(e) => {
                warn!(error = %e, "remote fallback failed, returning original text");
                TranslationResult::passthrough(text, &local.source_language, &local.target_language)
                    .with_error(e)
            }
        }
    }

    /// A debounced preview bound to this engine's queue.
    pub fn live_preview(&self) -> LivePreview {
        LivePreview::new(self.queue.clone(), self.core.pivot.transliterator().clone())
            .with_delay(self.config.debounce())
    }

    fn resolve(&self, language: &str) -> Result<&'static LanguageProfile> {
        if language.trim().is_empty() {
            return Err(TranslationError::InvalidArgument("language identifier is empty".into()));
        }
        self.core
            .languages
            .resolve(language)
            .ok_or_else(|| TranslationError::UnknownLanguage(language.to_string()))
    }
}

impl Default for TranslationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::RemoteResponse;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn second_translation_comes_from_the_cache() {
        let engine = TranslationEngine::new();
        let first = engine.translate("thank you", "english", "hindi");
        let lookups = engine.dictionaries().lookup_count();
        let second = engine.translate("thank you", "en", "Hindi");

        assert_eq!(first, second);
        assert_eq!(engine.dictionaries().lookup_count(), lookups);
        assert_eq!(engine.cache().stats().hits, 1);
    }

    #[test]
    fn passthroughs_are_not_cached() {
        let engine = TranslationEngine::new();
        engine.translate("xyzzy", "english", "german");
        engine.translate("same", "hindi", "hindi");
        assert!(engine.cache().is_empty());
    }

    #[test]
    fn unknown_languages_degrade_or_fail() {
        let engine = TranslationEngine::new();
        let r = engine.translate("hello", "english", "klingon");
        assert_eq!(r.text, "hello");
        assert!(!r.is_translated);
        assert!(r.error.is_some());

        assert!(matches!(
            engine.try_translate("hello", "", "hindi"),
            Err(TranslationError::InvalidArgument(_))
        ));
        assert!(matches!(
            engine.try_translate("hello", "english", "klingon"),
            Err(TranslationError::UnknownLanguage(_))
        ));
    }

    #[test]
    fn transliterates_synchronously() {
        let engine = TranslationEngine::new();
        assert_eq!(engine.transliterate("namaste", "hindi"), "नमसते");
        assert_eq!(engine.transliterate("नमसते", "hindi"), "नमसते");
    }

    #[tokio::test]
    async fn queued_translation_matches_the_sync_one() {
        let engine = TranslationEngine::new();
        let handle = engine.enqueue_translation("thank you", "en", "hi", Priority::High).unwrap();
        let queued = handle.await.unwrap();
        assert_eq!(queued, engine.translate("thank you", "english", "hindi"));

        let translit = engine.enqueue_transliteration("ghar", "hindi", Priority::Low).unwrap().await.unwrap();
        assert_eq!(translit.text, "घर");
        assert!(translit.is_translated);
        assert!(engine.enqueue_translation("x", "english", " ", Priority::Low).is_err());
    }

    struct FixedRemote {
        calls: AtomicUsize,
        answer: Option<&'static str>,
    }

    #[async_trait]
    impl RemoteTranslator for FixedRemote {
        async fn translate(&self, request: &RemoteRequest) -> Result<RemoteResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.answer {
                Some(text) => Ok(RemoteResponse {
                    translated_text: text.to_string(),
                    is_translated: true,
                    source_language: request.source_language.clone(),
                    target_language: request.target_language.clone(),
                }),
                None => Err(TranslationError::ExternalServiceUnavailable("offline".into())),
            }
        }
    }

    #[tokio::test]
    async fn remote_is_used_only_for_weak_local_results() {
        let remote = Arc::new(FixedRemote { calls: AtomicUsize::new(0), answer: Some("Hallo") });
        let engine = TranslationEngine::new().with_remote(remote.clone());

        let exact = engine.translate_with_fallback("thank you", "english", "hindi").await;
        assert_eq!(exact.text, "धन्यवाद");
        assert_eq!(remote.calls.load(Ordering::SeqCst), 0);

        let remote_hit = engine.translate_with_fallback("hello there", "english", "german").await;
        assert_eq!(remote_hit.text, "Hallo");
        assert!(remote_hit.is_translated);
        assert_eq!(remote_hit.original_text, "hello there");
        assert_eq!(remote.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn remote_failure_keeps_the_original_text() {
        let remote = Arc::new(FixedRemote { calls: AtomicUsize::new(0), answer: None });
        let engine = TranslationEngine::new().with_remote(remote);

        let r = engine.translate_with_fallback("hello there", "english", "german").await;
        assert_eq!(r.text, "hello there");
        assert!(!r.is_translated);
        assert!(r.error.as_deref().is_some_and(|e| e.contains("offline")));

        // A local transliteration is not kept when the remote fails.
        assert!(engine.translate("ghar", "english", "hindi").is_translated);
        let r = engine.translate_with_fallback("ghar", "english", "hindi").await;
        assert_eq!(r.text, "ghar");
        assert_eq!(r.original_text, "ghar");
        assert!(!r.is_translated);
        assert_eq!(r.confidence, 0.0);
        assert_eq!(r.target_language, "hindi");
        assert!(r.error.is_some());
    }

    #[tokio::test]
    async fn batch_skips_own_messages() {
        let engine = TranslationEngine::new();
        let messages = vec![
            ChatMessage { id: "a".into(), sender_id: "me".into(), text: "thank you".into() },
            ChatMessage { id: "b".into(), sender_id: "you".into(), text: "thank you".into() },
        ];
        let results = engine.batch_translate(&messages, "me", "english", "hindi").await.unwrap();
        assert_eq!(results["a"].text, "thank you");
        assert_eq!(results["b"].text, "धन्यवाद");
    }
}
