//! End-to-end tests through the public engine API.

use std::fs;
use std::time::{Duration, Instant};

use bridge_core::core::dictionary::PhrasePack;
use bridge_core::persistence::save_snapshot;
use bridge_core::core::dictionary::PhraseDictionaries;
use bridge_core::core::languages::LanguageRegistry;
use bridge_core::{ChatMessage, EngineConfig, Priority, TranslationEngine, TranslationError};
use futures::future::join_all;
use tempfile::TempDir;

// =============================================================================
// Synchronous API
// =============================================================================

#[test]
fn namaste_in_devanagari() {
    let engine = TranslationEngine::new();
    assert_eq!(engine.transliterate("namaste", "hindi"), "नमसते");
}

#[test]
fn thank_you_in_hindi_is_an_exact_hit() {
    let engine = TranslationEngine::new();
    let r = engine.translate("thank you", "english", "hindi");
    assert_eq!(r.text, "धन्यवाद");
    assert!(r.is_translated);
    assert_eq!(r.confidence, 1.0);
}

#[test]
fn unknown_word_into_telugu_never_fails() {
    let engine = TranslationEngine::new();
    let r = engine.translate("xyzzy123", "english", "telugu");
    assert_eq!(r.is_translated, r.text != "xyzzy123");
    assert!(r.error.is_none());
}

#[test]
fn native_text_is_left_alone() {
    let engine = TranslationEngine::new();
    for (word, lang) in [("namaste", "hindi"), ("vanakkam", "tamil"), ("privet", "russian")] {
        let native = engine.transliterate(word, lang);
        assert_ne!(native, word);
        assert_eq!(engine.transliterate(&native, lang), native);
    }
}

#[test]
fn same_language_passes_through() {
    let engine = TranslationEngine::new();
    for (text, lang) in [("thank you", "english"), ("धन्यवाद", "hindi"), ("", "tamil"), ("¿qué?", "es")] {
        let r = engine.translate(text, lang, lang);
        assert_eq!(r.text, text);
        assert!(!r.is_translated);
    }
}

// =============================================================================
// Queue and batch
// =============================================================================

#[tokio::test]
async fn hundred_enqueues_return_immediately() {
    let engine = TranslationEngine::new();
    let started = Instant::now();
    let handles: Vec<_> = (0..100)
        .map(|i| {
            engine
                .enqueue_translation(&format!("thank you {i}"), "english", "hindi", Priority::Normal)
                .unwrap()
        })
        .collect();
    assert!(started.elapsed() < Duration::from_millis(250));

    let results = join_all(handles).await;
    assert_eq!(results.len(), 100);
    assert!(results.iter().all(|r| r.as_ref().is_ok_and(|r| r.text.starts_with("धन्यवाद"))));
    let stats = engine.queue().stats();
    assert_eq!((stats.completed, stats.failed, stats.running), (100, 0, 0));
}

#[tokio::test]
async fn bad_arguments_are_rejected_up_front() {
    let engine = TranslationEngine::new();
    assert!(matches!(
        engine.enqueue_translation("hi", "", "hindi", Priority::High),
        Err(TranslationError::InvalidArgument(_))
    ));
    assert!(matches!(
        engine.enqueue_transliteration("hi", "elvish", Priority::Low),
        Err(TranslationError::UnknownLanguage(_))
    ));
}

#[tokio::test]
async fn batch_translates_other_peoples_messages() {
    let engine = TranslationEngine::new();
    let messages: Vec<ChatMessage> = [("m1", "asha", "नमस्ते"), ("m2", "ravi", "धन्यवाद"), ("m3", "ravi", "कुछ नया")]
        .into_iter()
        .map(|(id, sender, text)| ChatMessage { id: id.into(), sender_id: sender.into(), text: text.into() })
        .collect();

    let results = engine.batch_translate(&messages, "asha", "hindi", "english").await.unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results["m1"].text, "नमस्ते");
    assert!(!results["m1"].is_translated);
    assert_eq!(results["m2"].text, "thank you");
    assert!(results["m2"].is_translated);
}

// =============================================================================
// Live preview
// =============================================================================

#[tokio::test(start_paused = true)]
async fn engine_preview_settles_on_the_last_input() {
    let engine = TranslationEngine::new();
    let live = engine.live_preview();
    for prefix in ["g", "gh", "gha", "ghar"] {
        live.update(prefix, "hindi");
    }
    assert!(live.get_preview().is_loading);
    tokio::time::sleep(engine.config().debounce() * 2).await;

    let preview = live.get_preview();
    assert!(!preview.is_loading);
    assert_eq!(preview.text, "घर");
}

// =============================================================================
// Configuration and snapshots
// =============================================================================

#[test]
fn engine_from_config_file_uses_the_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot = temp_dir.path().join("dict.bin");
    let languages = LanguageRegistry::new();

    let pack = PhrasePack {
        language: "nepali".into(),
        entries: vec![("good morning".into(), "शुभ प्रभात".into())],
    };
    save_snapshot(&PhraseDictionaries::from_packs(&[pack], &languages).unwrap(), &snapshot).unwrap();

    let config_path = temp_dir.path().join("engine.toml");
    fs::write(
        &config_path,
        format!("max_concurrent = 3\ndictionary_snapshot = {:?}\n", snapshot.to_str().unwrap()),
    )
    .unwrap();

    let config = EngineConfig::load(&config_path).unwrap();
    assert_eq!(config.max_concurrent, 3);
    let engine = TranslationEngine::from_config(config).unwrap();

    let r = engine.translate("good morning", "english", "ne");
    assert_eq!(r.text, "शुभ प्रभात");
    assert_eq!(r.target_language, "nepali");
    // Only the snapshot's dictionaries are loaded.
    assert!(engine.dictionaries().get("hindi").is_none());
}

#[test]
fn missing_snapshot_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let config = EngineConfig {
        dictionary_snapshot: Some(temp_dir.path().join("nope.bin")),
        ..EngineConfig::default()
    };
    assert!(matches!(TranslationEngine::from_config(config), Err(TranslationError::Io(_))));
}
