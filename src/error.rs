//! Error types for the translation engine.
//!
//! Only argument errors are meant to reach callers of the lenient APIs. The rest
//! are absorbed below the queue boundary and show up as degraded results.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslationError {
    /// No script pattern matched; the text is treated as Latin.
    #[error("script detection ambiguous")]
    DetectionAmbiguous,

    /// No dictionary entry; triggers the next fallback.
    #[error("no {language} dictionary entry for '{phrase}'")]
    DictionaryMiss { language: String, phrase: String },

    #[error("no mapping for '{ch}' at position {position}")]
    TransliterationUnmappable { ch: char, position: usize },

    #[error("translation task failed: {0}")]
    QueueTaskFailed(String),

    #[error("external translation service unavailable: {0}")]
    ExternalServiceUnavailable(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TranslationError>;
