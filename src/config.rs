// File: src/config.rs
//! Engine configuration, read from TOML.
//!
//! ```toml
//! cache_ttl_secs = 600
//! cache_capacity = 500
//! max_concurrent = 5
//! debounce_ms = 300
//! fallback_confidence = 0.85
//! dictionary_snapshot = "dict.bin"
//!
//! [remote]
//! endpoint = "https://translate.example.net/v1/translate"
//! timeout_ms = 5000
//! ```

use crate::cache::{DEFAULT_CAPACITY, DEFAULT_KEY_PREFIX_CHARS, DEFAULT_TTL};
use crate::core::pivot::FALLBACK_CONFIDENCE;
use crate::error::{Result, TranslationError};
use crate::preview::DEFAULT_DEBOUNCE;
use crate::queue::DEFAULT_MAX_CONCURRENT;
use crate::remote::DEFAULT_TIMEOUT;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub cache_ttl_secs: u64,
    pub cache_capacity: usize,
    pub cache_key_prefix_chars: usize,
    pub max_concurrent: usize,
    pub debounce_ms: u64,
    pub fallback_confidence: f32,
    pub remote: Option<RemoteConfig>,
    pub dictionary_snapshot: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteConfig {
    pub endpoint: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT.as_millis() as u64
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: DEFAULT_TTL.as_secs(),
            cache_capacity: DEFAULT_CAPACITY,
            cache_key_prefix_chars: DEFAULT_KEY_PREFIX_CHARS,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            fallback_confidence: FALLBACK_CONFIDENCE,
            remote: None,
            dictionary_snapshot: None,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| TranslationError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
            .map_err(|e| TranslationError::Config(format!("{}: {e}", path.display())))
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(TranslationError::Config("cache_capacity must be at least 1".into()));
        }
        if self.cache_key_prefix_chars == 0 {
            return Err(TranslationError::Config("cache_key_prefix_chars must be at least 1".into()));
        }
        if self.max_concurrent == 0 {
            return Err(TranslationError::Config("max_concurrent must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.fallback_confidence) {
            return Err(TranslationError::Config(format!(
                "fallback_confidence {} is outside 0..=1",
                self.fallback_confidence
            )));
        }
        if let Some(remote) = &self.remote {
            if remote.endpoint.trim().is_empty() {
                return Err(TranslationError::Config("remote.endpoint is empty".into()));
            }
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.max_concurrent, 5);
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.cache_ttl(), Duration::from_secs(600));
    }

    #[test]
    fn reads_every_field() {
        let config = EngineConfig::from_toml_str(
            r#"
            cache_ttl_secs = 60
            cache_capacity = 10
            max_concurrent = 2
            debounce_ms = 150
            fallback_confidence = 0.7
            dictionary_snapshot = "/tmp/dict.bin"

            [remote]
            endpoint = "http://localhost:8080/translate"
            "#,
        )
        .unwrap();
        assert_eq!(config.cache_capacity, 10);
        assert_eq!(config.max_concurrent, 2);
        assert_eq!(config.dictionary_snapshot.as_deref(), Some(Path::new("/tmp/dict.bin")));
        let remote = config.remote.unwrap();
        assert_eq!(remote.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn rejects_bad_values() {
        for source in [
            "max_concurrent = 0",
            "cache_capacity = 0",
            "fallback_confidence = 1.5",
            "typo_field = 1",
            "[remote]\nendpoint = \" \"",
        ] {
            assert!(
                matches!(EngineConfig::from_toml_str(source), Err(TranslationError::Config(_))),
                "accepted {source:?}"
            );
        }
    }
}
