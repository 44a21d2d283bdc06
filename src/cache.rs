// File: src/cache.rs
//! Time- and capacity-bounded memo of translation results.
//!
//! Eviction is by insertion order, not by access: reads go through
//! `LruCache::peek*`, which never promotes an entry, so the "least recently
//! used" end of the LRU is always the oldest insertion. `hit_count` is
//! informational and never affects which entry is evicted.

use crate::core::types::{TaskKind, TranslationResult};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_TTL: Duration = Duration::from_secs(600);
pub const DEFAULT_CAPACITY: usize = 500;
/// Input characters that take part in the key.
pub const DEFAULT_KEY_PREFIX_CHARS: usize = 256;

/// Composite key: normalized languages plus a case-folded, length-bounded
/// prefix of the input. The full character count is kept so that long texts
/// sharing a prefix do not collide unless they are also the same length.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    kind: TaskKind,
    source: String,
    target: String,
    prefix: String,
    chars: usize,
}

impl CacheKey {
    pub fn new(kind: TaskKind, source: &str, target: &str, text: &str, prefix_chars: usize) -> Self {
        Self {
            kind,
            source: source.trim().to_lowercase(),
            target: target.trim().to_lowercase(),
            prefix: text.chars().take(prefix_chars).collect::<String>().to_lowercase(),
            chars: text.chars().count(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub result: TranslationResult,
    pub inserted_at: Instant,
    pub hit_count: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

struct CacheState {
    entries: LruCache<CacheKey, CacheEntry>,
    stats: CacheStats,
}

/// Shared by every caller; a single mutex guards the map.
pub struct ResultCache {
    state: Mutex<CacheState>,
    ttl: Duration,
    capacity: NonZeroUsize,
    key_prefix_chars: usize,
}

impl ResultCache {
    /// A zero capacity is bumped to one.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            state: Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                stats: CacheStats::default(),
            }),
            ttl,
            capacity,
            key_prefix_chars: DEFAULT_KEY_PREFIX_CHARS,
        }
    }

    pub fn with_key_prefix_chars(mut self, chars: usize) -> Self {
        self.key_prefix_chars = chars.max(1);
        self
    }

    pub fn key(&self, kind: TaskKind, source: &str, target: &str, text: &str) -> CacheKey {
        CacheKey::new(kind, source, target, text, self.key_prefix_chars)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Entries older than the TTL read as absent; they are dropped on a later write.
    pub fn get(&self, key: &CacheKey) -> Option<TranslationResult> {
        let mut state = self.lock();
        let ttl = self.ttl;
        let hit = match state.entries.peek_mut(key) {
            Some(entry) if entry.inserted_at.elapsed() <= ttl => {
                entry.hit_count += 1;
                Some(entry.result.clone())
            }
            _ => None,
        };
        if hit.is_some() {
            state.stats.hits += 1;
            debug!(source = %key.source, target = %key.target, "cache hit");
        } else {
            state.stats.misses += 1;
        }
        hit
    }

    /// Inserts unconditionally. At capacity, expired entries go first, then
    /// the single oldest insertion.
    pub fn set(&self, key: CacheKey, result: TranslationResult) {
        let mut state = self.lock();
        state.entries.pop(&key);

        if state.entries.len() >= self.capacity.get() {
            let ttl = self.ttl;
            let expired: Vec<CacheKey> = state
                .entries
                .iter()
                .filter(|(_, entry)| entry.inserted_at.elapsed() > ttl)
                .map(|(k, _)| k.clone())
                .collect();
            for k in &expired {
                state.entries.pop(k);
            }
            state.stats.evictions += expired.len() as u64;

            if state.entries.len() >= self.capacity.get() {
                if let Some((evicted, _)) = state.entries.pop_lru() {
                    state.stats.evictions += 1;
                    debug!(source = %evicted.source, target = %evicted.target, "cache evicted oldest entry");
                }
            }
        }

        state.entries.push(
            key,
            CacheEntry { result, inserted_at: Instant::now(), hit_count: 0 },
        );
    }

    /// Hit count of a live entry.
    pub fn hit_count(&self, key: &CacheKey) -> Option<u64> {
        self.lock().entries.peek(key).map(|e| e.hit_count)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn result(text: &str) -> TranslationResult {
        TranslationResult {
            text: text.to_uppercase(),
            is_translated: true,
            confidence: 1.0,
            ..TranslationResult::passthrough(text, "english", "hindi")
        }
    }

    fn key(cache: &ResultCache, text: &str) -> CacheKey {
        cache.key(TaskKind::Translate, "english", "hindi", text)
    }

    #[test]
    fn get_returns_what_was_set() {
        let cache = ResultCache::default();
        cache.set(key(&cache, "hello"), result("hello"));
        assert_eq!(cache.get(&key(&cache, "hello")), Some(result("hello")));
        assert_eq!(cache.get(&key(&cache, "other")), None);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1, evictions: 0 });
    }

    #[test]
    fn keys_are_case_folded_and_language_normalized() {
        let cache = ResultCache::default();
        cache.set(key(&cache, "Hello"), result("hello"));
        let k = cache.key(TaskKind::Translate, " English", "HINDI", "hELLO");
        assert!(cache.get(&k).is_some());
        let translit = cache.key(TaskKind::Transliterate, "english", "hindi", "hello");
        assert!(cache.get(&translit).is_none());
    }

    #[test]
    fn evicts_oldest_insertion_even_if_it_was_read() {
        let cache = ResultCache::new(2, DEFAULT_TTL);
        cache.set(key(&cache, "a"), result("a"));
        cache.set(key(&cache, "b"), result("b"));
        // Reading "a" does not protect it.
        for _ in 0..5 {
            assert!(cache.get(&key(&cache, "a")).is_some());
        }
        assert_eq!(cache.hit_count(&key(&cache, "a")), Some(5));
        cache.set(key(&cache, "c"), result("c"));

        assert!(cache.get(&key(&cache, "a")).is_none());
        assert!(cache.get(&key(&cache, "b")).is_some());
        assert!(cache.get(&key(&cache, "c")).is_some());
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn expired_entries_read_as_absent_and_go_first() {
        let cache = ResultCache::new(2, Duration::from_millis(20));
        cache.set(key(&cache, "old"), result("old"));
        sleep(Duration::from_millis(40));
        assert!(cache.get(&key(&cache, "old")).is_none());
        // Still stored until a write needs the room.
        assert_eq!(cache.len(), 1);

        cache.set(key(&cache, "new"), result("new"));
        cache.set(key(&cache, "newer"), result("newer"));
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&key(&cache, "new")).is_some());
    }

    #[test]
    fn long_texts_are_keyed_by_prefix() {
        let cache = ResultCache::default().with_key_prefix_chars(4);
        cache.set(key(&cache, "abcdXXXX"), result("first"));
        assert!(cache.get(&key(&cache, "abcdYYYY")).is_some());
        assert!(cache.get(&key(&cache, "abcdYYY")).is_none());
    }
}
