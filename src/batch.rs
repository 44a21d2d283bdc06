// File: src/batch.rs
//! Translation of a page of chat history.
//!
//! Messages written by the requesting user are never translated for them.
//! Everything else goes through the queue at normal priority, so a batch is
//! bounded by the same concurrency limit as interactive work.

use crate::core::types::{Priority, TaskKind, TranslationResult};
use crate::queue::TranslationQueue;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub sender_id: String,
    pub text: String,
}

/// Translates `messages`, keyed by message id. Queue failures are absorbed
/// into pass-through results carrying the error. Languages are expected in
/// canonical form.
pub async fn translate_messages(
    queue: &TranslationQueue,
    messages: &[ChatMessage],
    current_user_id: &str,
    source_language: &str,
    target_language: &str,
) -> HashMap<String, TranslationResult> {
    let mut results = HashMap::with_capacity(messages.len());
    let mut pending = Vec::new();

    for message in messages {
        if message.sender_id == current_user_id {
            results.insert(
                message.id.clone(),
                TranslationResult::passthrough(&message.text, source_language, target_language),
            );
            continue;
        }
        let handle = queue.enqueue(
            TaskKind::Translate,
            message.text.as_str(),
            source_language,
            target_language,
            Priority::Normal,
        );
        pending.push((message, handle));
    }

    debug!(own = results.len(), queued = pending.len(), "batch translation started");

    let (queued, handles): (Vec<_>, Vec<_>) = pending.into_iter().unzip();
    for (message, outcome) in queued.into_iter().zip(join_all(handles).await) {
        let result = outcome.unwrap_or_else(|e| {
            TranslationResult::passthrough(&message.text, source_language, target_language).with_error(e)
        });
        results.insert(message.id.clone(), result);
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, TranslationError};
    use crate::queue::{TranslationBackend, TranslationTask};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Shouting {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TranslationBackend for Shouting {
        async fn run(&self, task: &TranslationTask) -> Result<TranslationResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if task.text == "fail" {
                return Err(TranslationError::InvalidArgument("fail".into()));
            }
            Ok(TranslationResult {
                text: task.text.to_uppercase(),
                is_translated: true,
                confidence: 1.0,
                ..TranslationResult::passthrough(&task.text, &task.source_language, &task.target_language)
            })
        }
    }

    fn message(id: &str, sender: &str, text: &str) -> ChatMessage {
        ChatMessage { id: id.into(), sender_id: sender.into(), text: text.into() }
    }

    #[tokio::test]
    async fn own_messages_pass_through() {
        let backend = Arc::new(Shouting::default());
        let queue = TranslationQueue::new(backend.clone(), 3);
        let messages = [
            message("1", "me", "mine"),
            message("2", "bob", "theirs"),
            message("3", "me", "also mine"),
            message("4", "eve", "fail"),
        ];

        let results = translate_messages(&queue, &messages, "me", "english", "hindi").await;

        assert_eq!(results.len(), 4);
        assert_eq!(results["1"].text, "mine");
        assert!(!results["1"].is_translated);
        assert_eq!(results["2"].text, "THEIRS");
        assert!(results["2"].is_translated);
        assert!(!results["4"].is_translated);
        assert_eq!(results["4"].text, "fail");
        assert!(results["4"].error.is_some());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    }

    #[derive(Default)]
    struct Counting {
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl TranslationBackend for Counting {
        async fn run(&self, task: &TranslationTask) -> Result<TranslationResult> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(TranslationResult {
                is_translated: true,
                ..TranslationResult::passthrough(&task.text, &task.source_language, &task.target_language)
            })
        }
    }

    #[tokio::test]
    async fn large_batch_stays_within_the_queue_limit() {
        let backend = Arc::new(Counting::default());
        let queue = TranslationQueue::new(backend.clone(), 3);
        let messages: Vec<_> = (0..20)
            .map(|i| message(&i.to_string(), if i % 5 == 0 { "me" } else { "bob" }, &format!("line {i}")))
            .collect();

        let results = translate_messages(&queue, &messages, "me", "english", "hindi").await;

        assert_eq!(results.len(), 20);
        assert_eq!(results.values().filter(|r| r.is_translated).count(), 16);
        let peak = backend.peak.load(Ordering::SeqCst);
        assert!(peak <= queue.max_concurrent());
        assert_eq!(peak, 3);
        assert_eq!(queue.stats().running, 0);
    }

    #[tokio::test]
    async fn empty_batch_is_empty() {
        let queue = TranslationQueue::new(Arc::new(Shouting::default()), 1);
        assert!(translate_messages(&queue, &[], "me", "english", "hindi").await.is_empty());
    }
}
