// File: src/preview.rs
//! Debounced native-script preview for the input box.
//!
//! Every `update` cancels the pending evaluation and schedules a new one after
//! the debounce delay. Only the most recent `update` may write the observable
//! preview. A generation counter checked under the slot lock backs that up in
//! case a cancelled evaluation is already past its last await point.

use crate::core::converter::Transliterator;
use crate::core::detector::ScriptDetector;
use crate::core::languages::ENGLISH;
use crate::core::types::{Priority, TaskKind};
use crate::queue::TranslationQueue;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// What the input UI renders under the text box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preview {
    pub text: String,
    pub is_loading: bool,
}

#[derive(Default)]
struct Slot {
    generation: u64,
    token: Option<CancellationToken>,
}

struct Shared {
    slot: Mutex<Slot>,
    preview: watch::Sender<Preview>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct LivePreview {
    queue: TranslationQueue,
    transliterator: Transliterator,
    detector: ScriptDetector,
    delay: Duration,
    priority: Priority,
    shared: Arc<Shared>,
}

impl LivePreview {
    /// `transliterator` decides which targets get a preview at all; the
    /// rendering itself runs on the queue's backend.
    pub fn new(queue: TranslationQueue, transliterator: Transliterator) -> Self {
        let (preview, _) = watch::channel(Preview::default());
        Self {
            queue,
            transliterator,
            detector: ScriptDetector::new(),
            delay: DEFAULT_DEBOUNCE,
            priority: Priority::Low,
            shared: Arc::new(Shared { slot: Mutex::new(Slot::default()), preview }),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queue priority of preview evaluations. Defaults to low.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Schedules a preview of `text` in `target_language`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn update(&self, text: &str, target_language: &str) {
        let mut slot = self.shared.lock();
        slot.generation += 1;
        if let Some(token) = slot.token.take() {
            token.cancel();
        }

        // Latin targets and scripts without a table have nothing to render.
        if !self.transliterator.supports(target_language) || !self.detector.is_predominantly_latin(text) {
            self.shared.preview.send_replace(Preview::default());
            return;
        }

        self.shared.preview.send_modify(|p| p.is_loading = true);

        let token = CancellationToken::new();
        slot.token = Some(token.clone());
        let generation = slot.generation;
        drop(slot);

        let shared = Arc::clone(&self.shared);
        let queue = self.queue.clone();
        let delay = self.delay;
        let priority = self.priority;
        let text = text.to_string();
        let target = target_language.to_string();

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }

            let handle = queue.enqueue(TaskKind::Transliterate, text.as_str(), ENGLISH, &target, priority);
            let outcome = tokio::select! {
                _ = token.cancelled() => return,
                outcome = handle => outcome,
            };

            let slot = shared.lock();
            if slot.generation != generation {
                return;
            }
            let rendered = match outcome {
                Ok(result) => result.text,
                Err(e) => {
                    warn!(error = %e, "preview evaluation failed");
                    String::new()
                }
            };
            debug!(generation, chars = rendered.chars().count(), "preview updated");
            shared.preview.send_replace(Preview { text: rendered, is_loading: false });
            drop(slot);
        });
    }

    /// Stops the pending evaluation. The current preview text is kept.
    pub fn cancel(&self) {
        let mut slot = self.shared.lock();
        slot.generation += 1;
        if let Some(token) = slot.token.take() {
            token.cancel();
        }
        self.shared.preview.send_modify(|p| p.is_loading = false);
    }

    pub fn get_preview(&self) -> Preview {
        self.shared.preview.borrow().clone()
    }

    /// Change notifications for UI observers.
    pub fn subscribe(&self) -> watch::Receiver<Preview> {
        self.shared.preview.subscribe()
    }
}

impl Drop for LivePreview {
    fn drop(&mut self) {
        if let Some(token) = self.shared.lock().token.take() {
            token.cancel();
        }
    }
}
