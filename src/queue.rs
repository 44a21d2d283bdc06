// File: src/queue.rs
//! Priority-ordered, concurrency-bounded background scheduler.
//!
//! `enqueue` never blocks: it files the task and returns a [`TaskHandle`]
//! future right away. At most `max_concurrent` tasks run at once; when one
//! finishes the next pending task starts. High priority goes ahead of normal,
//! normal ahead of low, FIFO within a tier. Completion order is not dispatch
//! order.

use crate::cache::ResultCache;
use crate::core::types::{Priority, TaskKind, TranslationResult};
use crate::error::{Result, TranslationError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use std::time::Instant;
use tokio::sync::oneshot;
use tracing::{debug, warn};

pub const DEFAULT_MAX_CONCURRENT: usize = 5;

/// One unit of queued work.
#[derive(Debug, Clone)]
pub struct TranslationTask {
    pub id: u64,
    pub kind: TaskKind,
    pub text: String,
    pub source_language: String,
    pub target_language: String,
    pub priority: Priority,
    pub enqueued_at: Instant,
}

/// Whatever actually performs a task. The engine implements this; tests
/// plug in slow or failing backends.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    async fn run(&self, task: &TranslationTask) -> Result<TranslationResult>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub pending: usize,
    pub running: usize,
    pub completed: u64,
    pub failed: u64,
}

type Responder = oneshot::Sender<Result<TranslationResult>>;

struct Pending {
    task: TranslationTask,
    responder: Responder,
}

#[derive(Default)]
struct QueueState {
    pending: VecDeque<Pending>,
    running: usize,
    completed: u64,
    failed: u64,
}

struct Inner {
    backend: Arc<dyn TranslationBackend>,
    cache: Option<Arc<ResultCache>>,
    max_concurrent: usize,
    next_id: AtomicU64,
    state: Mutex<QueueState>,
}

/// Cheap to clone; clones share the same pending list and slots.
#[derive(Clone)]
pub struct TranslationQueue {
    inner: Arc<Inner>,
}

impl TranslationQueue {
    pub fn new(backend: Arc<dyn TranslationBackend>, max_concurrent: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                cache: None,
                max_concurrent: max_concurrent.max(1),
                next_id: AtomicU64::new(1),
                state: Mutex::new(QueueState::default()),
            }),
        }
    }

    /// Consults `cache` before running a task and stores translated results.
    pub fn with_cache(
        backend: Arc<dyn TranslationBackend>,
        max_concurrent: usize,
        cache: Arc<ResultCache>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                cache: Some(cache),
                max_concurrent: max_concurrent.max(1),
                next_id: AtomicU64::new(1),
                state: Mutex::new(QueueState::default()),
            }),
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.inner.max_concurrent
    }

    /// Files a task and returns its outcome future immediately.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn enqueue(
        &self,
        kind: TaskKind,
        text: impl Into<String>,
        source_language: &str,
        target_language: &str,
        priority: Priority,
    ) -> TaskHandle {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let task = TranslationTask {
            id,
            kind,
            text: text.into(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            priority,
            enqueued_at: Instant::now(),
        };
        let (responder, rx) = oneshot::channel();

        {
            let mut state = self.inner.lock();
            let rank = priority.rank();
            let at = state
                .pending
                .iter()
                .position(|p| p.task.priority.rank() > rank)
                .unwrap_or(state.pending.len());
            state.pending.insert(at, Pending { task, responder });
            debug!(task = id, ?priority, pending = state.pending.len(), "task enqueued");
        }

        Inner::pump(&self.inner);
        TaskHandle { id, rx }
    }

    pub fn stats(&self) -> QueueStats {
        let state = self.inner.lock();
        QueueStats {
            pending: state.pending.len(),
            running: state.running,
            completed: state.completed,
            failed: state.failed,
        }
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts pending tasks while slots are free.
    fn pump(this: &Arc<Self>) {
        loop {
            let job = {
                let mut state = this.lock();
                if state.running >= this.max_concurrent {
                    return;
                }
                match state.pending.pop_front() {
                    Some(job) => {
                        state.running += 1;
                        job
                    }
                    None => return,
                }
            };
            Self::dispatch(Arc::clone(this), job);
        }
    }

    fn dispatch(this: Arc<Self>, job: Pending) {
        tokio::spawn(async move {
            let Pending { task, responder } = job;
            let waited = task.enqueued_at.elapsed();
            let outcome = this.execute(&task).await;

            {
                let mut state = this.lock();
                state.running -= 1;
                match &outcome {
                    Ok(_) => state.completed += 1,
                    Err(e) => {
                        state.failed += 1;
                        warn!(task = task.id, error = %e, "translation task failed");
                    }
                }
            }
            debug!(task = task.id, waited_ms = waited.as_millis() as u64, "task finished");

            // The caller may have dropped its handle; that is not an error.
            let _ = responder.send(outcome);
            Self::pump(&this);
        });
    }

    async fn execute(&self, task: &TranslationTask) -> Result<TranslationResult> {
        let key = self.cache.as_ref().map(|cache| {
            cache.key(task.kind, &task.source_language, &task.target_language, &task.text)
        });
        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            if let Some(hit) = cache.get(key) {
                return Ok(hit);
            }
        }

        // Run on its own task so a panicking backend only fails this task.
        let backend = Arc::clone(&self.backend);
        let owned = task.clone();
        let result = tokio::spawn(async move { backend.run(&owned).await })
            .await
            .map_err(|e| TranslationError::QueueTaskFailed(e.to_string()))?
            .map_err(|e| match e {
                TranslationError::QueueTaskFailed(_) => e,
                other => TranslationError::QueueTaskFailed(other.to_string()),
            })?;

        if let (Some(cache), Some(key)) = (&self.cache, key) {
            if result.is_translated {
                cache.set(key, result.clone());
            }
        }
        Ok(result)
    }
}

/// Resolves exactly once with the task's outcome.
#[derive(Debug)]
pub struct TaskHandle {
    id: u64,
    rx: oneshot::Receiver<Result<TranslationResult>>,
}

impl TaskHandle {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Future for TaskHandle {
    type Output = Result<TranslationResult>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|received| {
            received.unwrap_or_else(|_| {
                Err(TranslationError::QueueTaskFailed("task dropped before completion".into()))
            })
        })
    }
}
