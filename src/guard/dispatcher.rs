//! Single-worker move dispatcher.
//!
//! Every accepted submission becomes one job on a single FIFO queue served
//! by one spawned worker, so at most one job runs at any time across all
//! keys. A submission whose key is still marked in the dedupe table never
//! reaches the queue and resolves to `Ok(None)`.

use std::error::Error;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::engine::ChessError;
use crate::guard::dedupe::Dedupe;

/// Deferred result of [`MoveDispatcher::enqueue`]. `Ok(None)` means the
/// submission was a duplicate and its task never ran.
pub type Submission<T> = BoxFuture<'static, Result<Option<T>, DispatchError>>;

type Job = BoxFuture<'static, ()>;

/// Failures surfaced to the submitter of a task.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("move task failed: {0}")]
    Task(#[source] Box<dyn Error + Send + Sync>),

    #[error("move task for key {key} panicked")]
    Panicked { key: String },

    #[error("move source {name} failed")]
    Source {
        name: String,
        #[source]
        error: ChessError,
    },

    #[error("move dispatcher is closed")]
    Closed,
}

/// FIFO, one-at-a-time executor for move tasks with single-flight keys.
#[derive(Debug)]
pub struct MoveDispatcher {
    dedupe: Arc<Dedupe>,
    jobs: mpsc::UnboundedSender<Job>,
}

impl MoveDispatcher {
    /// Create the dispatcher and spawn its worker on the current tokio
    /// runtime. The worker stops once the dispatcher is dropped and the
    /// queue has drained.
    pub fn new(dedupe: Arc<Dedupe>) -> Self {
        let (jobs, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(rx));
        MoveDispatcher { dedupe, jobs }
    }

    pub fn dedupe(&self) -> &Arc<Dedupe> {
        &self.dedupe
    }

    /// Queue `task` under `key`.
    ///
    /// Returns immediately. If `key` is a live duplicate the returned future
    /// resolves to `Ok(None)` and `task` is dropped unrun. Otherwise the key
    /// is marked, the task runs after every job queued before it, and its
    /// mark is cleared when it finishes, whether it succeeded, failed or
    /// panicked. A newer mark on the same key placed after this one expired
    /// survives.
    pub fn enqueue<F, Fut, T, E>(&self, key: impl Into<String>, task: F) -> Submission<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Into<Box<dyn Error + Send + Sync>> + Send + 'static,
    {
        let key = key.into();
        let Some(mark) = self.dedupe.try_mark(&key) else {
            debug!(%key, "duplicate submission skipped");
            return future::ready(Ok(None)).boxed();
        };

        let (reply, response) = oneshot::channel();
        let dedupe = Arc::clone(&self.dedupe);
        let job_key = key.clone();
        let job = async move {
            let outcome = AssertUnwindSafe(async move { task().await })
                .catch_unwind()
                .await;
            dedupe.clear_if(&job_key, mark);

            let result = match outcome {
                Ok(Ok(value)) => Ok(Some(value)),
                Ok(Err(err)) => {
                    let err = err.into();
                    warn!(key = %job_key, error = %err, "move task failed");
                    Err(DispatchError::Task(err))
                }
                Err(_) => {
                    warn!(key = %job_key, "move task panicked");
                    Err(DispatchError::Panicked { key: job_key })
                }
            };
            // The submitter may have stopped waiting; the work is done either way.
            let _ = reply.send(result);
        }
        .boxed();

        if self.jobs.send(job).is_err() {
            self.dedupe.clear_if(&key, mark);
            return future::ready(Err(DispatchError::Closed)).boxed();
        }
        async move { response.await.unwrap_or(Err(DispatchError::Closed)) }.boxed()
    }
}

async fn run_worker(mut jobs: mpsc::UnboundedReceiver<Job>) {
    while let Some(job) = jobs.recv().await {
        job.await;
    }
    debug!("move dispatcher stopped");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn dispatcher(ttl_ms: u64) -> MoveDispatcher {
        MoveDispatcher::new(Arc::new(Dedupe::new(Duration::from_millis(ttl_ms))))
    }

    #[tokio::test]
    async fn runs_task_and_returns_value() {
        let d = dispatcher(1000);
        let out = d.enqueue("a", || async { Ok::<_, Infallible>(7) }).await;
        assert_eq!(out.unwrap(), Some(7));
        // Key cleared on completion.
        assert!(!d.dedupe().is_duplicate("a"));
    }

    #[tokio::test]
    async fn duplicate_key_resolves_none() {
        let d = dispatcher(1000);
        let runs = Arc::new(AtomicUsize::new(0));
        let (release, gate) = oneshot::channel::<()>();

        let r1 = Arc::clone(&runs);
        let first = d.enqueue("same", move || async move {
            let _ = gate.await;
            r1.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Infallible>("first")
        });
        let r2 = Arc::clone(&runs);
        let second = d.enqueue("same", move || async move {
            r2.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Infallible>("second")
        });

        assert_eq!(second.await.unwrap(), None);
        release.send(()).unwrap();
        assert_eq!(first.await.unwrap(), Some("first"));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_is_reported_and_key_cleared() {
        let d = dispatcher(1000);
        let out = d
            .enqueue("k", || async { Err::<(), _>(std::io::Error::other("boom")) })
            .await;
        match out {
            Err(DispatchError::Task(err)) => assert_eq!(err.to_string(), "boom"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(!d.dedupe().is_duplicate("k"));

        // The queue keeps going.
        let next = d.enqueue("k", || async { Ok::<_, Infallible>(1) }).await;
        assert_eq!(next.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn panic_is_contained() {
        let d = dispatcher(1000);
        let out = d
            .enqueue("p", || async {
                if true {
                    panic!("task blew up");
                }
                Ok::<u8, Infallible>(0)
            })
            .await;
        assert!(matches!(out, Err(DispatchError::Panicked { ref key }) if key == "p"));
        assert!(!d.dedupe().is_duplicate("p"));

        let next = d.enqueue("q", || async { Ok::<_, Infallible>(2) }).await;
        assert_eq!(next.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn jobs_run_in_fifo_order() {
        let d = dispatcher(1000);
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let submissions: Vec<_> = (0..5)
            .map(|i| {
                let order = Arc::clone(&order);
                d.enqueue(format!("k{i}"), move || async move {
                    tokio::time::sleep(Duration::from_millis(5 - i as u64)).await;
                    order.lock().unwrap().push(i);
                    Ok::<_, Infallible>(i)
                })
            })
            .collect();
        let results = futures::future::join_all(submissions).await;
        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }
}
