// crates/jobs/src/runner.rs
//! Single-flight job runner with completion routing.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use dupehound_types::JobKind;
use tokio::sync::broadcast;

use crate::error::JobInProgressError;
use crate::state::JobState;
use crate::types::{JobHandle, JobProgress};

/// Receives the outcome of every started job, exactly once per job.
///
/// The return value reports whether the handler consumed the error:
/// returning `false` while an error is present routes that error to the
/// runner's unhandled-error function.
pub trait CompletionHandler: Send + Sync + 'static {
    fn job_completed(&self, kind: JobKind, error: Option<&anyhow::Error>) -> bool;
}

impl<F> CompletionHandler for F
where
    F: Fn(JobKind, Option<&anyhow::Error>) -> bool + Send + Sync + 'static,
{
    fn job_completed(&self, kind: JobKind, error: Option<&anyhow::Error>) -> bool {
        self(kind, error)
    }
}

type Slot = Mutex<Option<Arc<JobState>>>;

fn lock(slot: &Slot) -> MutexGuard<'_, Option<Arc<JobState>>> {
    match slot.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::error!("job slot mutex poisoned");
            poisoned.into_inner()
        }
    }
}

/// Runs at most one background job at a time.
///
/// Call [`start`](JobRunner::start) to spawn async work with progress
/// tracking; a second `start` while the slot is occupied fails with
/// [`JobInProgressError`] and leaves the running job untouched. When a
/// job finishes, its outcome goes to the registered [`CompletionHandler`];
/// an error the handler declines is passed to the unhandled-error
/// function. Only then is the slot freed for the next `start`.
pub struct JobRunner {
    active: Arc<Slot>,
    handler: Arc<dyn CompletionHandler>,
    escalate: Arc<dyn Fn(anyhow::Error) + Send + Sync>,
    global_tx: broadcast::Sender<JobProgress>,
}

impl JobRunner {
    /// Create a runner with its completion handler and unhandled-error
    /// function. Both are registered once, at construction.
    pub fn new<H, E>(handler: H, escalate: E) -> Self
    where
        H: CompletionHandler,
        E: Fn(anyhow::Error) + Send + Sync + 'static,
    {
        let (global_tx, _) = broadcast::channel(256);
        Self {
            active: Arc::new(Mutex::new(None)),
            handler: Arc::new(handler),
            escalate: Arc::new(escalate),
            global_tx,
        }
    }

    /// Start a new background job.
    ///
    /// The closure `work` receives an `Arc<JobState>` for reporting
    /// progress and polling the cancellation flag; any other inputs it
    /// needs are captured by the closure. The job is marked Running
    /// before `start` returns, and `work` runs on the async runtime
    /// without blocking the caller.
    ///
    /// Fails with [`JobInProgressError`] while another job occupies the
    /// slot; the occupying job is unaffected and no completion event is
    /// produced for the rejected attempt.
    pub fn start<F, Fut>(&self, kind: JobKind, work: F) -> Result<JobHandle, JobInProgressError>
    where
        F: FnOnce(Arc<JobState>) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let state = {
            let mut slot = lock(&self.active);
            if let Some(running) = slot.as_ref() {
                tracing::warn!(
                    requested = kind.as_str(),
                    running = running.kind().as_str(),
                    "rejecting job start, another job is in progress"
                );
                return Err(JobInProgressError {
                    running: running.kind(),
                });
            }
            let state = Arc::new(JobState::new(kind));
            state.set_running();
            *slot = Some(Arc::clone(&state));
            state
        };

        tracing::info!(job = kind.as_str(), title = kind.title(), "starting background job");

        // Forward job progress to the runner-wide channel. The task holds
        // only the receiver, so it ends once the job state is dropped.
        let mut progress_rx = state.subscribe();
        let global_tx = self.global_tx.clone();
        tokio::spawn(async move {
            while let Ok(progress) = progress_rx.recv().await {
                let _ = global_tx.send(progress);
            }
        });

        let active = Arc::clone(&self.active);
        let handler = Arc::clone(&self.handler);
        let escalate = Arc::clone(&self.escalate);
        let task_state = Arc::clone(&state);
        tokio::spawn(async move {
            // Inner spawn so a panicking work body becomes a captured
            // failure instead of killing the supervisor.
            let joined = tokio::spawn(work(Arc::clone(&task_state))).await;
            let result: anyhow::Result<()> = match joined {
                Ok(result) => result,
                Err(e) if e.is_panic() => Err(anyhow::anyhow!("job panicked: {e}")),
                Err(e) => Err(anyhow::anyhow!("job task aborted: {e}")),
            };

            let error = match result {
                Ok(()) if task_state.is_cancel_requested() => {
                    task_state.set_cancelled();
                    None
                }
                Ok(()) => {
                    task_state.complete();
                    None
                }
                Err(e) => {
                    task_state.fail(e.to_string());
                    Some(e)
                }
            };

            let handled = handler.job_completed(kind, error.as_ref());
            if let Some(err) = error {
                if handled {
                    tracing::debug!(job = kind.as_str(), "job error consumed by completion handler");
                } else {
                    tracing::error!(job = kind.as_str(), error = %err, "unhandled job error, escalating");
                    escalate(err);
                }
            }

            // The slot stays occupied until completion handling is done,
            // so a start() issued from inside the handler is rejected.
            *lock(&active) = None;
            tracing::debug!(job = kind.as_str(), "job slot cleared");
        });

        Ok(JobHandle::new(state))
    }

    /// Snapshot of the job currently occupying the slot, if any.
    pub fn current(&self) -> Option<JobProgress> {
        lock(&self.active).as_ref().map(|s| s.snapshot())
    }

    /// Whether the slot is free.
    pub fn is_idle(&self) -> bool {
        lock(&self.active).is_none()
    }

    /// Subscribe to progress updates from every job this runner starts.
    pub fn subscribe(&self) -> broadcast::Receiver<JobProgress> {
        self.global_tx.subscribe()
    }
}
