// crates/jobs/src/state.rs
//! Atomic state tracking for a single background job.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::RwLock;

use dupehound_types::JobKind;
use tokio::sync::broadcast;

use crate::types::{JobProgress, JobStatus};

/// Shared state for one job.
///
/// All fields use lock-free atomics (except `message` which uses a
/// RwLock) so the work body can report progress while observers read
/// snapshots without contention.
#[derive(Debug)]
pub struct JobState {
    kind: JobKind,
    status: AtomicU8,
    current: AtomicU64,
    total: AtomicU64,
    cancel_requested: AtomicBool,
    message: RwLock<Option<String>>,
    progress_tx: broadcast::Sender<JobProgress>,
}

impl JobState {
    /// Create a new pending job state.
    pub(crate) fn new(kind: JobKind) -> Self {
        let (progress_tx, _) = broadcast::channel(64);
        Self {
            kind,
            status: AtomicU8::new(JobStatus::Pending as u8),
            current: AtomicU64::new(0),
            total: AtomicU64::new(0),
            cancel_requested: AtomicBool::new(false),
            message: RwLock::new(None),
            progress_tx,
        }
    }

    pub fn kind(&self) -> JobKind {
        self.kind
    }

    pub fn status(&self) -> JobStatus {
        JobStatus::from_u8(self.status.load(Ordering::Relaxed))
    }

    /// Transition the job to Running status.
    pub(crate) fn set_running(&self) {
        self.status
            .store(JobStatus::Running as u8, Ordering::Relaxed);
        self.broadcast_progress();
    }

    /// Set the total number of work units and broadcast an update.
    pub fn set_total(&self, total: u64) {
        self.total.store(total, Ordering::Relaxed);
        self.broadcast_progress();
    }

    /// Increment the progress counter and broadcast an update.
    /// Returns the new current value.
    pub fn increment(&self) -> u64 {
        let new = self.current.fetch_add(1, Ordering::Relaxed) + 1;
        self.broadcast_progress();
        new
    }

    /// Set the human-readable progress message and broadcast.
    pub fn set_message(&self, msg: impl Into<String>) {
        match self.message.write() {
            Ok(mut guard) => *guard = Some(msg.into()),
            Err(e) => tracing::error!("RwLock poisoned writing message: {e}"),
        }
        self.broadcast_progress();
    }

    /// Mark the job as completed.
    pub(crate) fn complete(&self) {
        self.status
            .store(JobStatus::Completed as u8, Ordering::Relaxed);
        self.broadcast_progress();
    }

    /// Mark the job as cancelled.
    pub(crate) fn set_cancelled(&self) {
        self.status
            .store(JobStatus::Cancelled as u8, Ordering::Relaxed);
        self.broadcast_progress();
    }

    /// Mark the job as failed with an error message.
    pub(crate) fn fail(&self, error: impl Into<String>) {
        self.status
            .store(JobStatus::Failed as u8, Ordering::Relaxed);
        match self.message.write() {
            Ok(mut guard) => *guard = Some(error.into()),
            Err(e) => tracing::error!("RwLock poisoned writing error message: {e}"),
        }
        self.broadcast_progress();
    }

    /// Request cooperative cancellation.
    pub fn request_cancel(&self) {
        self.cancel_requested.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested. Work bodies poll this
    /// between units of work and bail out when it flips.
    pub fn is_cancel_requested(&self) -> bool {
        self.cancel_requested.load(Ordering::Relaxed)
    }

    /// Subscribe to progress updates for this specific job.
    pub fn subscribe(&self) -> broadcast::Receiver<JobProgress> {
        self.progress_tx.subscribe()
    }

    /// Get a snapshot of the current job state.
    pub fn snapshot(&self) -> JobProgress {
        JobProgress {
            kind: self.kind,
            title: self.kind.title(),
            status: self.status(),
            current: self.current.load(Ordering::Relaxed),
            total: self.total.load(Ordering::Relaxed),
            message: match self.message.read() {
                Ok(g) => g.clone(),
                Err(e) => {
                    tracing::error!("RwLock poisoned reading message: {e}");
                    None
                }
            },
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn broadcast_progress(&self) {
        // Ignore send errors (no subscribers is fine).
        let _ = self.progress_tx.send(self.snapshot());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_state_lifecycle() {
        let state = JobState::new(JobKind::Scan);

        // Initial state
        let snap = state.snapshot();
        assert_eq!(snap.status, JobStatus::Pending);
        assert_eq!(snap.kind, JobKind::Scan);
        assert_eq!(snap.title, "Scanning for duplicates");
        assert_eq!(snap.current, 0);

        state.set_running();
        assert_eq!(state.status(), JobStatus::Running);

        state.set_total(100);
        assert_eq!(state.increment(), 1);
        assert_eq!(state.increment(), 2);
        let snap = state.snapshot();
        assert_eq!(snap.current, 2);
        assert_eq!(snap.total, 100);

        state.set_message("Scanning ~/Music...");
        assert_eq!(
            state.snapshot().message,
            Some("Scanning ~/Music...".to_string())
        );

        state.complete();
        assert_eq!(state.status(), JobStatus::Completed);
    }

    #[test]
    fn test_job_state_failure() {
        let state = JobState::new(JobKind::Delete);
        state.set_running();
        state.fail("permission denied");
        assert_eq!(state.status(), JobStatus::Failed);
        assert_eq!(
            state.snapshot().message,
            Some("permission denied".to_string())
        );
    }

    #[test]
    fn test_job_state_cancellation_flag() {
        let state = JobState::new(JobKind::Move);
        state.set_running();

        assert!(!state.is_cancel_requested());
        state.request_cancel();
        assert!(state.is_cancel_requested());
        // The flag alone does not change the status.
        assert_eq!(state.status(), JobStatus::Running);

        state.set_cancelled();
        assert_eq!(state.status(), JobStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_job_state_subscribe() {
        let state = JobState::new(JobKind::Copy);
        let mut rx = state.subscribe();

        state.set_running();

        let progress = rx.recv().await.unwrap();
        assert_eq!(progress.status, JobStatus::Running);
        assert_eq!(progress.kind, JobKind::Copy);
    }
}
