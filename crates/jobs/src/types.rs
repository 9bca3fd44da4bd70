// crates/jobs/src/types.rs
//! Types for the background job system.

use std::sync::Arc;

use dupehound_types::JobKind;
use serde::Serialize;

use crate::state::JobState;

/// Status of a background job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum JobStatus {
    Pending = 0,
    Running = 1,
    Completed = 2,
    Cancelled = 3,
    Failed = 4,
}

impl JobStatus {
    pub(crate) fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Pending,
            1 => Self::Running,
            2 => Self::Completed,
            3 => Self::Cancelled,
            _ => Self::Failed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        }
    }

    /// Completed, cancelled or failed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }
}

/// Handle to a started job.
///
/// Cancellation is cooperative: [`cancel`](JobHandle::cancel) raises a
/// flag the work body polls via [`JobState::is_cancel_requested`].
#[derive(Debug)]
pub struct JobHandle {
    state: Arc<JobState>,
}

impl JobHandle {
    pub(crate) fn new(state: Arc<JobState>) -> Self {
        Self { state }
    }

    /// Kind of the job this handle refers to.
    pub fn kind(&self) -> JobKind {
        self.state.kind()
    }

    /// Request cancellation. The job keeps running until its work body
    /// next checks the flag.
    pub fn cancel(&self) {
        self.state.request_cancel();
    }

    /// Current snapshot of the job.
    pub fn snapshot(&self) -> JobProgress {
        self.state.snapshot()
    }
}

/// Point-in-time snapshot of a job, broadcast on every update.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobProgress {
    pub kind: JobKind,
    pub title: &'static str,
    pub status: JobStatus,
    pub current: u64,
    pub total: u64,
    pub message: Option<String>,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_discriminants() {
        assert_eq!(JobStatus::Pending as u8, 0);
        assert_eq!(JobStatus::Running as u8, 1);
        assert_eq!(JobStatus::Completed as u8, 2);
        assert_eq!(JobStatus::Cancelled as u8, 3);
        assert_eq!(JobStatus::Failed as u8, 4);
    }

    #[test]
    fn test_job_status_round_trip() {
        for status in [
            JobStatus::Pending,
            JobStatus::Running,
            JobStatus::Completed,
            JobStatus::Cancelled,
            JobStatus::Failed,
        ] {
            assert_eq!(JobStatus::from_u8(status as u8), status);
        }
        // Out-of-range values degrade to Failed.
        assert_eq!(JobStatus::from_u8(255), JobStatus::Failed);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn test_job_handle_cancel_sets_flag() {
        let state = Arc::new(JobState::new(JobKind::Move));
        let handle = JobHandle::new(Arc::clone(&state));

        assert!(!state.is_cancel_requested());
        handle.cancel();
        assert!(state.is_cancel_requested());
        assert_eq!(handle.kind(), JobKind::Move);
    }

    #[test]
    fn test_job_progress_serialize() {
        let progress = JobProgress {
            kind: JobKind::Scan,
            title: JobKind::Scan.title(),
            status: JobStatus::Running,
            current: 50,
            total: 100,
            message: Some("Scanning ~/Music".to_string()),
            timestamp: "2026-08-07T12:00:00Z".to_string(),
        };
        let json = serde_json::to_string(&progress).unwrap();
        assert!(json.contains("\"kind\":\"scan\""));
        assert!(json.contains("\"title\":\"Scanning for duplicates\""));
        assert!(json.contains("\"status\":\"running\""));
        assert!(json.contains("\"current\":50"));
    }
}
