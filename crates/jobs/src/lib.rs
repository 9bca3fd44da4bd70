// crates/jobs/src/lib.rs
//! Background job system for long-running operations.
//!
//! Provides:
//! - `JobRunner` — single-flight manager for spawning and supervising jobs
//! - `JobState` — atomic progress tracking per job
//! - `JobHandle` — cancellation and snapshot handle
//! - `JobProgress` — broadcastable progress snapshots
//!
//! One job runs at a time. Starting a second one while the slot is
//! occupied fails with [`JobInProgressError`]; the outcome of every
//! started job is routed to a single registered [`CompletionHandler`],
//! and errors that handler declines go to the unhandled-error function.

pub mod error;
pub mod runner;
pub mod state;
pub mod types;

pub use error::JobInProgressError;
pub use runner::{CompletionHandler, JobRunner};
pub use state::JobState;
pub use types::{JobHandle, JobProgress, JobStatus};
