// crates/jobs/src/error.rs
use dupehound_types::JobKind;
use thiserror::Error;

/// A new job was requested while another one still occupies the slot.
///
/// Recoverable: the job already in flight is unaffected, and the caller
/// may retry once it finishes. The slot frees only after the finished
/// job's completion handling has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("a {running} job is already in progress")]
pub struct JobInProgressError {
    /// Kind of the job currently occupying the slot.
    pub running: JobKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_running_kind() {
        let err = JobInProgressError {
            running: JobKind::Scan,
        };
        assert_eq!(err.to_string(), "a scan job is already in progress");
    }
}
