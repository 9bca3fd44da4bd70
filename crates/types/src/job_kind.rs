// crates/types/src/job_kind.rs
//! Kinds of long-running background operations.

use serde::{Deserialize, Serialize};

/// Kind of a long-running background operation.
///
/// Used for display-title lookup and completion routing; the work body
/// itself is supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// Scan selected directories for duplicates.
    Scan,
    /// Load a previously saved result set.
    Load,
    /// Move selected files to a destination folder.
    Move,
    /// Copy selected files to a destination folder.
    Copy,
    /// Send selected files to the trash.
    Delete,
}

impl JobKind {
    /// Display title shown while a job of this kind runs.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Scan => "Scanning for duplicates",
            Self::Load => "Loading",
            Self::Move => "Moving",
            Self::Copy => "Copying",
            Self::Delete => "Sending files to the Trash",
        }
    }

    /// Stable lowercase name, used in logs and serialized snapshots.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scan => "scan",
            Self::Load => "load",
            Self::Move => "move",
            Self::Copy => "copy",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
