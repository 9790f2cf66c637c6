//! The status state machine: a closed set with no forbidden-transition
//! table, driven by a propose/commit protocol. If stricter transition rules
//! are ever wanted, this is the single place to add a table.

use serde::Serialize;

use super::domain::ReviewStatus;

/// The (old, new) pair shown to an operator before they confirm a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusPreview {
    pub from: ReviewStatus,
    pub to: ReviewStatus,
}

/// Result of proposing a new status against the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusProposal {
    /// Proposed value equals the current one: any pending preview is cleared
    /// and the commit action is disabled.
    NoOp,
    /// A real change: the preview is staged and commit is enabled.
    Staged(StatusPreview),
}

impl StatusProposal {
    pub const fn commit_enabled(&self) -> bool {
        matches!(self, StatusProposal::Staged(_))
    }

    pub const fn preview(&self) -> Option<StatusPreview> {
        match self {
            StatusProposal::Staged(preview) => Some(*preview),
            StatusProposal::NoOp => None,
        }
    }
}

pub fn propose(current: ReviewStatus, requested: ReviewStatus) -> StatusProposal {
    if current == requested {
        StatusProposal::NoOp
    } else {
        StatusProposal::Staged(StatusPreview {
            from: current,
            to: requested,
        })
    }
}
