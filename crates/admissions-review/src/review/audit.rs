//! Read path over the append-only status-change trail. This layer never
//! writes events; it only re-reads after a successful commit.

use serde::Serialize;

use super::backend::{BackendError, ReviewBackend};
use super::domain::{ApplicantId, Role, StatusChangeEvent};
use super::permissions;

pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// Shown in place of history when the role may not see it. Querying the
/// collaborator at all would leak a capability error to non-privileged roles.
pub const HISTORY_PLACEHOLDER: &str = "History is not available to your role.";

/// What the history panel renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HistoryView {
    Entries { events: Vec<StatusChangeEvent> },
    NotAvailable { message: &'static str },
}

impl HistoryView {
    pub fn not_available() -> Self {
        HistoryView::NotAvailable {
            message: HISTORY_PLACEHOLDER,
        }
    }
}

/// Bounded, role-gated reader over the external audit trail.
#[derive(Debug, Clone)]
pub struct AuditTrail {
    limit: usize,
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl AuditTrail {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Most-recent-first entries for one applicant, or the placeholder when
    /// the role lacks visibility (in which case no read is issued at all).
    pub fn recent<B: ReviewBackend>(
        &self,
        backend: &B,
        role: Role,
        applicant: &ApplicantId,
    ) -> Result<HistoryView, BackendError> {
        if !permissions::history_visible(role) {
            return Ok(HistoryView::not_available());
        }

        let mut events = backend.recent_events(applicant, self.limit)?;
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        events.truncate(self.limit);
        Ok(HistoryView::Entries { events })
    }
}
