//! In-memory authoritative copy of one applicant's review fields.
//!
//! The store holds exactly one applicant at a time. Opening another applicant
//! fully replaces the contents, and every applied external result is checked
//! against the still-active applicant id: a late response for a
//! previously-open applicant is dropped, never applied to whatever is open
//! now.

use std::sync::Mutex;

use tracing::debug;

use super::domain::{
    ApplicantId, EnglishProficiency, PrerequisiteUpdate, ReviewSnapshot, ReviewStatus,
    ScholarshipDecision,
};
use super::transition::StatusPreview;

/// Whether an external result was applied or dropped as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Applied,
    DiscardedStale,
}

impl IngestOutcome {
    pub const fn is_stale(self) -> bool {
        matches!(self, IngestOutcome::DiscardedStale)
    }
}

#[derive(Debug)]
struct ActiveReview {
    applicant: ApplicantId,
    /// `None` while the initial read is still in flight.
    snapshot: Option<ReviewSnapshot>,
    pending: Option<ReviewStatus>,
}

/// Owns the mutable review fields for the currently-open applicant.
///
/// Invariant: after any commit round-trip the stored status equals the value
/// last accepted by the external persistence call. The commit path only calls
/// [`ReviewStateStore::apply_committed`] on success, so a failed call leaves
/// the pre-commit value in place.
#[derive(Debug, Default)]
pub struct ReviewStateStore {
    active: Mutex<Option<ActiveReview>>,
}

impl ReviewStateStore {
    /// Mark `applicant` as the open review surface, discarding whatever was
    /// open before. Fields stay empty until the read result is ingested.
    pub fn begin_load(&self, applicant: ApplicantId) {
        let mut guard = self.active.lock().expect("review store mutex poisoned");
        *guard = Some(ActiveReview {
            applicant,
            snapshot: None,
            pending: None,
        });
    }

    /// Drop the open surface entirely.
    pub fn close(&self) {
        let mut guard = self.active.lock().expect("review store mutex poisoned");
        *guard = None;
    }

    pub fn active_applicant(&self) -> Option<ApplicantId> {
        let guard = self.active.lock().expect("review store mutex poisoned");
        guard.as_ref().map(|active| active.applicant.clone())
    }

    /// Apply the result of the initial read, unless the surface moved on.
    pub fn ingest_snapshot(
        &self,
        applicant: &ApplicantId,
        snapshot: ReviewSnapshot,
    ) -> IngestOutcome {
        self.mutate(applicant, |active| {
            active.snapshot = Some(snapshot);
            active.pending = None;
        })
    }

    pub fn snapshot(&self, applicant: &ApplicantId) -> Option<ReviewSnapshot> {
        let guard = self.active.lock().expect("review store mutex poisoned");
        guard
            .as_ref()
            .filter(|active| &active.applicant == applicant)
            .and_then(|active| active.snapshot.clone())
    }

    pub fn current_status(&self, applicant: &ApplicantId) -> Option<ReviewStatus> {
        let guard = self.active.lock().expect("review store mutex poisoned");
        guard
            .as_ref()
            .filter(|active| &active.applicant == applicant)
            .and_then(|active| active.snapshot.as_ref())
            .map(|snapshot| snapshot.status)
    }

    /// Stage a pending status without persisting it.
    pub fn set_pending(&self, applicant: &ApplicantId, status: ReviewStatus) -> IngestOutcome {
        self.mutate(applicant, |active| {
            active.pending = Some(status);
        })
    }

    pub fn clear_pending(&self, applicant: &ApplicantId) -> IngestOutcome {
        self.mutate(applicant, |active| {
            active.pending = None;
        })
    }

    /// The staged (old, new) pair, if a loaded surface has a real change.
    pub fn preview(&self, applicant: &ApplicantId) -> Option<StatusPreview> {
        let guard = self.active.lock().expect("review store mutex poisoned");
        let active = guard
            .as_ref()
            .filter(|active| &active.applicant == applicant)?;
        let current = active.snapshot.as_ref()?.status;
        let pending = active.pending?;
        Some(StatusPreview {
            from: current,
            to: pending,
        })
    }

    /// Adopt the value the external store just accepted and drop the preview.
    pub fn apply_committed(&self, applicant: &ApplicantId, status: ReviewStatus) -> IngestOutcome {
        self.mutate_loaded(applicant, |snapshot, pending| {
            snapshot.status = status;
            *pending = None;
        })
    }

    pub fn apply_prerequisites(
        &self,
        applicant: &ApplicantId,
        update: &PrerequisiteUpdate,
    ) -> IngestOutcome {
        self.mutate_loaded(applicant, |snapshot, _| {
            snapshot.prerequisites = update.notes.clone();
            snapshot.rating = update.rating;
        })
    }

    pub fn apply_scholarship(
        &self,
        applicant: &ApplicantId,
        decision: ScholarshipDecision,
    ) -> IngestOutcome {
        self.mutate_loaded(applicant, |snapshot, _| {
            snapshot.scholarship = decision;
        })
    }

    pub fn apply_english(
        &self,
        applicant: &ApplicantId,
        english: &EnglishProficiency,
    ) -> IngestOutcome {
        self.mutate_loaded(applicant, |snapshot, _| {
            snapshot.english = english.clone();
        })
    }

    pub fn apply_gpa(&self, applicant: &ApplicantId, gpa_note: &str) -> IngestOutcome {
        self.mutate_loaded(applicant, |snapshot, _| {
            snapshot.gpa_note = Some(gpa_note.to_string());
        })
    }

    fn mutate(
        &self,
        applicant: &ApplicantId,
        op: impl FnOnce(&mut ActiveReview),
    ) -> IngestOutcome {
        let mut guard = self.active.lock().expect("review store mutex poisoned");
        match guard.as_mut() {
            Some(active) if &active.applicant == applicant => {
                op(active);
                IngestOutcome::Applied
            }
            _ => {
                debug!(applicant = %applicant.0, "stale result dropped; surface has moved on");
                IngestOutcome::DiscardedStale
            }
        }
    }

    fn mutate_loaded(
        &self,
        applicant: &ApplicantId,
        op: impl FnOnce(&mut ReviewSnapshot, &mut Option<ReviewStatus>),
    ) -> IngestOutcome {
        let mut guard = self.active.lock().expect("review store mutex poisoned");
        match guard.as_mut() {
            Some(active) if &active.applicant == applicant => match active.snapshot.as_mut() {
                Some(snapshot) => {
                    op(snapshot, &mut active.pending);
                    IngestOutcome::Applied
                }
                None => IngestOutcome::DiscardedStale,
            },
            _ => {
                debug!(applicant = %applicant.0, "stale result dropped; surface has moved on");
                IngestOutcome::DiscardedStale
            }
        }
    }
}
