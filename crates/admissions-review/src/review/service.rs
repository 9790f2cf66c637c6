use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use super::audit::{AuditTrail, HistoryView};
use super::backend::{BackendError, ReviewBackend};
use super::domain::{
    ApplicantId, CredentialSummary, EnglishProficiency, PrerequisiteUpdate, ReviewSnapshot,
    ReviewStatus, Role, ScholarshipDecision,
};
use super::permissions::{self, FieldAccess, ReviewField};
use super::ranking;
use super::session::{self, ReviewerIdentity};
use super::store::ReviewStateStore;
use super::sync::{PanelRegistry, SurfaceId};
use super::transition::{self, StatusPreview, StatusProposal};
use super::validation::{self, ValidationError};

/// Error raised by the review workflow. Nothing here is fatal to the host
/// application; every failure is scoped to the operation that raised it.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("session is not authenticated")]
    Unauthenticated,
    #[error("{field:?} is not editable for the {role:?} role")]
    PermissionDenied { role: Role, field: ReviewField },
    #[error("no applicant review surface is open")]
    NoActiveReview,
    #[error("applicant not found")]
    UnknownApplicant,
    #[error("no status change is staged for commit")]
    NothingToCommit,
    #[error("a status commit is already in flight")]
    CommitInFlight,
    #[error("{message}")]
    Rejected { message: String },
    #[error("records service unreachable: {0}")]
    Transport(String),
}

impl From<BackendError> for WorkflowError {
    fn from(value: BackendError) -> Self {
        match value {
            BackendError::Transport(detail) => Self::Transport(detail),
            BackendError::UnknownApplicant => Self::UnknownApplicant,
        }
    }
}

/// Access pair for one field, flattened for the surface payload.
#[derive(Debug, Clone, Serialize)]
pub struct FieldAccessEntry {
    pub field: ReviewField,
    #[serde(flatten)]
    pub access: FieldAccess,
}

/// Everything the host page needs to render one applicant's review surface.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewSurface {
    pub applicant_id: ApplicantId,
    pub reviewer_role: Role,
    pub fields: ReviewSnapshot,
    pub badge_color: &'static str,
    /// The closed status set, in presentation order, for the selectors.
    pub status_options: Vec<&'static str>,
    pub permissions: Vec<FieldAccessEntry>,
    pub credential_summary: CredentialSummary,
    pub history: HistoryView,
}

/// Returned by a successful commit: what changed, how many panels were
/// rewritten, and the freshly re-read history.
#[derive(Debug, Clone, Serialize)]
pub struct CommitReceipt {
    pub applicant_id: ApplicantId,
    pub previous: ReviewStatus,
    pub committed: ReviewStatus,
    pub badge_color: &'static str,
    pub panels_updated: usize,
    pub history: HistoryView,
}

/// Scoped in-flight lock: acquired before the persistence call, released on
/// both success and failure paths when the guard drops.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Composes the state store, permission gate, transition rules, audit trail,
/// and panel registry over one collaborator backend for one review session.
pub struct ReviewWorkflowService<B> {
    backend: Arc<B>,
    store: ReviewStateStore,
    panels: PanelRegistry,
    audit: AuditTrail,
    identity: ReviewerIdentity,
    commit_in_flight: AtomicBool,
}

impl<B> ReviewWorkflowService<B>
where
    B: ReviewBackend + 'static,
{
    /// Resolve the session role from the collaborator and build the service.
    pub fn connect(backend: Arc<B>, history_limit: usize) -> Result<Self, WorkflowError> {
        let identity = session::resolve_identity(backend.as_ref())?;
        Ok(Self::with_identity(backend, identity, history_limit))
    }

    pub fn with_identity(
        backend: Arc<B>,
        identity: ReviewerIdentity,
        history_limit: usize,
    ) -> Self {
        Self {
            backend,
            store: ReviewStateStore::default(),
            panels: PanelRegistry::default(),
            audit: AuditTrail::new(history_limit),
            identity,
            commit_in_flight: AtomicBool::new(false),
        }
    }

    pub fn identity(&self) -> &ReviewerIdentity {
        &self.identity
    }

    pub fn role(&self) -> Role {
        self.identity.role
    }

    /// Delegates to the permission gate on every call; access is never
    /// cached across a role change.
    pub fn field_access(&self, field: ReviewField) -> FieldAccess {
        permissions::resolve(self.identity.role, field)
    }

    /// Open an applicant's review surface: load the fields, rank the
    /// credentials, gate the controls, and read the history. Replaces
    /// whatever surface was open before.
    pub fn open_review(&self, applicant: ApplicantId) -> Result<ReviewSurface, WorkflowError> {
        self.store.begin_load(applicant.clone());

        let snapshot = self.backend.fetch_review(&applicant)?;
        if self
            .store
            .ingest_snapshot(&applicant, snapshot.clone())
            .is_stale()
        {
            debug!(applicant = %applicant.0, "review surface replaced during load");
        }

        let records = self.backend.academic_records(&applicant)?;
        let credential_summary = ranking::highest_credential(&records);
        let history = self
            .audit
            .recent(self.backend.as_ref(), self.identity.role, &applicant)?;

        Ok(ReviewSurface {
            badge_color: snapshot.status.badge_color(),
            applicant_id: applicant,
            reviewer_role: self.identity.role,
            fields: snapshot,
            status_options: ReviewStatus::ALL.iter().map(|status| status.label()).collect(),
            permissions: permissions::access_map(self.identity.role)
                .into_iter()
                .map(|(field, access)| FieldAccessEntry { field, access })
                .collect(),
            credential_summary,
            history,
        })
    }

    /// Close the surface and drop every mounted panel.
    pub fn close_review(&self) {
        self.store.close();
        self.panels.clear();
    }

    /// Stage or clear a status preview. Proposing the current value is a
    /// no-op: the preview clears and commit stays disabled.
    pub fn propose_status(
        &self,
        applicant: &ApplicantId,
        requested: ReviewStatus,
    ) -> Result<StatusProposal, WorkflowError> {
        let current = self
            .store
            .current_status(applicant)
            .ok_or(WorkflowError::NoActiveReview)?;

        let proposal = transition::propose(current, requested);
        match proposal {
            StatusProposal::NoOp => self.store.clear_pending(applicant),
            StatusProposal::Staged(preview) => self.store.set_pending(applicant, preview.to),
        };
        Ok(proposal)
    }

    /// Persist the staged transition. On success the store adopts the new
    /// value, every mounted panel is rewritten, and the history is re-read.
    /// On failure the store and the preview are left untouched so the
    /// operator can retry without re-entering anything.
    pub fn commit_status(&self, applicant: &ApplicantId) -> Result<CommitReceipt, WorkflowError> {
        let access = permissions::resolve(self.identity.role, ReviewField::StatusTransition);
        if !access.editable {
            return Err(WorkflowError::PermissionDenied {
                role: self.identity.role,
                field: ReviewField::StatusTransition,
            });
        }

        if self.store.current_status(applicant).is_none() {
            return Err(WorkflowError::NoActiveReview);
        }
        let preview = self
            .store
            .preview(applicant)
            .ok_or(WorkflowError::NothingToCommit)?;

        let _guard = InFlightGuard::acquire(&self.commit_in_flight)
            .ok_or(WorkflowError::CommitInFlight)?;

        let outcome = self
            .backend
            .write_status(applicant, preview.to, &self.identity.name)?;
        if !outcome.success {
            // Preview stays staged for retry; the store keeps its
            // pre-commit value.
            return Err(WorkflowError::Rejected {
                message: outcome.message,
            });
        }

        self.store.apply_committed(applicant, preview.to);
        let panels_updated = self.panels.broadcast(applicant, preview.to);
        info!(
            applicant = %applicant.0,
            from = preview.from.label(),
            to = preview.to.label(),
            panels = panels_updated,
            "review status committed"
        );

        let history = self
            .audit
            .recent(self.backend.as_ref(), self.identity.role, applicant)?;

        Ok(CommitReceipt {
            applicant_id: applicant.clone(),
            previous: preview.from,
            committed: preview.to,
            badge_color: preview.to.badge_color(),
            panels_updated,
            history,
        })
    }

    pub fn recent_history(&self, applicant: &ApplicantId) -> Result<HistoryView, WorkflowError> {
        Ok(self
            .audit
            .recent(self.backend.as_ref(), self.identity.role, applicant)?)
    }

    /// Recomputed from the institution list on every call; nothing cached.
    pub fn credential_summary(
        &self,
        applicant: &ApplicantId,
    ) -> Result<CredentialSummary, WorkflowError> {
        let records = self.backend.academic_records(applicant)?;
        Ok(ranking::highest_credential(&records))
    }

    /// Save the prerequisite-notes group (notes plus faculty rating).
    pub fn save_prerequisites(
        &self,
        applicant: &ApplicantId,
        update: PrerequisiteUpdate,
    ) -> Result<(), WorkflowError> {
        self.require_editable(ReviewField::PrerequisiteNotes)?;
        if let Some(rating) = update.rating {
            validation::validate_rating(rating)?;
        }
        self.require_open(applicant)?;

        let outcome = self.backend.write_prerequisites(applicant, &update)?;
        if !outcome.success {
            return Err(WorkflowError::Rejected {
                message: outcome.message,
            });
        }
        self.store.apply_prerequisites(applicant, &update);
        Ok(())
    }

    pub fn save_scholarship(
        &self,
        applicant: &ApplicantId,
        decision: ScholarshipDecision,
    ) -> Result<(), WorkflowError> {
        self.require_editable(ReviewField::ScholarshipDecision)?;
        self.require_open(applicant)?;

        let outcome = self.backend.write_scholarship(applicant, decision)?;
        if !outcome.success {
            return Err(WorkflowError::Rejected {
                message: outcome.message,
            });
        }
        self.store.apply_scholarship(applicant, decision);
        Ok(())
    }

    /// `today` anchors the future-date check so callers (and tests) control
    /// the clock.
    pub fn save_english(
        &self,
        applicant: &ApplicantId,
        english: EnglishProficiency,
        today: NaiveDate,
    ) -> Result<(), WorkflowError> {
        self.require_editable(ReviewField::EnglishStatus)?;
        if let Some(evidence) = &english.evidence {
            validation::validate_english_evidence(evidence, today)?;
        }
        self.require_open(applicant)?;

        let outcome = self.backend.write_english(applicant, &english)?;
        if !outcome.success {
            return Err(WorkflowError::Rejected {
                message: outcome.message,
            });
        }
        self.store.apply_english(applicant, &english);
        Ok(())
    }

    pub fn save_gpa(&self, applicant: &ApplicantId, gpa_note: &str) -> Result<(), WorkflowError> {
        self.require_editable(ReviewField::OverallGpa)?;
        self.require_open(applicant)?;

        let outcome = self.backend.write_gpa(applicant, gpa_note)?;
        if !outcome.success {
            return Err(WorkflowError::Rejected {
                message: outcome.message,
            });
        }
        self.store.apply_gpa(applicant, gpa_note);
        Ok(())
    }

    /// Mount a display surface for the open applicant. Returns the status it
    /// should initially render.
    pub fn register_panel(
        &self,
        surface: SurfaceId,
        applicant: &ApplicantId,
    ) -> Result<ReviewStatus, WorkflowError> {
        let status = self
            .store
            .current_status(applicant)
            .ok_or(WorkflowError::NoActiveReview)?;
        self.panels.register(surface, applicant.clone(), status);
        Ok(status)
    }

    pub fn unregister_panel(&self, surface: &SurfaceId) {
        self.panels.unregister(surface);
    }

    pub fn panel_status(&self, surface: &SurfaceId) -> Option<ReviewStatus> {
        self.panels.shown_status(surface)
    }

    pub fn current_status(&self, applicant: &ApplicantId) -> Option<ReviewStatus> {
        self.store.current_status(applicant)
    }

    pub fn staged_preview(&self, applicant: &ApplicantId) -> Option<StatusPreview> {
        self.store.preview(applicant)
    }

    fn require_editable(&self, field: ReviewField) -> Result<(), WorkflowError> {
        if permissions::resolve(self.identity.role, field).editable {
            Ok(())
        } else {
            Err(WorkflowError::PermissionDenied {
                role: self.identity.role,
                field,
            })
        }
    }

    fn require_open(&self, applicant: &ApplicantId) -> Result<(), WorkflowError> {
        if self.store.current_status(applicant).is_some() {
            Ok(())
        } else {
            Err(WorkflowError::NoActiveReview)
        }
    }
}
