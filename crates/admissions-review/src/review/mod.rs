//! Review workflow coordination for one open applicant.
//!
//! The module tree mirrors the moving parts of the review surface: `domain`
//! holds the shared types, `ranking` derives the highest-credential summary,
//! `permissions` gates fields by role, `store` owns the in-memory copy of the
//! applicant's review fields, `transition` is the propose/commit state
//! machine, `audit` reads the change history, and `sync` rewrites every panel
//! that displays the status after a commit. External collaborators sit
//! behind the [`ReviewBackend`] trait in `backend`.

pub mod audit;
pub mod backend;
pub mod domain;
pub mod permissions;
pub mod ranking;
pub mod router;
pub mod service;
pub mod session;
pub mod store;
pub mod sync;
pub mod transition;
pub mod validation;

#[cfg(test)]
mod tests;

pub use audit::{AuditTrail, HistoryView};
pub use backend::{BackendError, ReviewBackend, SessionInfo, SessionUser, WriteOutcome};
pub use domain::{
    AcademicRecord, ApplicantId, CredentialSummary, EnglishEvidence, EnglishProficiency,
    EnglishStatus, EnglishTest, PrerequisiteNotes, PrerequisiteUpdate, ReviewSnapshot,
    ReviewStatus, Role, ScholarshipDecision, StatusChangeEvent,
};
pub use permissions::{FieldAccess, ReviewField};
pub use ranking::highest_credential;
pub use router::review_router;
pub use service::{CommitReceipt, ReviewSurface, ReviewWorkflowService, WorkflowError};
pub use session::ReviewerIdentity;
pub use store::ReviewStateStore;
pub use sync::{PanelRegistry, SurfaceId};
pub use transition::{StatusPreview, StatusProposal};
pub use validation::ValidationError;
