use serde::{Deserialize, Serialize};

use super::domain::{
    AcademicRecord, ApplicantId, EnglishProficiency, PrerequisiteUpdate, ReviewSnapshot,
    ReviewStatus, Role, ScholarshipDecision, StatusChangeEvent,
};

/// Shared envelope returned by every collaborator write call. `success=false`
/// is a recoverable, user-visible rejection, not an exception.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOutcome {
    pub success: bool,
    pub message: String,
}

impl WriteOutcome {
    pub fn accepted() -> Self {
        Self {
            success: true,
            message: "saved".to_string(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Resolved session payload from the authentication collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<SessionUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub display_name: String,
    pub role: Role,
}

/// Failures below the business level: the collaborator could not be reached
/// or does not know the applicant at all.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("records service unreachable: {0}")]
    Transport(String),
    #[error("applicant not found")]
    UnknownApplicant,
}

/// The consumed collaborator surface. The coordination layer never touches
/// storage directly; hosts supply an implementation (HTTP adapter in
/// production, in-memory fakes in tests and demos).
pub trait ReviewBackend: Send + Sync {
    fn resolve_session(&self) -> Result<SessionInfo, BackendError>;

    fn fetch_review(&self, applicant: &ApplicantId) -> Result<ReviewSnapshot, BackendError>;

    fn academic_records(&self, applicant: &ApplicantId)
        -> Result<Vec<AcademicRecord>, BackendError>;

    /// Persist a status change. The external store is what appends the audit
    /// event; `actor` names the reviewer for that record.
    fn write_status(
        &self,
        applicant: &ApplicantId,
        status: ReviewStatus,
        actor: &str,
    ) -> Result<WriteOutcome, BackendError>;

    fn write_prerequisites(
        &self,
        applicant: &ApplicantId,
        update: &PrerequisiteUpdate,
    ) -> Result<WriteOutcome, BackendError>;

    fn write_scholarship(
        &self,
        applicant: &ApplicantId,
        decision: ScholarshipDecision,
    ) -> Result<WriteOutcome, BackendError>;

    fn write_english(
        &self,
        applicant: &ApplicantId,
        english: &EnglishProficiency,
    ) -> Result<WriteOutcome, BackendError>;

    fn write_gpa(&self, applicant: &ApplicantId, gpa_note: &str)
        -> Result<WriteOutcome, BackendError>;

    /// Most-recent-first change history, bounded by `limit`.
    fn recent_events(
        &self,
        applicant: &ApplicantId,
        limit: usize,
    ) -> Result<Vec<StatusChangeEvent>, BackendError>;
}
