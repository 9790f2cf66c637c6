//! Role resolution: the layer consumes an already-authenticated session and
//! only cares about the reviewer's name and capability level.

use super::backend::{ReviewBackend, SessionInfo};
use super::domain::Role;
use super::service::WorkflowError;

/// The acting reviewer for the lifetime of one review session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewerIdentity {
    pub name: String,
    pub role: Role,
}

pub fn resolve_identity<B: ReviewBackend>(backend: &B) -> Result<ReviewerIdentity, WorkflowError> {
    match backend.resolve_session()? {
        SessionInfo {
            authenticated: true,
            user: Some(user),
        } => Ok(ReviewerIdentity {
            name: user.display_name,
            role: user.role,
        }),
        _ => Err(WorkflowError::Unauthenticated),
    }
}
