//! Role-to-capability mapping, collapsed into one place so every component
//! consults the same rules instead of scattering role checks.

use serde::Serialize;

use super::domain::Role;

/// The gated controls on the review surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewField {
    StatusTransition,
    OverallGpa,
    ScholarshipDecision,
    PrerequisiteNotes,
    RatingComments,
    EnglishStatus,
}

impl ReviewField {
    pub const ALL: [ReviewField; 6] = [
        ReviewField::StatusTransition,
        ReviewField::OverallGpa,
        ReviewField::ScholarshipDecision,
        ReviewField::PrerequisiteNotes,
        ReviewField::RatingComments,
        ReviewField::EnglishStatus,
    ];
}

/// What one role may do with one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldAccess {
    pub visible: bool,
    pub editable: bool,
}

/// Pure resolution of `(role, field)` to an access pair. Callers re-evaluate
/// on every role or tab change; nothing here is cached.
///
/// Status transitions, GPA edits, and scholarship decisions require full
/// control. Prerequisite, rating/comment, and English sub-status fields are
/// editable down to the edit-limited role. Every field stays visible to every
/// authenticated role; only the edit affordance is withheld.
pub const fn resolve(role: Role, field: ReviewField) -> FieldAccess {
    let editable = match field {
        ReviewField::StatusTransition
        | ReviewField::OverallGpa
        | ReviewField::ScholarshipDecision => matches!(role, Role::FullControl),
        ReviewField::PrerequisiteNotes
        | ReviewField::RatingComments
        | ReviewField::EnglishStatus => {
            matches!(role, Role::FullControl | Role::EditLimited)
        }
    };

    FieldAccess {
        visible: true,
        editable,
    }
}

/// The one visibility exception: the audit history panel is withheld from
/// read-only reviewers entirely, so a capability error never leaks to them.
pub const fn history_visible(role: Role) -> bool {
    !matches!(role, Role::ReadOnly)
}

/// Access for every gated field, for handing the whole surface to a caller.
pub fn access_map(role: Role) -> Vec<(ReviewField, FieldAccess)> {
    ReviewField::ALL
        .into_iter()
        .map(|field| (field, resolve(role, field)))
        .collect()
}
