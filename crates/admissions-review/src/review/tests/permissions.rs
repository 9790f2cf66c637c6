use crate::review::domain::Role;
use crate::review::permissions::{access_map, history_visible, resolve, ReviewField};

const ALL_ROLES: [Role; 3] = [Role::FullControl, Role::EditLimited, Role::ReadOnly];

#[test]
fn status_controls_are_never_editable_below_full_control() {
    for role in ALL_ROLES {
        let access = resolve(role, ReviewField::StatusTransition);
        assert_eq!(access.editable, matches!(role, Role::FullControl));
    }
}

#[test]
fn gpa_and_scholarship_require_full_control() {
    for field in [ReviewField::OverallGpa, ReviewField::ScholarshipDecision] {
        assert!(resolve(Role::FullControl, field).editable);
        assert!(!resolve(Role::EditLimited, field).editable);
        assert!(!resolve(Role::ReadOnly, field).editable);
    }
}

#[test]
fn note_fields_open_to_edit_limited() {
    for field in [
        ReviewField::PrerequisiteNotes,
        ReviewField::RatingComments,
        ReviewField::EnglishStatus,
    ] {
        assert!(resolve(Role::FullControl, field).editable);
        assert!(resolve(Role::EditLimited, field).editable);
        assert!(!resolve(Role::ReadOnly, field).editable);
    }
}

#[test]
fn every_field_is_visible_to_every_role() {
    for role in ALL_ROLES {
        for field in ReviewField::ALL {
            assert!(
                resolve(role, field).visible,
                "{field:?} must stay visible for {role:?}"
            );
        }
    }
}

#[test]
fn history_is_withheld_only_from_read_only() {
    assert!(history_visible(Role::FullControl));
    assert!(history_visible(Role::EditLimited));
    assert!(!history_visible(Role::ReadOnly));
}

#[test]
fn access_map_covers_every_gated_field() {
    let map = access_map(Role::EditLimited);
    assert_eq!(map.len(), ReviewField::ALL.len());
    for field in ReviewField::ALL {
        assert!(map.iter().any(|(mapped, _)| *mapped == field));
    }
}
