use super::common::*;
use crate::review::domain::{ReviewSnapshot, ReviewStatus, ScholarshipDecision};
use crate::review::store::{IngestOutcome, ReviewStateStore};

fn loaded_store() -> ReviewStateStore {
    let store = ReviewStateStore::default();
    store.begin_load(applicant());
    store.ingest_snapshot(&applicant(), ReviewSnapshot::default());
    store
}

#[test]
fn load_replaces_the_previous_surface() {
    let store = loaded_store();
    assert_eq!(store.active_applicant(), Some(applicant()));

    store.begin_load(other_applicant());
    assert_eq!(store.active_applicant(), Some(other_applicant()));
    assert_eq!(store.current_status(&applicant()), None);
}

#[test]
fn stale_snapshot_for_previous_applicant_is_discarded() {
    let store = ReviewStateStore::default();
    store.begin_load(applicant());
    store.begin_load(other_applicant());

    // The read for the first applicant resolves late.
    let outcome = store.ingest_snapshot(&applicant(), ReviewSnapshot::default());
    assert_eq!(outcome, IngestOutcome::DiscardedStale);
    assert_eq!(store.current_status(&other_applicant()), None);
    assert_eq!(store.current_status(&applicant()), None);
}

#[test]
fn preview_requires_a_loaded_snapshot() {
    let store = ReviewStateStore::default();
    store.begin_load(applicant());
    store.set_pending(&applicant(), ReviewStatus::Waitlist);
    assert_eq!(store.preview(&applicant()), None);

    store.ingest_snapshot(&applicant(), ReviewSnapshot::default());
    store.set_pending(&applicant(), ReviewStatus::Waitlist);
    let preview = store.preview(&applicant()).expect("preview staged");
    assert_eq!(preview.from, ReviewStatus::NotReviewed);
    assert_eq!(preview.to, ReviewStatus::Waitlist);
}

#[test]
fn apply_committed_adopts_the_accepted_value_and_clears_pending() {
    let store = loaded_store();
    store.set_pending(&applicant(), ReviewStatus::ReviewedByPpa);

    let outcome = store.apply_committed(&applicant(), ReviewStatus::ReviewedByPpa);
    assert_eq!(outcome, IngestOutcome::Applied);
    assert_eq!(
        store.current_status(&applicant()),
        Some(ReviewStatus::ReviewedByPpa)
    );
    assert_eq!(store.preview(&applicant()), None);
}

#[test]
fn field_results_for_another_applicant_are_dropped() {
    let store = loaded_store();

    let outcome = store.apply_scholarship(&other_applicant(), ScholarshipDecision::Yes);
    assert_eq!(outcome, IngestOutcome::DiscardedStale);

    let snapshot = store.snapshot(&applicant()).expect("surface loaded");
    assert_eq!(snapshot.scholarship, ScholarshipDecision::Undecided);
}

#[test]
fn close_discards_everything() {
    let store = loaded_store();
    store.close();
    assert_eq!(store.active_applicant(), None);
    assert_eq!(store.current_status(&applicant()), None);
}
