use super::common::*;
use crate::review::domain::{AcademicRecord, CredentialSummary};
use crate::review::ranking::highest_credential;

#[test]
fn master_outranks_bachelor() {
    let records = vec![
        record(
            1,
            Some("Bachelor of Science"),
            Some("Mathematics"),
            Some(date(2020, 5, 1)),
            Some("3.4"),
        ),
        record(
            2,
            Some("Master of Science"),
            Some("Statistics"),
            Some(date(2022, 6, 1)),
            Some("3.8"),
        ),
    ];

    let summary = highest_credential(&records);
    assert_eq!(summary.highest_degree.as_deref(), Some("Master of Science"));
    assert_eq!(summary.degree_area.as_deref(), Some("Statistics"));
    assert_eq!(summary.gpa.as_deref(), Some("3.8"));
}

#[test]
fn equal_level_prefers_later_conferral_in_either_order() {
    let older = record(
        1,
        Some("Master of Arts"),
        Some("Economics"),
        Some(date(2021, 5, 15)),
        Some("3.5"),
    );
    let newer = record(
        2,
        Some("Master of Science"),
        Some("Data Science"),
        Some(date(2023, 5, 15)),
        Some("3.9"),
    );

    for records in [
        vec![older.clone(), newer.clone()],
        vec![newer.clone(), older.clone()],
    ] {
        let summary = highest_credential(&records);
        assert_eq!(
            summary.highest_degree.as_deref(),
            Some("Master of Science"),
            "the 2023 record wins regardless of input order"
        );
    }
}

#[test]
fn undated_tie_keeps_first_seen() {
    let records = vec![
        record(1, Some("Master of Arts"), Some("History"), None, None),
        record(2, Some("Master of Science"), Some("Physics"), None, None),
    ];

    let summary = highest_credential(&records);
    assert_eq!(summary.highest_degree.as_deref(), Some("Master of Arts"));
}

#[test]
fn dated_candidate_beats_undated_incumbent() {
    let records = vec![
        record(1, Some("Master of Arts"), Some("History"), None, None),
        record(
            2,
            Some("Master of Science"),
            Some("Physics"),
            Some(date(2019, 12, 20)),
            None,
        ),
    ];

    let summary = highest_credential(&records);
    assert_eq!(summary.highest_degree.as_deref(), Some("Master of Science"));
}

#[test]
fn phrase_matching_takes_the_highest_family() {
    // "M.B.A." contains "b.a." yet must rank as a master-level credential.
    let records = vec![
        record(1, Some("B.A. in Philosophy"), Some("Philosophy"), None, None),
        record(2, Some("M.B.A."), Some("Business Administration"), None, None),
    ];

    let summary = highest_credential(&records);
    assert_eq!(summary.highest_degree.as_deref(), Some("M.B.A."));
}

#[test]
fn doctoral_family_outranks_everything() {
    let records = vec![
        record(1, Some("Master of Science"), Some("Biology"), Some(date(2024, 5, 1)), None),
        record(
            2,
            Some("Doctor of Philosophy"),
            Some("Molecular Biology"),
            Some(date(2018, 5, 1)),
            Some("3.95"),
        ),
    ];

    let summary = highest_credential(&records);
    assert_eq!(
        summary.highest_degree.as_deref(),
        Some("Doctor of Philosophy")
    );
}

#[test]
fn unmatched_and_missing_credentials_degrade_to_all_null() {
    assert_eq!(highest_credential(&[]), CredentialSummary::default());

    let records = vec![
        record(1, None, Some("Undeclared"), None, None),
        record(2, Some(""), None, None, None),
        record(3, Some("High School"), Some("General"), Some(date(2016, 6, 1)), None),
    ];
    assert_eq!(highest_credential(&records), CredentialSummary::default());
}

#[test]
fn ranking_is_deterministic_over_copies() {
    let records = vec![
        record(1, Some("Associate of Arts"), Some("General Studies"), None, None),
        record(2, Some("Bachelor of Arts"), Some("English"), Some(date(2021, 5, 1)), None),
        record(3, Some("Graduate Certificate"), Some("Analytics"), Some(date(2022, 8, 1)), None),
    ];

    let first = highest_credential(&records);
    let second = highest_credential(&records.clone());
    assert_eq!(first, second);
    assert_eq!(first.highest_degree.as_deref(), Some("Bachelor of Arts"));
}

#[test]
fn malformed_conferral_dates_deserialize_as_absent() {
    let raw = r#"{
        "institution_number": 1,
        "credential_receive": "Master of Science",
        "program_study": "Chemistry",
        "date_confer": "June 2022",
        "gpa": "3.7"
    }"#;

    let parsed: AcademicRecord = serde_json::from_str(raw).expect("record parses");
    assert_eq!(parsed.date_confer, None);

    let summary = highest_credential(&[parsed]);
    assert_eq!(summary.highest_degree.as_deref(), Some("Master of Science"));
}
