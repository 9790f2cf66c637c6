//! Credential ranking: derive one "highest degree" summary from an
//! applicant's heterogeneous institution history.
//!
//! Pure and deterministic, with no side effects or external calls. The
//! caller recomputes the summary on every load rather than caching it.

mod hierarchy;

use super::domain::{AcademicRecord, CredentialSummary};

/// Scan records in input order and keep the best-ranked credential.
///
/// Equal-level ties prefer the later conferral date; a dated candidate beats
/// an undated incumbent; two undated records keep the earlier-scanned one.
/// Empty input, all-null credentials, and absent dates all degrade to the
/// all-null summary.
pub fn highest_credential(records: &[AcademicRecord]) -> CredentialSummary {
    let mut best_level = 0u8;
    let mut selected: Option<&AcademicRecord> = None;

    for record in records {
        let Some(credential) = record.credential_receive.as_deref() else {
            continue;
        };
        if credential.trim().is_empty() {
            continue;
        }

        let level = hierarchy::credential_level(credential);
        if level == 0 {
            continue;
        }

        if level > best_level {
            best_level = level;
            selected = Some(record);
            continue;
        }

        if level == best_level {
            if let Some(incumbent) = selected {
                let candidate_wins = match (record.date_confer, incumbent.date_confer) {
                    (Some(candidate), Some(held)) => candidate > held,
                    (Some(_), None) => true,
                    // Neither side has a date: input order decides, the
                    // incumbent stays.
                    _ => false,
                };
                if candidate_wins {
                    selected = Some(record);
                }
            }
        }
    }

    match selected {
        Some(record) => CredentialSummary {
            highest_degree: record.credential_receive.clone(),
            degree_area: record.program_study.clone(),
            gpa: record.gpa.clone(),
        },
        None => CredentialSummary::default(),
    }
}
