use admissions_review::review::{
    AcademicRecord, ApplicantId, BackendError, EnglishProficiency, PrerequisiteUpdate,
    ReviewBackend, ReviewSnapshot, ReviewStatus, Role, ScholarshipDecision, SessionInfo,
    SessionUser, StatusChangeEvent, WriteOutcome,
};
use chrono::{NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// In-memory stand-in for the student records, session, and audit
/// collaborators. Serves local runs, demos, and tests; production deploys
/// swap in the HTTP adapter.
#[derive(Default)]
pub(crate) struct InMemoryReviewBackend {
    session: Mutex<Option<SessionInfo>>,
    reviews: Mutex<HashMap<ApplicantId, ReviewSnapshot>>,
    records: Mutex<HashMap<ApplicantId, Vec<AcademicRecord>>>,
    events: Mutex<HashMap<ApplicantId, Vec<StatusChangeEvent>>>,
}

impl InMemoryReviewBackend {
    pub(crate) fn with_session(name: &str, role: Role) -> Self {
        let backend = Self::default();
        *backend.session.lock().expect("session mutex poisoned") = Some(SessionInfo {
            authenticated: true,
            user: Some(SessionUser {
                display_name: name.to_string(),
                role,
            }),
        });
        backend
    }

    pub(crate) fn seed_applicant(
        &self,
        id: ApplicantId,
        snapshot: ReviewSnapshot,
        records: Vec<AcademicRecord>,
    ) {
        self.reviews
            .lock()
            .expect("review mutex poisoned")
            .insert(id.clone(), snapshot);
        self.records
            .lock()
            .expect("records mutex poisoned")
            .insert(id, records);
    }
}

impl ReviewBackend for InMemoryReviewBackend {
    fn resolve_session(&self) -> Result<SessionInfo, BackendError> {
        self.session
            .lock()
            .expect("session mutex poisoned")
            .clone()
            .ok_or_else(|| BackendError::Transport("session service offline".to_string()))
    }

    fn fetch_review(&self, applicant: &ApplicantId) -> Result<ReviewSnapshot, BackendError> {
        self.reviews
            .lock()
            .expect("review mutex poisoned")
            .get(applicant)
            .cloned()
            .ok_or(BackendError::UnknownApplicant)
    }

    fn academic_records(
        &self,
        applicant: &ApplicantId,
    ) -> Result<Vec<AcademicRecord>, BackendError> {
        Ok(self
            .records
            .lock()
            .expect("records mutex poisoned")
            .get(applicant)
            .cloned()
            .unwrap_or_default())
    }

    fn write_status(
        &self,
        applicant: &ApplicantId,
        status: ReviewStatus,
        actor: &str,
    ) -> Result<WriteOutcome, BackendError> {
        let mut reviews = self.reviews.lock().expect("review mutex poisoned");
        let snapshot = reviews
            .get_mut(applicant)
            .ok_or(BackendError::UnknownApplicant)?;
        let old_value = snapshot.status;
        snapshot.status = status;

        self.events
            .lock()
            .expect("events mutex poisoned")
            .entry(applicant.clone())
            .or_default()
            .push(StatusChangeEvent {
                applicant_id: applicant.clone(),
                actor_name: actor.to_string(),
                old_value,
                new_value: status,
                created_at: Utc::now(),
            });

        Ok(WriteOutcome::accepted())
    }

    fn write_prerequisites(
        &self,
        applicant: &ApplicantId,
        update: &PrerequisiteUpdate,
    ) -> Result<WriteOutcome, BackendError> {
        let mut reviews = self.reviews.lock().expect("review mutex poisoned");
        let snapshot = reviews
            .get_mut(applicant)
            .ok_or(BackendError::UnknownApplicant)?;
        snapshot.prerequisites = update.notes.clone();
        snapshot.rating = update.rating;
        Ok(WriteOutcome::accepted())
    }

    fn write_scholarship(
        &self,
        applicant: &ApplicantId,
        decision: ScholarshipDecision,
    ) -> Result<WriteOutcome, BackendError> {
        let mut reviews = self.reviews.lock().expect("review mutex poisoned");
        let snapshot = reviews
            .get_mut(applicant)
            .ok_or(BackendError::UnknownApplicant)?;
        snapshot.scholarship = decision;
        Ok(WriteOutcome::accepted())
    }

    fn write_english(
        &self,
        applicant: &ApplicantId,
        english: &EnglishProficiency,
    ) -> Result<WriteOutcome, BackendError> {
        let mut reviews = self.reviews.lock().expect("review mutex poisoned");
        let snapshot = reviews
            .get_mut(applicant)
            .ok_or(BackendError::UnknownApplicant)?;
        snapshot.english = english.clone();
        Ok(WriteOutcome::accepted())
    }

    fn write_gpa(
        &self,
        applicant: &ApplicantId,
        gpa_note: &str,
    ) -> Result<WriteOutcome, BackendError> {
        let mut reviews = self.reviews.lock().expect("review mutex poisoned");
        let snapshot = reviews
            .get_mut(applicant)
            .ok_or(BackendError::UnknownApplicant)?;
        snapshot.gpa_note = Some(gpa_note.to_string());
        Ok(WriteOutcome::accepted())
    }

    fn recent_events(
        &self,
        applicant: &ApplicantId,
        limit: usize,
    ) -> Result<Vec<StatusChangeEvent>, BackendError> {
        let mut events = self
            .events
            .lock()
            .expect("events mutex poisoned")
            .get(applicant)
            .cloned()
            .unwrap_or_default();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        events.truncate(limit);
        Ok(events)
    }
}

/// One seeded applicant so `serve` and `demo` have something to review.
pub(crate) fn seeded_backend(name: &str, role: Role) -> InMemoryReviewBackend {
    let backend = InMemoryReviewBackend::with_session(name, role);
    backend.seed_applicant(
        ApplicantId("GR-2026-0117".to_string()),
        ReviewSnapshot::default(),
        vec![
            AcademicRecord {
                institution_number: 1,
                credential_receive: Some("Bachelor of Science".to_string()),
                program_study: Some("Computer Science".to_string()),
                date_confer: NaiveDate::from_ymd_opt(2020, 5, 1),
                gpa: Some("3.4".to_string()),
            },
            AcademicRecord {
                institution_number: 2,
                credential_receive: Some("Master of Science".to_string()),
                program_study: Some("Machine Learning".to_string()),
                date_confer: NaiveDate::from_ymd_opt(2022, 6, 1),
                gpa: Some("3.8".to_string()),
            },
        ],
    );
    backend
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
