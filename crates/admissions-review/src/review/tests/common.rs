use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::review::backend::{
    BackendError, ReviewBackend, SessionInfo, SessionUser, WriteOutcome,
};
use crate::review::domain::{
    AcademicRecord, ApplicantId, EnglishProficiency, PrerequisiteUpdate, ReviewSnapshot,
    ReviewStatus, Role, ScholarshipDecision, StatusChangeEvent,
};
use crate::review::service::ReviewWorkflowService;

pub(super) fn applicant() -> ApplicantId {
    ApplicantId("GR-2026-0117".to_string())
}

pub(super) fn other_applicant() -> ApplicantId {
    ApplicantId("GR-2026-0442".to_string())
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn record(
    institution_number: u32,
    credential: Option<&str>,
    program: Option<&str>,
    conferred: Option<NaiveDate>,
    gpa: Option<&str>,
) -> AcademicRecord {
    AcademicRecord {
        institution_number,
        credential_receive: credential.map(str::to_string),
        program_study: program.map(str::to_string),
        date_confer: conferred,
        gpa: gpa.map(str::to_string),
    }
}

pub(super) fn seeded_event(
    id: &ApplicantId,
    old_value: ReviewStatus,
    new_value: ReviewStatus,
    minutes_ago: i64,
) -> StatusChangeEvent {
    StatusChangeEvent {
        applicant_id: id.clone(),
        actor_name: "Priya Raman".to_string(),
        old_value,
        new_value,
        created_at: Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap()
            - chrono::Duration::minutes(minutes_ago),
    }
}

/// In-memory collaborator standing in for the records, session, and audit
/// services. Failure modes are toggles so one test can flip between a
/// healthy and a failing collaborator mid-flight.
#[derive(Default)]
pub(super) struct MemoryBackend {
    session: Mutex<Option<SessionInfo>>,
    reviews: Mutex<HashMap<ApplicantId, ReviewSnapshot>>,
    records: Mutex<HashMap<ApplicantId, Vec<AcademicRecord>>>,
    events: Mutex<HashMap<ApplicantId, Vec<StatusChangeEvent>>>,
    rejection: Mutex<Option<String>>,
    offline: AtomicBool,
    status_write_calls: AtomicUsize,
    history_reads: AtomicUsize,
    review_fetches: AtomicUsize,
}

impl MemoryBackend {
    pub(super) fn with_role(role: Role) -> Self {
        let backend = Self::default();
        backend.set_session(SessionInfo {
            authenticated: true,
            user: Some(SessionUser {
                display_name: "Morgan Wells".to_string(),
                role,
            }),
        });
        backend
    }

    pub(super) fn set_session(&self, session: SessionInfo) {
        *self.session.lock().expect("session mutex poisoned") = Some(session);
    }

    pub(super) fn seed_review(&self, id: ApplicantId, snapshot: ReviewSnapshot) {
        self.reviews
            .lock()
            .expect("review mutex poisoned")
            .insert(id, snapshot);
    }

    pub(super) fn seed_records(&self, id: ApplicantId, records: Vec<AcademicRecord>) {
        self.records
            .lock()
            .expect("records mutex poisoned")
            .insert(id, records);
    }

    pub(super) fn seed_events(&self, id: ApplicantId, events: Vec<StatusChangeEvent>) {
        self.events
            .lock()
            .expect("events mutex poisoned")
            .insert(id, events);
    }

    pub(super) fn set_rejection(&self, message: Option<&str>) {
        *self.rejection.lock().expect("rejection mutex poisoned") =
            message.map(str::to_string);
    }

    pub(super) fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub(super) fn status_write_calls(&self) -> usize {
        self.status_write_calls.load(Ordering::SeqCst)
    }

    pub(super) fn history_reads(&self) -> usize {
        self.history_reads.load(Ordering::SeqCst)
    }

    pub(super) fn review_fetches(&self) -> usize {
        self.review_fetches.load(Ordering::SeqCst)
    }

    pub(super) fn stored_status(&self, id: &ApplicantId) -> Option<ReviewStatus> {
        self.reviews
            .lock()
            .expect("review mutex poisoned")
            .get(id)
            .map(|snapshot| snapshot.status)
    }

    pub(super) fn stored_events(&self, id: &ApplicantId) -> Vec<StatusChangeEvent> {
        self.events
            .lock()
            .expect("events mutex poisoned")
            .get(id)
            .cloned()
            .unwrap_or_default()
    }

    fn check_offline(&self) -> Result<(), BackendError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(BackendError::Transport("records service offline".to_string()));
        }
        Ok(())
    }

    fn check_rejection(&self) -> Option<WriteOutcome> {
        self.rejection
            .lock()
            .expect("rejection mutex poisoned")
            .as_ref()
            .map(|message| WriteOutcome::rejected(message.clone()))
    }
}

impl ReviewBackend for MemoryBackend {
    fn resolve_session(&self) -> Result<SessionInfo, BackendError> {
        self.check_offline()?;
        self.session
            .lock()
            .expect("session mutex poisoned")
            .clone()
            .ok_or_else(|| BackendError::Transport("session service offline".to_string()))
    }

    fn fetch_review(&self, applicant: &ApplicantId) -> Result<ReviewSnapshot, BackendError> {
        self.check_offline()?;
        self.review_fetches.fetch_add(1, Ordering::SeqCst);
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
        self.check_offline()?;
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
        self.status_write_calls.fetch_add(1, Ordering::SeqCst);
        self.check_offline()?;
        if let Some(outcome) = self.check_rejection() {
            return Ok(outcome);
        }

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
        self.check_offline()?;
        if let Some(outcome) = self.check_rejection() {
            return Ok(outcome);
        }
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
        self.check_offline()?;
        if let Some(outcome) = self.check_rejection() {
            return Ok(outcome);
        }
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
        self.check_offline()?;
        if let Some(outcome) = self.check_rejection() {
            return Ok(outcome);
        }
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
        self.check_offline()?;
        if let Some(outcome) = self.check_rejection() {
            return Ok(outcome);
        }
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
        self.check_offline()?;
        self.history_reads.fetch_add(1, Ordering::SeqCst);
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

/// Service over a seeded backend with one loadable applicant.
pub(super) fn open_service(
    role: Role,
) -> (Arc<ReviewWorkflowService<MemoryBackend>>, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::with_role(role));
    backend.seed_review(applicant(), ReviewSnapshot::default());
    backend.seed_records(
        applicant(),
        vec![
            record(
                1,
                Some("Bachelor of Arts"),
                Some("Linguistics"),
                Some(date(2019, 5, 18)),
                Some("3.2"),
            ),
            record(
                2,
                Some("Master of Science"),
                Some("Applied Linguistics"),
                Some(date(2021, 6, 12)),
                Some("3.7"),
            ),
        ],
    );
    let service = Arc::new(
        ReviewWorkflowService::connect(backend.clone(), 5).expect("session resolves"),
    );
    (service, backend)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
