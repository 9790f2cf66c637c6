use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for applicant records. Everything else is keyed by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicantId(pub String);

/// Where an applicant sits in the human review pipeline.
///
/// The set is closed and deliberately unordered: any status may transition to
/// any other, and there is no terminal state. Serialized by operator-facing
/// label so the wire form matches what reviewers see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewStatus {
    #[default]
    NotReviewed,
    ReviewedByPpa,
    NeedJeffsReview,
    NeedKhaladsReview,
    Waitlist,
    Declined,
    SendOfferToCogs,
    OfferSentToCogs,
    OfferSentToStudent,
    OfferAccepted,
    OfferDeclined,
}

impl ReviewStatus {
    /// Presentation order for operators. No semantic ordering implied.
    pub const ALL: [ReviewStatus; 11] = [
        ReviewStatus::NotReviewed,
        ReviewStatus::ReviewedByPpa,
        ReviewStatus::NeedJeffsReview,
        ReviewStatus::NeedKhaladsReview,
        ReviewStatus::Waitlist,
        ReviewStatus::Declined,
        ReviewStatus::SendOfferToCogs,
        ReviewStatus::OfferSentToCogs,
        ReviewStatus::OfferSentToStudent,
        ReviewStatus::OfferAccepted,
        ReviewStatus::OfferDeclined,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ReviewStatus::NotReviewed => "Not Reviewed",
            ReviewStatus::ReviewedByPpa => "Reviewed by PPA",
            ReviewStatus::NeedJeffsReview => "Need Jeff's Review",
            ReviewStatus::NeedKhaladsReview => "Need Khalad's Review",
            ReviewStatus::Waitlist => "Waitlist",
            ReviewStatus::Declined => "Declined",
            ReviewStatus::SendOfferToCogs => "Send Offer to CoGS",
            ReviewStatus::OfferSentToCogs => "Offer Sent to CoGS",
            ReviewStatus::OfferSentToStudent => "Offer Sent to Student",
            ReviewStatus::OfferAccepted => "Offer Accepted",
            ReviewStatus::OfferDeclined => "Offer Declined",
        }
    }

    /// Fill color for the status badge surface.
    pub const fn badge_color(self) -> &'static str {
        match self {
            ReviewStatus::NotReviewed => "#9e9e9e",
            ReviewStatus::ReviewedByPpa => "#2196f3",
            ReviewStatus::NeedJeffsReview => "#ff9800",
            ReviewStatus::NeedKhaladsReview => "#ff5722",
            ReviewStatus::Waitlist => "#795548",
            ReviewStatus::Declined => "#f44336",
            ReviewStatus::SendOfferToCogs => "#00bcd4",
            ReviewStatus::OfferSentToCogs => "#03a9f4",
            ReviewStatus::OfferSentToStudent => "#3f51b5",
            ReviewStatus::OfferAccepted => "#4caf50",
            ReviewStatus::OfferDeclined => "#9c27b0",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl Serialize for ReviewStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ReviewStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        ReviewStatus::from_label(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown review status '{raw}'")))
    }
}

/// Capability level supplied by the session collaborator. Immutable for the
/// lifetime of one review session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    FullControl,
    EditLimited,
    ReadOnly,
}

/// Scholarship recommendation recorded alongside the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScholarshipDecision {
    Yes,
    No,
    #[default]
    Undecided,
}

/// Free-text prerequisite notes: three subject fields plus general comments.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PrerequisiteNotes {
    #[serde(default)]
    pub calculus: Option<String>,
    #[serde(default)]
    pub statistics: Option<String>,
    #[serde(default)]
    pub programming: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
}

/// One save group: prerequisite notes travel with the faculty rating.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PrerequisiteUpdate {
    #[serde(default)]
    pub notes: PrerequisiteNotes,
    #[serde(default)]
    pub rating: Option<f32>,
}

/// English-proficiency sub-status shown inside the review surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnglishStatus {
    #[default]
    Pending,
    Satisfied,
    Waived,
}

/// A proficiency test result backing the English sub-status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "test", rename_all = "snake_case")]
pub enum EnglishTest {
    Duolingo { score: u16 },
    ToeflIbt { score: u16 },
    Ielts { band: f32 },
}

impl EnglishTest {
    pub const fn name(self) -> &'static str {
        match self {
            EnglishTest::Duolingo { .. } => "Duolingo",
            EnglishTest::ToeflIbt { .. } => "TOEFL iBT",
            EnglishTest::Ielts { .. } => "IELTS",
        }
    }
}

/// Evidence attached to the English sub-status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnglishEvidence {
    #[serde(flatten)]
    pub test: EnglishTest,
    pub taken_on: NaiveDate,
}

/// English sub-status plus whatever evidence the applicant supplied.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnglishProficiency {
    pub status: EnglishStatus,
    #[serde(default)]
    pub evidence: Option<EnglishEvidence>,
}

/// The mutable review fields that travel with the status. One applicant's
/// worth of these is held by the store while their surface is open.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReviewSnapshot {
    pub status: ReviewStatus,
    #[serde(default)]
    pub prerequisites: PrerequisiteNotes,
    #[serde(default)]
    pub scholarship: ScholarshipDecision,
    #[serde(default)]
    pub english: EnglishProficiency,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub gpa_note: Option<String>,
}

/// Immutable audit record created by the external store once per successful
/// commit. This layer only ever reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChangeEvent {
    pub applicant_id: ApplicantId,
    pub actor_name: String,
    pub old_value: ReviewStatus,
    pub new_value: ReviewStatus,
    pub created_at: DateTime<Utc>,
}

/// One entry in an applicant's institution history. Read-only input to the
/// credential ranking engine; a malformed conferral date degrades to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicRecord {
    pub institution_number: u32,
    #[serde(default)]
    pub credential_receive: Option<String>,
    #[serde(default)]
    pub program_study: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub date_confer: Option<NaiveDate>,
    #[serde(default)]
    pub gpa: Option<String>,
}

/// Derived best-credential summary. Recomputed on every load, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CredentialSummary {
    pub highest_degree: Option<String>,
    pub degree_area: Option<String>,
    pub gpa: Option<String>,
}

/// Conferral dates arrive as free text from the records service. Anything
/// that does not parse as YYYY-MM-DD is treated as absent, not as an error.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()))
}
