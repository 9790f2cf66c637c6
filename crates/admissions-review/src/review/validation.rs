//! Client-side validation: rejected before any collaborator call is made, so
//! no state mutation is ever attempted for these failures.

use chrono::NaiveDate;

use super::domain::{EnglishEvidence, EnglishTest};

pub const RATING_MIN: f32 = 0.0;
pub const RATING_MAX: f32 = 10.0;

/// Published score bands per test.
pub const DUOLINGO_BAND: (f64, f64) = (10.0, 160.0);
pub const TOEFL_IBT_BAND: (f64, f64) = (0.0, 120.0);
pub const IELTS_BAND: (f64, f64) = (0.0, 9.0);

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("rating {0} is outside the {RATING_MIN}-{RATING_MAX} scale")]
    RatingOutOfRange(f32),
    #[error("rating {0} carries more than one decimal place")]
    RatingPrecision(f32),
    #[error("{test} score {score} is outside the {min}-{max} band")]
    ScoreOutOfRange {
        test: &'static str,
        score: f64,
        min: f64,
        max: f64,
    },
    #[error("IELTS band {0} must fall on a half-band step")]
    IeltsHalfBand(f32),
    #[error("evidence date {0} is in the future")]
    EvidenceDateInFuture(NaiveDate),
}

/// Faculty ratings use a 0.0-10.0 scale with at most one decimal place.
pub fn validate_rating(rating: f32) -> Result<(), ValidationError> {
    if !(RATING_MIN..=RATING_MAX).contains(&rating) {
        return Err(ValidationError::RatingOutOfRange(rating));
    }

    let scaled = f64::from(rating) * 10.0;
    if (scaled - scaled.round()).abs() > 1e-3 {
        return Err(ValidationError::RatingPrecision(rating));
    }

    Ok(())
}

/// A future-dated evidence date is rejected regardless of score validity, so
/// the date check runs first.
pub fn validate_english_evidence(
    evidence: &EnglishEvidence,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    if evidence.taken_on > today {
        return Err(ValidationError::EvidenceDateInFuture(evidence.taken_on));
    }

    match evidence.test {
        EnglishTest::Duolingo { score } => {
            check_band(evidence.test.name(), f64::from(score), DUOLINGO_BAND)
        }
        EnglishTest::ToeflIbt { score } => {
            check_band(evidence.test.name(), f64::from(score), TOEFL_IBT_BAND)
        }
        EnglishTest::Ielts { band } => {
            check_band(evidence.test.name(), f64::from(band), IELTS_BAND)?;
            let doubled = f64::from(band) * 2.0;
            if (doubled - doubled.round()).abs() > 1e-3 {
                return Err(ValidationError::IeltsHalfBand(band));
            }
            Ok(())
        }
    }
}

fn check_band(test: &'static str, score: f64, (min, max): (f64, f64)) -> Result<(), ValidationError> {
    if score < min || score > max {
        return Err(ValidationError::ScoreOutOfRange {
            test,
            score,
            min,
            max,
        });
    }
    Ok(())
}
