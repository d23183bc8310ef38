use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{EventKey, GradeLabel};

/// Application-level error: a message plus the process exit code.
///
/// Exit codes:
/// - `2` input, schema or configuration problems
/// - `3` no usable data after ingest
/// - `4` internal failures
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Why a single swim could not be given a tier.
///
/// These never abort a batch: the engine turns each one into a sentinel label
/// via [`GradeError::label`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GradeError {
    #[error("invalid or missing time: {0:?}")]
    InvalidTime(String),

    #[error("age {age} is above the oldest age bracket")]
    AgeOutOfRange { age: u32 },

    #[error("no age on the record and no birthdate configured")]
    AgeUnknown,

    #[error("no era covers {date}")]
    EraNotFound { date: NaiveDate },

    #[error("era {era} has no standards loaded")]
    EraNotInTable { era: String },

    #[error("{event} is not cataloged for this era, bracket and course")]
    EventNotCataloged { event: EventKey },

    #[error("{time:.2}s is slower than every listed tier for {event}")]
    NoQualifyingTier { event: EventKey, time: f64 },
}

impl GradeError {
    /// Sentinel label surfaced in place of a tier.
    pub fn label(&self) -> GradeLabel {
        match self {
            GradeError::InvalidTime(_) => GradeLabel::NoTime,
            GradeError::AgeOutOfRange { .. } => GradeLabel::Old,
            GradeError::AgeUnknown => GradeLabel::Unrated,
            GradeError::EraNotFound { .. } => GradeLabel::UnratedEra("era".to_string()),
            GradeError::EraNotInTable { era } => GradeLabel::UnratedEra(era.clone()),
            GradeError::EventNotCataloged { .. } => GradeLabel::Unrated,
            GradeError::NoQualifyingTier { .. } => GradeLabel::BelowLowest,
        }
    }
}
