use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

/// Pipeline phases. A failure carries the stage that was being attempted, so
/// callers can tell an unparseable time from a bad recurrence rule from a
/// structurally invalid descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    TimeResolved,
    RecurrenceNormalized,
    Validated,
    Done,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Received => "received",
            Stage::TimeResolved => "time-resolved",
            Stage::RecurrenceNormalized => "recurrence-normalized",
            Stage::Validated => "validated",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileFailure {
    #[error("invalid time expression \"{expr}\": {reason}")]
    InvalidTimeExpression { expr: String, reason: String },
    #[error("invalid recurrence rule \"{expr}\": {reason}")]
    InvalidRecurrenceRule { expr: String, reason: String },
    #[error("event summary is empty")]
    EmptySummary,
    #[error("event end {end} is not after start {start}")]
    NonPositiveDuration {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("unknown time zone \"{0}\"")]
    UnknownTimeZone(String),
}

/// Every compile failure, tagged with the stage it came from. Local to one
/// invocation and always recoverable by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("compile failed at stage {stage}: {cause}")]
pub struct CompileError {
    pub stage: Stage,
    pub cause: CompileFailure,
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Soft anomalies returned alongside a successful compile. Never blocks the
/// scheduling action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileWarning {
    ExcessiveDuration {
        duration: TimeDelta,
        limit: TimeDelta,
    },
}

impl fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileWarning::ExcessiveDuration { duration, limit } => write!(
                f,
                "event runs {} hours, longer than the {} hour limit",
                duration.num_hours(),
                limit.num_hours()
            ),
        }
    }
}
