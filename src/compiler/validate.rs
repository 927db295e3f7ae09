use chrono::{DateTime, TimeDelta, Utc};

use crate::compiler::error::{CompileFailure, CompileWarning};
use crate::compiler::time;
use crate::models::event::{CandidateEvent, ResolvedEvent};
use crate::models::recurrence::RecurrenceRule;

/// Final structural checks over the resolved pieces. Hard problems fail;
/// an over-long one-off event only earns a warning so the caller can still
/// schedule it.
pub fn validate(
    candidate: &CandidateEvent,
    time_zone: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    rules: Vec<RecurrenceRule>,
    max_duration: TimeDelta,
) -> Result<(ResolvedEvent, Vec<CompileWarning>), CompileFailure> {
    let summary = candidate.summary.trim();
    if summary.is_empty() {
        return Err(CompileFailure::EmptySummary);
    }

    // The pipeline already needed the zone to resolve times, but validation
    // must stand on its own.
    time::parse_zone(time_zone)?;

    if end <= start {
        return Err(CompileFailure::NonPositiveDuration { start, end });
    }

    let mut warnings = Vec::new();
    let duration = end - start;
    if rules.is_empty() && duration > max_duration {
        warnings.push(CompileWarning::ExcessiveDuration {
            duration,
            limit: max_duration,
        });
    }

    let description = candidate
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    let event = ResolvedEvent {
        summary: summary.to_string(),
        description,
        start_instant: start,
        end_instant: end,
        time_zone: time_zone.to_string(),
        recurrence_rules: rules,
    };
    Ok((event, warnings))
}
