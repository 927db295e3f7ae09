pub mod error;
pub mod recurrence;
pub mod time;
pub mod validate;

pub use error::{CompileError, CompileFailure, CompileResult, CompileWarning, Stage};

use chrono::TimeDelta;

use crate::models::event::{CandidateEvent, ResolvedEvent, SchedulingRequest};

#[derive(Debug, Clone)]
pub struct CompilerOptions {
    pub max_duration: TimeDelta,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            max_duration: TimeDelta::hours(24),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompileOutput {
    pub event: ResolvedEvent,
    pub warnings: Vec<CompileWarning>,
}

pub fn compile(
    request: &SchedulingRequest,
    candidate: &CandidateEvent,
) -> CompileResult<CompileOutput> {
    compile_with(request, candidate, &CompilerOptions::default())
}

/// Runs the candidate through the linear pipeline
/// Received -> TimeResolved -> RecurrenceNormalized -> Validated -> Done.
/// Pure and synchronous; every failure is tagged with the stage that was
/// being attempted.
pub fn compile_with(
    request: &SchedulingRequest,
    candidate: &CandidateEvent,
    options: &CompilerOptions,
) -> CompileResult<CompileOutput> {
    let zone = effective_zone(request, candidate);

    let start = time::resolve(&candidate.start_expr, request.reference_instant, zone)
        .map_err(|cause| fail(Stage::TimeResolved, cause))?;
    let end = time::resolve(&candidate.end_expr, request.reference_instant, zone)
        .map_err(|cause| fail(Stage::TimeResolved, cause))?;

    let rules = recurrence::normalize(&candidate.recurrence_exprs)
        .map_err(|cause| fail(Stage::RecurrenceNormalized, cause))?;

    let (event, warnings) =
        validate::validate(candidate, zone, start, end, rules, options.max_duration)
            .map_err(|cause| fail(Stage::Validated, cause))?;

    Ok(CompileOutput { event, warnings })
}

// The model sometimes omits timeZone; fall back to the zone the request was
// made with.
fn effective_zone<'a>(request: &'a SchedulingRequest, candidate: &'a CandidateEvent) -> &'a str {
    let zone = candidate.time_zone.trim();
    if zone.is_empty() {
        request.default_time_zone.trim()
    } else {
        zone
    }
}

fn fail(stage: Stage, cause: CompileFailure) -> CompileError {
    CompileError { stage, cause }
}
