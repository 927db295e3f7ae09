use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::compiler::error::CompileFailure;

// Naive forms we accept, seconds optional.
const LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

pub fn parse_zone(zone: &str) -> Result<Tz, CompileFailure> {
    zone.parse::<Tz>()
        .map_err(|_| CompileFailure::UnknownTimeZone(zone.to_string()))
}

/// Converts an already-absolute ISO-8601 datetime expression into a UTC
/// instant. Relative expressions ("tomorrow", "next Friday") are the NL
/// front-end's job and must not reach this function; `reference` stays in
/// the contract for interpreters that do handle them.
pub fn resolve(
    expr: &str,
    _reference: DateTime<Utc>,
    zone: &str,
) -> Result<DateTime<Utc>, CompileFailure> {
    let tz = parse_zone(zone)?;
    let trimmed = expr.trim();
    if trimmed.is_empty() {
        return Err(invalid(expr, "datetime expression is empty"));
    }

    // An explicit offset makes the expression absolute on its own; the zone
    // then only affects display.
    if let Ok(absolute) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(absolute.with_timezone(&Utc));
    }

    for format in LOCAL_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return resolve_local(trimmed, naive, tz);
        }
    }

    if NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_ok() {
        return Err(invalid(
            trimmed,
            "a time of day is required, date-only input is not accepted",
        ));
    }

    Err(invalid(trimmed, "not an ISO-8601 datetime"))
}

fn resolve_local(expr: &str, naive: NaiveDateTime, tz: Tz) -> Result<DateTime<Utc>, CompileFailure> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(local) => Ok(local.with_timezone(&Utc)),
        LocalResult::Ambiguous(_, _) => Err(invalid(
            expr,
            &format!("local time is ambiguous in {} (clocks roll back)", tz),
        )),
        LocalResult::None => Err(invalid(
            expr,
            &format!("local time does not exist in {} (clocks skip forward)", tz),
        )),
    }
}

fn invalid(expr: &str, reason: &str) -> CompileFailure {
    CompileFailure::InvalidTimeExpression {
        expr: expr.to_string(),
        reason: reason.to_string(),
    }
}
