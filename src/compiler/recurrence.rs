use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::compiler::error::CompileFailure;
use crate::models::recurrence::{Frequency, RecurrenceRule, Weekday};

/// Validates and canonicalizes recurrence expressions. Output order matches
/// input order; any bad expression fails the whole batch.
pub fn normalize(exprs: &[String]) -> Result<Vec<RecurrenceRule>, CompileFailure> {
    exprs.iter().map(|expr| normalize_one(expr)).collect()
}

fn normalize_one(expr: &str) -> Result<RecurrenceRule, CompileFailure> {
    // The NL front-end emits full RFC 5545 lines, so the prefix is optional.
    let body = expr.trim();
    let body = body.strip_prefix("RRULE:").unwrap_or(body);
    if body.is_empty() {
        return Err(invalid(expr, "rule is empty"));
    }

    let mut frequency: Option<Frequency> = None;
    let mut by_day: Option<BTreeSet<Weekday>> = None;
    let mut by_month_day: Option<u8> = None;
    let mut count: Option<u32> = None;
    let mut until: Option<DateTime<Utc>> = None;

    for part in body.split(';') {
        let Some((key, value)) = part.split_once('=') else {
            return Err(invalid(expr, format!("\"{}\" is not a KEY=VALUE pair", part)));
        };
        match key {
            "FREQ" => {
                if frequency.is_some() {
                    return Err(invalid(expr, "duplicate FREQ"));
                }
                let Some(freq) = Frequency::from_code(value) else {
                    return Err(invalid(expr, format!("unsupported FREQ \"{}\"", value)));
                };
                frequency = Some(freq);
            }
            "BYDAY" => {
                if by_day.is_some() {
                    return Err(invalid(expr, "duplicate BYDAY"));
                }
                by_day = Some(parse_by_day(expr, value)?);
            }
            "BYMONTHDAY" => {
                if by_month_day.is_some() {
                    return Err(invalid(expr, "duplicate BYMONTHDAY"));
                }
                let day: u8 = value
                    .parse()
                    .ok()
                    .filter(|d| (1..=31).contains(d))
                    .ok_or_else(|| {
                        invalid(expr, format!("BYMONTHDAY \"{}\" is not a day in 1..=31", value))
                    })?;
                by_month_day = Some(day);
            }
            "COUNT" => {
                if count.is_some() {
                    return Err(invalid(expr, "duplicate COUNT"));
                }
                let parsed: u32 = value.parse().ok().filter(|c| *c >= 1).ok_or_else(|| {
                    invalid(expr, format!("COUNT \"{}\" is not a positive integer", value))
                })?;
                count = Some(parsed);
            }
            "UNTIL" => {
                if until.is_some() {
                    return Err(invalid(expr, "duplicate UNTIL"));
                }
                until = Some(parse_until(expr, value)?);
            }
            _ => {
                return Err(invalid(expr, format!("unsupported key \"{}\"", key)));
            }
        }
    }

    let Some(frequency) = frequency else {
        return Err(invalid(expr, "missing FREQ"));
    };
    if count.is_some() && until.is_some() {
        return Err(invalid(expr, "COUNT and UNTIL are mutually exclusive"));
    }
    if by_month_day.is_some() && frequency != Frequency::Monthly {
        return Err(invalid(expr, "BYMONTHDAY is only valid with FREQ=MONTHLY"));
    }

    Ok(RecurrenceRule {
        frequency,
        by_day: by_day.unwrap_or_default(),
        by_month_day,
        count,
        until,
    })
}

fn parse_by_day(expr: &str, value: &str) -> Result<BTreeSet<Weekday>, CompileFailure> {
    let mut days = BTreeSet::new();
    for code in value.split(',') {
        let Some(day) = Weekday::from_code(code) else {
            return Err(invalid(expr, format!("BYDAY entry \"{}\" is not a weekday code", code)));
        };
        days.insert(day);
    }
    if days.is_empty() {
        return Err(invalid(expr, "BYDAY list is empty"));
    }
    Ok(days)
}

// RFC 5545 basic UTC form, e.g. 20250701T120000Z.
fn parse_until(expr: &str, value: &str) -> Result<DateTime<Utc>, CompileFailure> {
    NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%SZ")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| invalid(expr, format!("UNTIL \"{}\" is not a UTC timestamp", value)))
}

fn invalid(expr: &str, reason: impl Into<String>) -> CompileFailure {
    CompileFailure::InvalidRecurrenceRule {
        expr: expr.to_string(),
        reason: reason.into(),
    }
}
