use calendarBot::compiler::error::CompileFailure;
use calendarBot::compiler::time::resolve;
use chrono::{DateTime, TimeZone, Utc};

fn reference() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
}

#[test]
fn resolves_minute_precision_datetime() {
    let instant = resolve("2025-06-02T14:30", reference(), "UTC").unwrap();
    assert_eq!(instant, Utc.with_ymd_and_hms(2025, 6, 2, 14, 30, 0).unwrap());
}

#[test]
fn resolves_offset_datetime_to_utc() {
    let instant = resolve("2025-06-02T14:00:00+02:00", reference(), "UTC").unwrap();
    assert_eq!(instant, Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap());
}

#[test]
fn rejects_ambiguous_fall_back_time() {
    // US fall-back 2025: 01:30 on November 2 happens twice in New York.
    let err = resolve("2025-11-02T01:30:00", reference(), "America/New_York").unwrap_err();
    match err {
        CompileFailure::InvalidTimeExpression { reason, .. } => {
            assert!(reason.contains("ambiguous"));
        }
        other => panic!("expected InvalidTimeExpression, got {:?}", other),
    }
}

#[test]
fn rejects_prose_expressions() {
    // "tomorrow" is the NL front-end's job, not the resolver's.
    let err = resolve("tomorrow at 3pm", reference(), "UTC").unwrap_err();
    assert!(matches!(err, CompileFailure::InvalidTimeExpression { .. }));
}

#[test]
fn rejects_empty_expression() {
    let err = resolve("   ", reference(), "UTC").unwrap_err();
    assert!(matches!(err, CompileFailure::InvalidTimeExpression { .. }));
}
