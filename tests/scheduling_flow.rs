use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use calendarBot::models::event::{CandidateEvent, CreatedEvent, ResolvedEvent, SchedulingRequest};
use calendarBot::service::calendar_service::CalendarClient;
use calendarBot::service::nl_service::NlFrontEnd;
use calendarBot::service::scheduling_service::{ScheduleOutcome, SchedulingService};
use chrono::{DateTime, TimeZone, Utc};

struct ScriptedFrontEnd {
    parses: Mutex<Vec<CandidateEvent>>,
    corrections: Mutex<Vec<CandidateEvent>>,
    correction_calls: AtomicUsize,
}

impl ScriptedFrontEnd {
    fn new(parses: Vec<CandidateEvent>, corrections: Vec<CandidateEvent>) -> Self {
        Self {
            parses: Mutex::new(parses),
            corrections: Mutex::new(corrections),
            correction_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl NlFrontEnd for ScriptedFrontEnd {
    async fn parse(
        &self,
        _raw_text: &str,
        _reference: DateTime<Utc>,
    ) -> Result<CandidateEvent, Box<dyn std::error::Error + Send + Sync>> {
        let mut parses = self.parses.lock().unwrap();
        if parses.is_empty() {
            return Err("no scripted parse left".into());
        }
        Ok(parses.remove(0))
    }

    async fn correct(
        &self,
        _raw_text: &str,
        _compile_error: &str,
        _reference: DateTime<Utc>,
    ) -> Result<CandidateEvent, Box<dyn std::error::Error + Send + Sync>> {
        self.correction_calls.fetch_add(1, Ordering::SeqCst);
        let mut corrections = self.corrections.lock().unwrap();
        if corrections.is_empty() {
            return Err("no scripted correction left".into());
        }
        Ok(corrections.remove(0))
    }
}

struct FakeCalendar {
    created: Mutex<Vec<ResolvedEvent>>,
}

#[async_trait]
impl CalendarClient for FakeCalendar {
    async fn create_event(
        &self,
        event: &ResolvedEvent,
    ) -> Result<CreatedEvent, Box<dyn std::error::Error + Send + Sync>> {
        self.created.lock().unwrap().push(event.clone());
        Ok(CreatedEvent {
            id: "evt-1".to_string(),
            link: "https://calendar.google.com/event?eid=evt-1".to_string(),
        })
    }
}

fn request() -> SchedulingRequest {
    SchedulingRequest::new(
        "add team meeting tomorrow at 2pm",
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        "America/New_York",
    )
}

fn good_candidate() -> CandidateEvent {
    CandidateEvent {
        summary: "team meeting".to_string(),
        description: None,
        start_expr: "2025-06-02T14:00:00".to_string(),
        end_expr: "2025-06-02T15:00:00".to_string(),
        time_zone: "America/New_York".to_string(),
        recurrence_exprs: Vec::new(),
    }
}

#[tokio::test]
async fn compiles_without_submission_when_no_calendar() {
    let nl = Arc::new(ScriptedFrontEnd::new(vec![good_candidate()], Vec::new()));
    let service = SchedulingService::new(nl.clone(), None);

    let outcome = service.schedule(&request()).await.unwrap();
    assert!(matches!(outcome, ScheduleOutcome::Compiled { .. }));
    assert_eq!(
        outcome.event().start_instant,
        Utc.with_ymd_and_hms(2025, 6, 2, 18, 0, 0).unwrap()
    );
    assert_eq!(nl.correction_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn submits_when_calendar_is_configured() {
    let nl = Arc::new(ScriptedFrontEnd::new(vec![good_candidate()], Vec::new()));
    let calendar = Arc::new(FakeCalendar {
        created: Mutex::new(Vec::new()),
    });
    let service = SchedulingService::new(nl, Some(calendar.clone()));

    let outcome = service.schedule(&request()).await.unwrap();
    match outcome {
        ScheduleOutcome::Submitted { created, .. } => {
            assert_eq!(created.id, "evt-1");
        }
        other => panic!("expected submission, got {:?}", other),
    }
    assert_eq!(calendar.created.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn reprompts_once_on_time_failure() {
    let mut bad = good_candidate();
    bad.start_expr = "2025-06-02".to_string(); // date-only, compiler rejects

    let nl = Arc::new(ScriptedFrontEnd::new(vec![bad], vec![good_candidate()]));
    let service = SchedulingService::new(nl.clone(), None);

    let outcome = service.schedule(&request()).await.unwrap();
    assert!(matches!(outcome, ScheduleOutcome::Compiled { .. }));
    assert_eq!(nl.correction_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn does_not_reprompt_on_validation_failure() {
    let mut bad = good_candidate();
    bad.summary = "  ".to_string();

    let nl = Arc::new(ScriptedFrontEnd::new(vec![bad], vec![good_candidate()]));
    let service = SchedulingService::new(nl.clone(), None);

    let result = service.schedule(&request()).await;
    assert!(result.is_err());
    assert_eq!(nl.correction_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn second_bad_candidate_surfaces_the_error() {
    let mut bad = good_candidate();
    bad.recurrence_exprs = vec!["RRULE:FREQ=SOMETIMES".to_string()];

    let nl = Arc::new(ScriptedFrontEnd::new(vec![bad.clone()], vec![bad]));
    let service = SchedulingService::new(nl.clone(), None);

    let result = service.schedule(&request()).await;
    assert!(result.is_err());
    assert_eq!(nl.correction_calls.load(Ordering::SeqCst), 1);
}
