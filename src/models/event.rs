use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::recurrence::RecurrenceRule;

/// One scheduling invocation. Built once per request, never mutated.
#[derive(Debug, Clone)]
pub struct SchedulingRequest {
    pub raw_text: String,
    pub reference_instant: DateTime<Utc>,
    pub default_time_zone: String,
}

impl SchedulingRequest {
    pub fn new(raw_text: &str, reference_instant: DateTime<Utc>, default_time_zone: &str) -> Self {
        Self {
            raw_text: raw_text.to_string(),
            reference_instant,
            default_time_zone: default_time_zone.to_string(),
        }
    }
}

// Untrusted output of the NL front-end. The serde names match the JSON the
// extraction prompt asks the model to emit, so a raw payload deserializes
// straight into this struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateEvent {
    pub summary: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "start")]
    pub start_expr: String,
    #[serde(rename = "end")]
    pub end_expr: String,
    #[serde(rename = "timeZone", default)]
    pub time_zone: String,
    #[serde(rename = "recurrence", default)]
    pub recurrence_exprs: Vec<String>,
}

/// A fully validated event. `start_instant < end_instant` and `time_zone`
/// parses as an IANA identifier by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedEvent {
    pub summary: String,
    pub description: Option<String>,
    pub start_instant: DateTime<Utc>,
    pub end_instant: DateTime<Utc>,
    pub time_zone: String,
    pub recurrence_rules: Vec<RecurrenceRule>,
}

/// What the calendar service hands back after a successful submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedEvent {
    pub id: String,
    pub link: String,
}
