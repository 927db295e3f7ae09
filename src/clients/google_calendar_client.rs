use chrono_tz::Tz;
use reqwest;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::models::event::{CreatedEvent, ResolvedEvent};

const EVENTS_URL: &str = "https://www.googleapis.com/calendar/v3/calendars/primary/events";

#[derive(Debug, Deserialize)]
struct GoogleEventResponse {
    id: String,
    #[serde(rename = "htmlLink", default)]
    html_link: String,
}

// The Google Calendar wire shape: zone-local RFC 3339 datetimes plus RRULE
// lines. A ResolvedEvent always carries a parseable zone, but this is an
// external boundary so the parse failure still surfaces as an error.
pub fn event_body(event: &ResolvedEvent) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
    let tz: Tz = event
        .time_zone
        .parse()
        .map_err(|_| format!("unknown time zone {}", event.time_zone))?;

    let mut body = json!({
        "summary": event.summary,
        "description": event.description.clone().unwrap_or_default(),
        "start": {
            "dateTime": event.start_instant.with_timezone(&tz).to_rfc3339(),
            "timeZone": event.time_zone,
        },
        "end": {
            "dateTime": event.end_instant.with_timezone(&tz).to_rfc3339(),
            "timeZone": event.time_zone,
        },
    });

    if !event.recurrence_rules.is_empty() {
        let lines: Vec<String> = event
            .recurrence_rules
            .iter()
            .map(|rule| format!("RRULE:{}", rule))
            .collect();
        body["recurrence"] = json!(lines);
    }

    Ok(body)
}

pub async fn create_event(
    event: &ResolvedEvent,
    access_token: &str,
) -> Result<CreatedEvent, Box<dyn std::error::Error + Send + Sync>> {
    let body = event_body(event)?;

    let client = reqwest::Client::new();
    let response = client
        .post(EVENTS_URL)
        .header("Authorization", format!("Bearer {}", access_token))
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        log::error!("Google Calendar error {}: {}", status, text);
        return Err(format!("Failed to create calendar event: status {}", status).into());
    }

    let created: GoogleEventResponse = serde_json::from_str(&text)
        .map_err(|e| format!("Failed to parse Google Calendar response: {}\nRaw body: {}", e, text))?;

    Ok(CreatedEvent {
        id: created.id,
        link: created.html_link,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::recurrence::{Frequency, RecurrenceRule};
    use chrono::{TimeZone, Utc};

    #[test]
    fn body_uses_zone_local_datetimes() {
        let event = ResolvedEvent {
            summary: "Team meeting".to_string(),
            description: None,
            start_instant: Utc.with_ymd_and_hms(2025, 6, 2, 18, 0, 0).unwrap(),
            end_instant: Utc.with_ymd_and_hms(2025, 6, 2, 19, 0, 0).unwrap(),
            time_zone: "America/New_York".to_string(),
            recurrence_rules: Vec::new(),
        };
        let body = event_body(&event).unwrap();
        assert_eq!(body["start"]["dateTime"], "2025-06-02T14:00:00-04:00");
        assert_eq!(body["end"]["timeZone"], "America/New_York");
        assert!(body.get("recurrence").is_none());
    }

    #[test]
    fn body_carries_rrule_lines() {
        let mut rule = RecurrenceRule::new(Frequency::Daily);
        rule.count = Some(5);
        let event = ResolvedEvent {
            summary: "Standup".to_string(),
            description: Some("Daily sync".to_string()),
            start_instant: Utc.with_ymd_and_hms(2025, 6, 2, 13, 0, 0).unwrap(),
            end_instant: Utc.with_ymd_and_hms(2025, 6, 2, 13, 15, 0).unwrap(),
            time_zone: "UTC".to_string(),
            recurrence_rules: vec![rule],
        };
        let body = event_body(&event).unwrap();
        assert_eq!(body["recurrence"][0], "RRULE:FREQ=DAILY;COUNT=5");
    }
}
