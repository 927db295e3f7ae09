use chrono::{DateTime, Utc};
use reqwest;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

pub async fn generate_openai_prompt(
    prompt: &str,
    prompt_type: &str,
    reference: DateTime<Utc>,
    default_zone: &str,
    api_key: &str,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let full_prompt = match prompt_type {
        "event" => format!(
            "You are a calendar event extraction engine.\n\
             Current date and time (UTC): {now}\n\
             User timezone: {zone}\n\
             Task: From the scheduling request below, extract a calendar event.\n\
             Rules:\n\
             - \"summary\" is the event title with scheduling words removed, e.g.\n\
               \"add team meeting tomorrow at 2pm\" -> \"team meeting\".\n\
             - \"start\" and \"end\" are ISO-8601 datetimes in the user's timezone, like \"2025-06-02T14:00:00\".\n\
             - ALWAYS include an explicit time of day in \"start\" and \"end\"; never emit a bare date.\n\
             - If the user gives no time of day, use 09:00:00 for start and 10:00:00 for end.\n\
             - If no duration or end is given, make the event one hour long.\n\
             - If the date is relative (tomorrow, next Friday), compute the concrete date from the current datetime.\n\
               \"next <weekday>\" means the occurrence in the following week, not the immediate upcoming one.\n\
             - For recurring requests add \"recurrence\" entries in RFC 5545 RRULE form, for example:\n\
               - Daily: RRULE:FREQ=DAILY;COUNT=30\n\
               - Weekly: RRULE:FREQ=WEEKLY;BYDAY=MO,WE,FR;COUNT=10\n\
               - Monthly: RRULE:FREQ=MONTHLY;BYMONTHDAY=1;COUNT=12\n\
             - Never invent or adjust dates away from what the user wrote; only fill in missing year or time.\n\
             - Output ONLY raw JSON, no prose, markdown, or code fences.\n\
             - The JSON shape must be exactly:\n\
             {{\"summary\":\"<string>\",\"description\":\"<string, optional>\",\"start\":\"<ISO datetime>\",\"end\":\"<ISO datetime>\",\"timeZone\":\"{zone}\",\"recurrence\":[\"<RRULE line>\", ...]}}\n\
             Scheduling request: \"{user_prompt}\"",
            now = reference.to_rfc3339(),
            zone = default_zone,
            user_prompt = prompt
        ),
        "event_correction" => format!(
            "You are a calendar event correction engine.\n\
             Current date and time (UTC): {now}\n\
             User timezone: {zone}\n\
             Task: A previous extraction of the scheduling request below failed to compile.\n\
             The compiler error is included; fix ONLY what the error points at.\n\
             Rules:\n\
             - Preserve the original summary, dates and recurrence unless the error says otherwise.\n\
             - \"start\" and \"end\" must be ISO-8601 datetimes with an explicit time of day.\n\
             - Recurrence entries must be valid RFC 5545 RRULE lines.\n\
             - Output ONLY raw JSON, no prose, markdown, or code fences.\n\
             - The JSON shape must be exactly:\n\
             {{\"summary\":\"<string>\",\"description\":\"<string, optional>\",\"start\":\"<ISO datetime>\",\"end\":\"<ISO datetime>\",\"timeZone\":\"{zone}\",\"recurrence\":[\"<RRULE line>\", ...]}}\n\
             {user_prompt}",
            now = reference.to_rfc3339(),
            zone = default_zone,
            user_prompt = prompt
        ),
        _ => return Err("Not a valid base prompt".to_string().into()),
    };

    query_openai(full_prompt, api_key).await
}

async fn query_openai(
    prompt: String,
    api_key: &str,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let request: OpenAIRequest = OpenAIRequest {
        model: "gpt-4o-mini".to_string(),
        messages: vec![
            OpenAIMessage {
                role: "system".to_string(),
                content: "You are a strict JSON calendar event extraction engine. You read instructions and a scheduling request and reply ONLY with a single JSON object, with no markdown, no backticks, and no extra text. Every start and end value you emit carries an explicit time of day.".to_string(),
            },
            OpenAIMessage {
                role: "user".to_string(),
                content: prompt,
            },
        ],
        max_tokens: 1500,
        temperature: 0.2,
    };

    let client = reqwest::Client::new();
    let response = client
        .post("https://api.openai.com/v1/chat/completions")
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?; // read the body once

    if !status.is_success() {
        log::error!("OpenAI error {}: {}", status, text);
        return Err(format!("Request failed with status {}", status).into());
    }

    let parsed: OpenAIResponse = serde_json::from_str(&text)
        .map_err(|e| format!("Failed to parse JSON: {}\nRaw body: {}", e, text))?;

    if let Some(choice) = parsed.choices.first() {
        Ok(choice.message.content.clone())
    } else {
        log::error!("No choices found in response. Raw body: {}", text);
        Err("No response from OpenAI".to_string().into())
    }
}
