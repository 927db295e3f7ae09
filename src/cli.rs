use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand};
use inquire::Text;
use serde_json;

use crate::compiler::{self, CompilerOptions};
use crate::models::event::{CandidateEvent, SchedulingRequest};
use crate::service::calendar_service::{CalendarClient, GoogleCalendarService};
use crate::service::nl_service::OpenAIService;
use crate::service::scheduling_service::{ScheduleOutcome, SchedulingService};

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an already-extracted candidate, no model call involved.
    Compile {
        summary: String,
        start: String,
        end: String,
        #[arg(long)]
        timezone: Option<String>,
        #[arg(long)]
        recurrence: Vec<String>,
    },
    CreatePrompt {},
}

pub async fn cli(
    default_zone: String,
    openai_api_key: Option<String>,
    google_access_token: Option<String>,
    options: CompilerOptions,
) {
    // Fine to panic here
    let cli = Cli::parse();
    match &cli.command {
        Commands::Compile {
            summary,
            start,
            end,
            timezone,
            recurrence,
        } => {
            let request = SchedulingRequest::new("", Utc::now(), &default_zone);
            let candidate = CandidateEvent {
                summary: summary.clone(),
                description: None,
                start_expr: start.clone(),
                end_expr: end.clone(),
                time_zone: timezone.clone().unwrap_or_default(),
                recurrence_exprs: recurrence.clone(),
            };
            match compiler::compile_with(&request, &candidate, &options) {
                Ok(output) => {
                    for warning in &output.warnings {
                        println!("Warning: {}", warning);
                    }
                    match serde_json::to_string_pretty(&output.event) {
                        Ok(json) => println!("{}", json),
                        Err(e) => println!("Failed to render event: {}", e),
                    }
                }
                Err(e) => println!("Failed to compile event: {}", e),
            }
        }
        Commands::CreatePrompt {} => {
            let Some(api_key) = openai_api_key else {
                println!("OPENAI_API_KEY must be set for create-prompt");
                return;
            };
            if let Err(e) = create_event_from_prompt(
                &default_zone,
                &api_key,
                google_access_token.as_deref(),
                options,
            )
            .await
            {
                println!("Failed to create event from prompt {}", e);
            }
        }
    }
}

async fn create_event_from_prompt(
    default_zone: &str,
    api_key: &str,
    access_token: Option<&str>,
    options: CompilerOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let user_prompt: String;
    if let Ok(prompt) = specify_prompt() {
        user_prompt = prompt;
    } else {
        println!("No user prompt supplied");
        return Err("No user prompt provided".into());
    }

    let nl = Arc::new(OpenAIService::new(
        api_key.to_string(),
        default_zone.to_string(),
    ));
    let calendar: Option<Arc<dyn CalendarClient>> = access_token.map(|token| {
        Arc::new(GoogleCalendarService::new(token.to_string())) as Arc<dyn CalendarClient>
    });
    let service = SchedulingService::new(nl, calendar).with_options(options);

    let request = SchedulingRequest::new(&user_prompt, Utc::now(), default_zone);
    let outcome = service
        .schedule(&request)
        .await
        .map_err(|e| -> Box<dyn std::error::Error> { format!("{}", e).into() })?;

    for warning in outcome.warnings() {
        println!("Warning: {}", warning);
    }
    match &outcome {
        ScheduleOutcome::Compiled { event, .. } => {
            println!("Event compiled. Set GOOGLE_ACCESS_TOKEN to submit it to Google Calendar.");
            println!("{}", serde_json::to_string_pretty(event)?);
        }
        ScheduleOutcome::Submitted { created, .. } => {
            println!("Event added to Google Calendar: {}", created.link);
        }
    }
    Ok(())
}

fn specify_prompt() -> Result<String, Box<dyn std::error::Error>> {
    Ok(Text::new("Tell me what event to add.").prompt()?)
}
