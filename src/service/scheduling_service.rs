use std::sync::Arc;

use uuid::Uuid;

use crate::compiler::{self, CompileOutput, CompileWarning, CompilerOptions, Stage};
use crate::models::event::{CreatedEvent, ResolvedEvent, SchedulingRequest};
use crate::service::calendar_service::CalendarClient;
use crate::service::nl_service::NlFrontEnd;

#[derive(Debug)]
pub enum ScheduleOutcome {
    Compiled {
        event: ResolvedEvent,
        warnings: Vec<CompileWarning>,
    },
    Submitted {
        event: ResolvedEvent,
        warnings: Vec<CompileWarning>,
        created: CreatedEvent,
    },
}

impl ScheduleOutcome {
    pub fn event(&self) -> &ResolvedEvent {
        match self {
            ScheduleOutcome::Compiled { event, .. } => event,
            ScheduleOutcome::Submitted { event, .. } => event,
        }
    }

    pub fn warnings(&self) -> &[CompileWarning] {
        match self {
            ScheduleOutcome::Compiled { warnings, .. } => warnings,
            ScheduleOutcome::Submitted { warnings, .. } => warnings,
        }
    }
}

/// Drives one scheduling request end to end: NL front-end -> compiler ->
/// optional calendar submission. Holds no per-request state.
pub struct SchedulingService {
    nl: Arc<dyn NlFrontEnd>,
    calendar: Option<Arc<dyn CalendarClient>>,
    options: CompilerOptions,
}

impl SchedulingService {
    pub fn new(nl: Arc<dyn NlFrontEnd>, calendar: Option<Arc<dyn CalendarClient>>) -> Self {
        Self {
            nl,
            calendar,
            options: CompilerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompilerOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn schedule(
        &self,
        request: &SchedulingRequest,
    ) -> Result<ScheduleOutcome, Box<dyn std::error::Error + Send + Sync>> {
        let request_id = Uuid::new_v4();

        let candidate = self
            .nl
            .parse(&request.raw_text, request.reference_instant)
            .await?;

        let output = match compiler::compile_with(request, &candidate, &self.options) {
            Ok(output) => output,
            // A bad time or recurrence expression is usually the model's
            // doing; feed the error back once. Structural failures are not
            // model-fixable, so those go straight to the caller.
            Err(err) if reprompt_worthy(err.stage) => {
                log::warn!(
                    "[{}] compile failed at stage {}, re-prompting: {}",
                    request_id,
                    err.stage,
                    err.cause
                );
                let corrected = self
                    .nl
                    .correct(&request.raw_text, &err.to_string(), request.reference_instant)
                    .await?;
                compiler::compile_with(request, &corrected, &self.options)?
            }
            Err(err) => return Err(err.into()),
        };

        let CompileOutput { event, warnings } = output;
        for warning in &warnings {
            log::warn!("[{}] {}", request_id, warning);
        }

        match &self.calendar {
            Some(calendar) => {
                let created = calendar.create_event(&event).await?;
                log::info!("[{}] created calendar event {}", request_id, created.id);
                Ok(ScheduleOutcome::Submitted {
                    event,
                    warnings,
                    created,
                })
            }
            None => Ok(ScheduleOutcome::Compiled { event, warnings }),
        }
    }
}

fn reprompt_worthy(stage: Stage) -> bool {
    matches!(stage, Stage::TimeResolved | Stage::RecurrenceNormalized)
}
