use async_trait::async_trait;

use crate::clients::google_calendar_client;
use crate::models::event::{CreatedEvent, ResolvedEvent};

/// The calendar submission collaborator. A ResolvedEvent is exactly the
/// input contract any implementation must accept.
#[async_trait]
pub trait CalendarClient: Send + Sync {
    async fn create_event(
        &self,
        event: &ResolvedEvent,
    ) -> Result<CreatedEvent, Box<dyn std::error::Error + Send + Sync>>;
}

pub struct GoogleCalendarService {
    access_token: String,
}

impl GoogleCalendarService {
    pub fn new(access_token: String) -> Self {
        Self { access_token }
    }
}

#[async_trait]
impl CalendarClient for GoogleCalendarService {
    async fn create_event(
        &self,
        event: &ResolvedEvent,
    ) -> Result<CreatedEvent, Box<dyn std::error::Error + Send + Sync>> {
        google_calendar_client::create_event(event, &self.access_token).await
    }
}
