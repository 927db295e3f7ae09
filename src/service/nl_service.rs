use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::clients::openai_client;
use crate::models::event::CandidateEvent;

/// The NL front-end collaborator. Whatever it returns is untrusted; the
/// compiler validates every field.
#[async_trait]
pub trait NlFrontEnd: Send + Sync {
    async fn parse(
        &self,
        raw_text: &str,
        reference: DateTime<Utc>,
    ) -> Result<CandidateEvent, Box<dyn std::error::Error + Send + Sync>>;

    /// Re-prompt with a compile error as feedback, used when the first
    /// candidate failed a model-fixable stage.
    async fn correct(
        &self,
        raw_text: &str,
        compile_error: &str,
        reference: DateTime<Utc>,
    ) -> Result<CandidateEvent, Box<dyn std::error::Error + Send + Sync>>;
}

pub struct OpenAIService {
    api_key: String,
    default_zone: String,
}

impl OpenAIService {
    pub fn new(api_key: String, default_zone: String) -> Self {
        Self {
            api_key,
            default_zone,
        }
    }

    async fn extract(
        &self,
        prompt: &str,
        prompt_type: &str,
        reference: DateTime<Utc>,
    ) -> Result<CandidateEvent, Box<dyn std::error::Error + Send + Sync>> {
        let payload = openai_client::generate_openai_prompt(
            prompt,
            prompt_type,
            reference,
            &self.default_zone,
            &self.api_key,
        )
        .await?;
        let candidate: CandidateEvent = serde_json::from_str(&payload)
            .map_err(|e| format!("Failed to parse event JSON: {}\nRaw payload: {}", e, payload))?;
        Ok(candidate)
    }
}

#[async_trait]
impl NlFrontEnd for OpenAIService {
    async fn parse(
        &self,
        raw_text: &str,
        reference: DateTime<Utc>,
    ) -> Result<CandidateEvent, Box<dyn std::error::Error + Send + Sync>> {
        self.extract(raw_text, "event", reference).await
    }

    async fn correct(
        &self,
        raw_text: &str,
        compile_error: &str,
        reference: DateTime<Utc>,
    ) -> Result<CandidateEvent, Box<dyn std::error::Error + Send + Sync>> {
        let combined = format!(
            "Original request: \"{original}\"\nCompiler error: {error}",
            original = raw_text,
            error = compile_error
        );
        self.extract(&combined, "event_correction", reference).await
    }
}
