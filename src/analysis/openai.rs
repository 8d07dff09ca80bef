//! OpenAI chat-completion client.

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde::Serialize;

use crate::analysis::SYSTEM_PROMPT;
use crate::analysis::WorkoutAnalyst;
use crate::analysis::build_prompt;
use crate::analysis::error::AnalysisError;
use crate::workout::WorkoutRecord;

pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u32 = 500;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChatMessage,
}

pub struct OpenAiAnalyst {
    pub base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiAnalyst {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Result<Self, AnalysisError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
        })
    }

    fn request_body(&self, prompt: String) -> CompletionRequest<'_> {
        CompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Some(SYSTEM_PROMPT.to_string()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Some(prompt),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }
}

#[async_trait]
impl WorkoutAnalyst for OpenAiAnalyst {
    async fn try_analyze(&self, workouts: &[WorkoutRecord]) -> Result<String, AnalysisError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = serde_json::to_string(&self.request_body(build_prompt(workouts)))?;
        debug!("Requesting analysis of {} workouts from {url}", workouts.len());

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(match status.as_u16() {
                401 => AnalysisError::AuthenticationFailed(text),
                429 => AnalysisError::RateLimitExceeded(text),
                code => AnalysisError::ProviderError {
                    status: code,
                    message: text,
                },
            });
        }

        let completion: CompletionResponse = serde_json::from_str(&text)?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(AnalysisError::EmptyCompletion)
    }
}
