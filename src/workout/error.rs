#[derive(Debug, thiserror::Error)]
pub enum WorkoutError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Workout API returned status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Failed to parse API response: {0}")]
    JsonParseFailed(#[from] serde_json::Error),
}

impl From<reqwest::Error> for WorkoutError {
    fn from(e: reqwest::Error) -> Self {
        WorkoutError::RequestFailed(Box::new(e))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DateWindowError {
    #[error("`{input}` is not a date, expected YYYY-MM-DD or YYYYMMDD.")]
    InvalidDate { input: String },
}
