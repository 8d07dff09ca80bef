use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;
use wod_bot::analysis::WorkoutAnalyst;
use wod_bot::analysis::error::AnalysisError;
use wod_bot::telegram::MessageSender;
use wod_bot::telegram::error::TelegramError;
use wod_bot::telegram::model::ParseMode;
use wod_bot::telegram::model::SendMessage;
use wod_bot::workout::WorkoutRecord;
use wod_bot::workout::WorkoutSource;
use wod_bot::workout::date_window::DateWindow;
use wod_bot::workout::error::WorkoutError;

/// Loads a canned API response from `tests/responses`.
#[allow(dead_code)]
pub fn get_response(filename: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/responses");
    path.push(filename);
    std::fs::read_to_string(path).expect("Failed to read response file")
}

/// A subscriber file path that does not exist yet.
#[allow(dead_code)]
pub fn temp_subscribers_path() -> PathBuf {
    std::env::temp_dir().join(format!("wod-bot-test-{}.txt", Uuid::new_v4()))
}

#[allow(dead_code)]
pub fn teardown(path: PathBuf) {
    if path.exists() {
        let _ = std::fs::remove_file(path);
    }
}

#[allow(dead_code)]
pub fn workout(id: &str, title: &str, date: &str) -> WorkoutRecord {
    WorkoutRecord {
        id: id.to_string(),
        title: Some(title.to_string()),
        description: Some(format!("{title} description")),
        scheduled_date: Some(format!("{date}T00:00:00.000Z")),
    }
}

// MOCK SOURCE

#[derive(Default)]
#[allow(dead_code)]
pub struct MockSource {
    pub workouts: RwLock<Vec<WorkoutRecord>>,
    pub fail: RwLock<bool>,
    pub requested: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockSource {
    pub fn new(workouts: Vec<WorkoutRecord>) -> Self {
        Self {
            workouts: RwLock::new(workouts),
            ..Default::default()
        }
    }

    pub fn set_fail(&self, fail: bool) {
        *self.fail.write().unwrap() = fail;
    }
}

#[async_trait]
impl WorkoutSource for MockSource {
    async fn try_fetch(&self, window: &DateWindow) -> Result<Vec<WorkoutRecord>, WorkoutError> {
        self.requested.lock().unwrap().push(window.filter());
        if *self.fail.read().unwrap() {
            return Err(WorkoutError::UnexpectedStatus {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(self.workouts.read().unwrap().clone())
    }
}

// MOCK ANALYST

#[allow(dead_code)]
pub struct FixedAnalyst(pub String);

#[async_trait]
impl WorkoutAnalyst for FixedAnalyst {
    async fn try_analyze(&self, _workouts: &[WorkoutRecord]) -> Result<String, AnalysisError> {
        Ok(self.0.clone())
    }
}

// RECORDING SENDER

#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(dead_code)]
pub struct SentMessage {
    pub chat_id: String,
    pub text: String,
    pub mode: ParseMode,
}

#[derive(Default)]
#[allow(dead_code)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<SentMessage>>,
    pub failing: Vec<String>,
}

#[allow(dead_code)]
impl RecordingSender {
    pub fn failing_for(ids: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            failing: ids.iter().map(|id| id.to_string()).collect(),
        })
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_request(&self, request: &SendMessage) -> Result<(), TelegramError> {
        if self.failing.iter().any(|id| *id == request.chat_id) {
            return Err(TelegramError::ApiError {
                code: 403,
                description: "Forbidden: bot was blocked by the user".to_string(),
            });
        }
        self.sent.lock().unwrap().push(SentMessage {
            chat_id: request.chat_id.clone(),
            text: request.text.clone(),
            mode: request.mode,
        });
        Ok(())
    }
}
