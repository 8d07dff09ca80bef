//! Natural-language workout analysis.

use async_trait::async_trait;
use log::error;

use crate::analysis::error::AnalysisError;
use crate::workout::WorkoutRecord;

pub mod error;
pub mod openai;

/// Sent to the user whenever the completion API cannot produce an answer.
pub const ANALYSIS_FAILED: &str = "Sorry, I couldn't analyze the workout at this time.";

pub const SYSTEM_PROMPT: &str = "You are a CrossFit coach and workout analyst. Analyze the \
    workout and provide insights about the workout type, difficulty, target areas, and any \
    tips for scaling or modifications.";

/// Builds the user prompt embedding every workout's title and description.
pub fn build_prompt(workouts: &[WorkoutRecord]) -> String {
    let mut prompt = String::from("Please analyze the following CrossFit workout(s):\n\n");

    for workout in workouts {
        prompt.push_str(&format!("Title: {}\n", workout.title_or_placeholder()));
        prompt.push_str(&format!(
            "Description: {}\n",
            workout.description_or_placeholder()
        ));
        prompt.push_str("---\n");
    }

    prompt.push_str("\nPlease provide a short and concise analysis of the workout:\n");
    prompt.push_str(
        "1. Estimated time to complete the workout for a beginner, intermediate and advanced athlete\n",
    );
    prompt.push_str("2. Recommended strategies and pacing for the workout\n");
    prompt.push_str("3. Scaling options for different fitness levels\n");
    prompt
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkoutAnalyst: Send + Sync {
    async fn try_analyze(&self, workouts: &[WorkoutRecord]) -> Result<String, AnalysisError>;

    /// Never fails: errors are logged and replaced with [`ANALYSIS_FAILED`].
    async fn analyze(&self, workouts: &[WorkoutRecord]) -> String {
        match self.try_analyze(workouts).await {
            Ok(text) => text,
            Err(e) => {
                error!("Error analyzing workout: {e}");
                ANALYSIS_FAILED.to_string()
            }
        }
    }
}

/// Stand-in used when no completion API key is configured.
pub struct DisabledAnalyst;

#[async_trait]
impl WorkoutAnalyst for DisabledAnalyst {
    async fn try_analyze(&self, _workouts: &[WorkoutRecord]) -> Result<String, AnalysisError> {
        Err(AnalysisError::MissingApiKey)
    }
}
