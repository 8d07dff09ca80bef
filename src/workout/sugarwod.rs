//! SugarWOD workouts API integration.

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use crate::workout::WorkoutRecord;
use crate::workout::WorkoutSource;
use crate::workout::date_window::DateWindow;
use crate::workout::error::WorkoutError;

#[derive(Debug, Deserialize)]
struct WorkoutEnvelope {
    #[serde(default)]
    data: Vec<WorkoutData>,
}

#[derive(Debug, Deserialize)]
struct WorkoutData {
    #[serde(default)]
    id: String,
    #[serde(default)]
    attributes: WorkoutAttributes,
}

#[derive(Debug, Default, Deserialize)]
struct WorkoutAttributes {
    title: Option<String>,
    description: Option<String>,
    scheduled_date: Option<String>,
}

impl From<WorkoutData> for WorkoutRecord {
    fn from(data: WorkoutData) -> Self {
        Self {
            id: data.id,
            title: data.attributes.title,
            description: data.attributes.description,
            scheduled_date: data.attributes.scheduled_date,
        }
    }
}

/// Client for `GET {base}/workouts?dates=...`.
pub struct SugarWodClient {
    pub base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl SugarWodClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, WorkoutError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    /// Fetches the workouts for a raw `dates` filter such as `20240320,20240321`.
    pub async fn try_get_workouts(&self, dates: &str) -> Result<Vec<WorkoutRecord>, WorkoutError> {
        let url = format!("{}/workouts?dates={}", self.base_url, dates);
        debug!("Fetching workouts from: {url}");

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.api_key.as_str())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(WorkoutError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: WorkoutEnvelope = serde_json::from_str(&body)?;
        Ok(envelope.data.into_iter().map(WorkoutRecord::from).collect())
    }
}

#[async_trait]
impl WorkoutSource for SugarWodClient {
    async fn try_fetch(&self, window: &DateWindow) -> Result<Vec<WorkoutRecord>, WorkoutError> {
        self.try_get_workouts(&window.filter()).await
    }
}
