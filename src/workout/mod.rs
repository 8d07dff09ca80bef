//! Workout records and the sources they are fetched from.

use async_trait::async_trait;
use log::error;
use serde::Deserialize;
use serde::Serialize;

use crate::workout::date_window::DateWindow;
use crate::workout::error::WorkoutError;

pub mod date_window;
pub mod error;
pub mod formatter;
pub mod sugarwod;

/// Rendered in place of a missing field.
pub const PLACEHOLDER: &str = "N/A";

/// A scheduled workout as published by the fitness platform.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// ISO-8601 date and time with a `Z` suffix, e.g. `2024-03-20T00:00:00.000Z`.
    pub scheduled_date: Option<String>,
}

impl WorkoutRecord {
    pub fn title_or_placeholder(&self) -> &str {
        self.title.as_deref().unwrap_or(PLACEHOLDER)
    }

    pub fn description_or_placeholder(&self) -> &str {
        self.description.as_deref().unwrap_or(PLACEHOLDER)
    }

    /// The `YYYY-MM-DD` part of the scheduled date.
    pub fn scheduled_day(&self) -> &str {
        match self.scheduled_date.as_deref() {
            Some(date) => date.get(..10).unwrap_or(date),
            None => PLACEHOLDER,
        }
    }

    /// Whether the scheduled date starts with the given `YYYY-MM-DD` prefix.
    pub fn is_scheduled_on(&self, day_prefix: &str) -> bool {
        self.scheduled_date
            .as_deref()
            .is_some_and(|date| date.starts_with(day_prefix))
    }
}

/// Anything that can list the workouts scheduled inside a [`DateWindow`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkoutSource: Send + Sync {
    /// Fetches the workouts, surfacing transport and decoding failures.
    async fn try_fetch(&self, window: &DateWindow) -> Result<Vec<WorkoutRecord>, WorkoutError>;

    /// Fetches the workouts, logging any failure and returning an empty list instead.
    async fn fetch(&self, window: &DateWindow) -> Vec<WorkoutRecord> {
        match self.try_fetch(window).await {
            Ok(workouts) => workouts,
            Err(e) => {
                error!("Error fetching workouts for {}: {}", window.filter(), e);
                Vec::new()
            }
        }
    }
}
