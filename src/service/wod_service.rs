//! Fetches workouts and turns them into messages or analyses.

use std::sync::Arc;

use log::debug;
use log::info;

use crate::analysis::WorkoutAnalyst;
use crate::service::error::ServiceError;
use crate::workout::WorkoutSource;
use crate::workout::date_window::DateWindow;
use crate::workout::date_window::DateWindowResolver;
use crate::workout::formatter::NO_WORKOUTS_TODAY;
use crate::workout::formatter::render_on;

pub struct WodService {
    source: Arc<dyn WorkoutSource>,
    analyst: Arc<dyn WorkoutAnalyst>,
    resolver: DateWindowResolver,
}

impl WodService {
    pub fn new(
        source: Arc<dyn WorkoutSource>,
        analyst: Arc<dyn WorkoutAnalyst>,
        resolver: DateWindowResolver,
    ) -> Self {
        Self {
            source,
            analyst,
            resolver,
        }
    }

    pub fn resolver(&self) -> &DateWindowResolver {
        &self.resolver
    }

    /// Message for the scheduled post. A failed fetch renders as a day without workouts.
    pub async fn daily_message(&self, include_tomorrow: bool) -> String {
        let window = DateWindow::new(self.resolver.today(), include_tomorrow);
        let workouts = self.source.fetch(&window).await;
        info!(
            "Fetched {} workouts for {}.",
            workouts.len(),
            window.filter()
        );
        render_on(window.primary, &workouts, include_tomorrow)
    }

    /// Message for an interactive request, optionally for an explicit date.
    ///
    /// Unlike [`Self::daily_message`], a failed fetch is returned as an error.
    pub async fn message_for(
        &self,
        date: Option<&str>,
        include_tomorrow: bool,
    ) -> Result<String, ServiceError> {
        let window = self.resolver.resolve(date, include_tomorrow)?;
        let workouts = self.source.try_fetch(&window).await?;
        debug!(
            "Fetched {} workouts for {}.",
            workouts.len(),
            window.filter()
        );
        Ok(render_on(window.primary, &workouts, include_tomorrow))
    }

    /// Analysis of today's workouts, or a fixed text when there is nothing to analyze.
    pub async fn analyze_today(&self) -> String {
        let window = DateWindow::new(self.resolver.today(), false);
        let workouts = self.source.fetch(&window).await;
        if workouts.is_empty() {
            return NO_WORKOUTS_TODAY.to_string();
        }
        self.analyst.analyze(&workouts).await
    }
}
