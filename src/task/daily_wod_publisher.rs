//! Background task posting the workouts once a day.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;

use chrono::DateTime;
use chrono::LocalResult;
use chrono::NaiveTime;
use chrono::TimeZone;
use chrono::Utc;
use chrono_tz::Tz;
use log::debug;
use log::info;

use crate::config::Config;
use crate::service::Services;
use crate::service::delivery_service::BroadcastReport;
use crate::service::delivery_service::DeliveryService;
use crate::service::build_wod_service;
use crate::telegram::MessageSender;
use crate::telegram::model::ParseMode;

/// Posts today's and tomorrow's workouts to the channels and every subscriber.
pub struct DailyWodPublisher {
    services: Arc<Services>,
    channels: Vec<String>,
    at: NaiveTime,
    running: AtomicBool,
}

impl DailyWodPublisher {
    pub fn new(services: Arc<Services>, channels: Vec<String>, at: NaiveTime) -> Arc<Self> {
        info!("Initializing DailyWodPublisher for {} daily", at.format("%H:%M"));
        Arc::new(Self {
            services,
            channels,
            at,
            running: AtomicBool::new(false),
        })
    }

    /// Starts the daily loop.
    pub fn start(self: Arc<Self>) -> anyhow::Result<()> {
        if !self.running.swap(true, Ordering::SeqCst) {
            info!("Starting DailyWodPublisher loop.");
            self.spawn_loop();
        }
        Ok(())
    }

    /// Stops the daily loop after the current wait.
    pub fn stop(&self) {
        info!("Stopping DailyWodPublisher loop.");
        self.running.store(false, Ordering::SeqCst);
    }

    fn spawn_loop(self: Arc<Self>) {
        tokio::spawn(async move {
            loop {
                let zone = self.services.wod.resolver().zone();
                let now = Utc::now();
                let next = next_run_after(now, self.at, zone);
                info!("Next workout broadcast at {next}.");
                tokio::time::sleep(until(now, next)).await;

                if !self.running.load(Ordering::SeqCst) {
                    info!("Stopping daily loop.");
                    break;
                }
                self.publish().await;
            }
        });
    }

    /// Builds today's message and sends it to every destination.
    pub async fn publish(&self) -> BroadcastReport {
        debug!("Publishing daily workouts.");
        let message = self.services.wod.daily_message(true).await;
        let targets = self.targets().await;
        info!("Broadcasting workouts to {} destinations.", targets.len());
        self.services
            .delivery
            .broadcast(&targets, &message, ParseMode::Markdown)
            .await
    }

    /// Channels first, then subscribers not already listed.
    async fn targets(&self) -> Vec<String> {
        let mut targets = self.channels.clone();
        for id in self.services.subscriptions.all().await {
            if !targets.contains(&id) {
                targets.push(id);
            }
        }
        targets
    }
}

/// Posts today's and tomorrow's workouts once to the configured channel and chat.
///
/// Only the workout service is built, so an unreadable subscriber file does not matter here.
pub async fn publish_once(
    config: &Config,
    sender: Arc<dyn MessageSender>,
) -> anyhow::Result<BroadcastReport> {
    let targets = config.one_shot_targets();
    let wod = build_wod_service(config)?;
    let delivery = DeliveryService::new(sender, config.broadcast_concurrency);

    let message = wod.daily_message(true).await;
    Ok(delivery
        .broadcast(&targets, &message, ParseMode::Markdown)
        .await)
}

fn until(now: DateTime<Utc>, next: DateTime<Utc>) -> Duration {
    (next - now).to_std().unwrap_or(Duration::ZERO)
}

/// The first instant strictly after `now` whose local time in `zone` is `at`.
///
/// A local time skipped by a DST jump runs at the first instant after the gap.
pub fn next_run_after(now: DateTime<Utc>, at: NaiveTime, zone: Tz) -> DateTime<Utc> {
    let mut day = now.with_timezone(&zone).date_naive();
    loop {
        let local = day.and_time(at);
        let candidate = match zone.from_local_datetime(&local) {
            LocalResult::Single(t) => Some(t),
            LocalResult::Ambiguous(earliest, _) => Some(earliest),
            LocalResult::None => zone
                .from_local_datetime(&(local + chrono::Duration::hours(1)))
                .earliest(),
        };
        if let Some(candidate) = candidate {
            let candidate = candidate.with_timezone(&Utc);
            if candidate > now {
                return candidate;
            }
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => return now,
        }
    }
}
