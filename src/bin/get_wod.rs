//! Posts today's and tomorrow's workouts once, then exits.

use std::sync::Arc;

use anyhow::Result;
use dotenv::dotenv;
use log::info;
use log::warn;
use wod_bot::config::Config;
use wod_bot::logging::setup_logging;
use wod_bot::task::daily_wod_publisher::publish_once;
use wod_bot::telegram::TelegramClient;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let mut config = Config::new();
    config.load()?;
    setup_logging(&config)?;

    let targets = config.one_shot_targets();
    if targets.is_empty() {
        warn!("TELEGRAM_CHANNEL_ID not set in environment variables.");
        return Ok(());
    }

    let telegram = Arc::new(TelegramClient::new(
        &config.telegram_api_url,
        &config.telegram_bot_token,
    )?);
    let report = publish_once(&config, telegram).await?;
    info!(
        "Posted workouts to {} of {} destinations.",
        report.sent,
        targets.len()
    );

    Ok(())
}
