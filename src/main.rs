//! Application entry point for wod-bot.
//!
//! Initializes all components and starts the Telegram bot.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use dotenv::dotenv;
use log::debug;
use log::info;
use wod_bot::bot::Bot;
use wod_bot::config::Config;
use wod_bot::logging::setup_logging;
use wod_bot::service::Services;
use wod_bot::task::daily_wod_publisher::DailyWodPublisher;
use wod_bot::telegram::TelegramClient;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let init_start = Instant::now();
    let config = load_config()?;

    let telegram = Arc::new(TelegramClient::new(
        &config.telegram_api_url,
        &config.telegram_bot_token,
    )?);
    let services = setup_services(&config, telegram.clone()).await?;

    let bot = setup_bot(&config, telegram, services.clone(), init_start).await?;
    let publisher = setup_publisher(&config, services, init_start)?;

    run(init_start).await?;

    bot.stop();
    if let Some(publisher) = publisher {
        publisher.stop();
    }
    Ok(())
}

fn load_config() -> Result<Arc<Config>> {
    let mut config = Config::new();
    config.load()?;
    let config = Arc::new(config);
    setup_logging(&config)?;
    info!("Starting wod-bot...");
    Ok(config)
}

async fn setup_services(config: &Config, telegram: Arc<TelegramClient>) -> Result<Arc<Services>> {
    debug!("Setting up Services...");
    Ok(Arc::new(Services::new(config, telegram).await?))
}

async fn setup_bot(
    config: &Config,
    telegram: Arc<TelegramClient>,
    services: Arc<Services>,
    init_start: Instant,
) -> Result<Arc<Bot>> {
    info!("Starting bot...");
    let bot = Bot::new(telegram, services, config.poll_timeout);
    bot.clone().start().await?;
    info!(
        "Bot setup complete ({:.2}s).",
        init_start.elapsed().as_secs_f64()
    );
    Ok(bot)
}

fn setup_publisher(
    config: &Config,
    services: Arc<Services>,
    init_start: Instant,
) -> Result<Option<Arc<DailyWodPublisher>>> {
    if !config.features.daily_broadcast {
        info!("Daily broadcast is disabled.");
        return Ok(None);
    }
    debug!("Setting up DailyWodPublisher...");

    let publisher =
        DailyWodPublisher::new(services, config.broadcast_channels(), config.broadcast_time);
    publisher.clone().start()?;

    info!(
        "Publisher setup complete ({:.2}s).",
        init_start.elapsed().as_secs_f64()
    );
    Ok(Some(publisher))
}

async fn run(init_start: Instant) -> Result<()> {
    info!(
        "wod-bot is up in {:.2}s. Press Ctrl+C to stop.",
        init_start.elapsed().as_secs_f64()
    );

    tokio::signal::ctrl_c().await?;
    info!("Ctrl+C received, shutting down.");

    Ok(())
}
