use std::sync::Arc;

use log::info;
use log::warn;

use crate::analysis::DisabledAnalyst;
use crate::analysis::WorkoutAnalyst;
use crate::analysis::openai::OpenAiAnalyst;
use crate::config::Config;
use crate::service::delivery_service::DeliveryService;
use crate::service::wod_service::WodService;
use crate::subscriber::SubscriptionStore;
use crate::telegram::TelegramClient;
use crate::workout::date_window::DateWindowResolver;
use crate::workout::sugarwod::SugarWodClient;

pub mod delivery_service;
pub mod error;
pub mod wod_service;

pub struct Services {
    pub wod: Arc<WodService>,
    pub delivery: Arc<DeliveryService>,
    pub subscriptions: Arc<SubscriptionStore>,
}

impl Services {
    /// Wires every service to the real APIs named in `config`.
    pub async fn new(config: &Config, telegram: Arc<TelegramClient>) -> anyhow::Result<Self> {
        let wod = Arc::new(build_wod_service(config)?);
        let subscriptions = Arc::new(SubscriptionStore::open(&config.subscribers_path).await?);

        Ok(Self {
            wod,
            delivery: Arc::new(DeliveryService::new(
                telegram,
                config.broadcast_concurrency,
            )),
            subscriptions,
        })
    }
}

/// Builds the workout service alone. It does not touch the subscriber file.
pub fn build_wod_service(config: &Config) -> anyhow::Result<WodService> {
    let source = Arc::new(SugarWodClient::new(
        &config.sugarwod_api_url,
        &config.sugarwod_api_key,
    )?);

    let analyst: Arc<dyn WorkoutAnalyst> = match &config.openai_api_key {
        Some(key) => Arc::new(OpenAiAnalyst::new(
            &config.openai_api_url,
            key,
            &config.openai_model,
        )?),
        None => {
            warn!("OPENAI_API_KEY is not set. Workout analysis is disabled.");
            Arc::new(DisabledAnalyst)
        }
    };

    let resolver = DateWindowResolver::new(&config.timezone);
    info!("Resolving workout dates in zone {}.", resolver.zone());

    Ok(WodService::new(source, analyst, resolver))
}
