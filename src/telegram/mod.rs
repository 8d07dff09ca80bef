//! Telegram Bot API client.

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::Quota;
use governor::RateLimiter;
use governor::clock::QuantaClock;
use governor::state::InMemoryState;
use governor::state::direct::NotKeyed;
use log::debug;
use log::info;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::telegram::error::TelegramError;
use crate::telegram::model::ApiResponse;
use crate::telegram::model::BotCommand;
use crate::telegram::model::Message;
use crate::telegram::model::ParseMode;
use crate::telegram::model::SendMessage;
use crate::telegram::model::Update;
use crate::telegram::model::User;

pub mod error;
pub mod model;

/// Telegram allows about 30 messages per second per bot.
const MESSAGES_PER_SECOND: u32 = 30;

/// Sends messages to a single destination.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Sends a fully built request, reply keyboard included.
    async fn send_request(&self, request: &SendMessage) -> Result<(), TelegramError>;

    async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        mode: ParseMode,
    ) -> Result<(), TelegramError> {
        self.send_request(&SendMessage::new(chat_id, text).parse_mode(mode))
            .await
    }
}

pub struct TelegramClient {
    pub api_url: String,
    token: String,
    client: reqwest::Client,
    limiter: RateLimiter<NotKeyed, InMemoryState, QuantaClock>,
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str) -> Result<Self, TelegramError> {
        let per_second = NonZeroU32::new(MESSAGES_PER_SECOND).unwrap_or(NonZeroU32::MIN);
        let limiter = RateLimiter::direct(Quota::per_second(per_second));
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            client,
            limiter,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, TelegramError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_string(body)?;
        debug!("Calling Telegram method `{method}`");

        let response = self
            .client
            .post(self.method_url(method))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        // Error responses carry the same envelope, so the status code is read from it.
        let text = response.text().await?;
        let envelope: ApiResponse<T> = serde_json::from_str(&text)?;
        if !envelope.ok {
            return Err(TelegramError::ApiError {
                code: envelope.error_code.unwrap_or_default(),
                description: envelope.description.unwrap_or_default(),
            });
        }
        envelope.result.ok_or_else(|| TelegramError::MissingResult {
            method: method.to_string(),
        })
    }

    /// Sends one message, waiting for the outgoing rate limit first.
    pub async fn send(&self, request: &SendMessage) -> Result<Message, TelegramError> {
        if self.limiter.check().is_err() {
            info!("Telegram send is ratelimited. Waiting...");
            self.limiter.until_ready().await;
        }
        self.call("sendMessage", request).await
    }

    /// The bot's own account.
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    pub async fn set_my_commands(&self, commands: &[BotCommand]) -> Result<(), TelegramError> {
        let body = serde_json::json!({ "commands": commands });
        let _: bool = self.call("setMyCommands", &body).await?;
        Ok(())
    }

    /// Long-polls for updates newer than `offset`.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> Result<Vec<Update>, TelegramError> {
        let mut body = serde_json::json!({
            "timeout": timeout.as_secs(),
            "allowed_updates": ["message", "channel_post"],
        });
        if let Some(offset) = offset {
            body["offset"] = serde_json::json!(offset);
        }
        self.call("getUpdates", &body).await
    }
}

#[async_trait]
impl MessageSender for TelegramClient {
    async fn send_request(&self, request: &SendMessage) -> Result<(), TelegramError> {
        self.send(request).await.map(|_| ())
    }
}
