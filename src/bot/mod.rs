//! Telegram bot: command menu registration and the long-polling update loop.

use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;

use log::debug;
use log::error;
use log::info;
use log::warn;

use crate::bot::command::Command;
use crate::bot::handler::CommandHandler;
use crate::bot::handler::Reply;
use crate::service::Services;
use crate::telegram::MessageSender;
use crate::telegram::TelegramClient;
use crate::telegram::model::Update;

pub mod command;
pub mod error;
pub mod handler;

pub const DELIVERY_FAILED: &str = "⚠️ Sorry, I couldn't deliver that message.";

/// Pause after a failed `getUpdates` call.
const POLL_ERROR_DELAY: Duration = Duration::from_secs(5);

pub struct Bot {
    client: Arc<TelegramClient>,
    sender: Arc<dyn MessageSender>,
    handler: CommandHandler,
    poll_timeout: Duration,
    username: OnceLock<String>,
    running: AtomicBool,
}

impl Bot {
    pub fn new(
        client: Arc<TelegramClient>,
        services: Arc<Services>,
        poll_timeout: Duration,
    ) -> Arc<Self> {
        let sender: Arc<dyn MessageSender> = client.clone();
        Self::with_sender(client, sender, services, poll_timeout)
    }

    /// Polls with `client` but sends every reply through `sender`.
    pub fn with_sender(
        client: Arc<TelegramClient>,
        sender: Arc<dyn MessageSender>,
        services: Arc<Services>,
        poll_timeout: Duration,
    ) -> Arc<Self> {
        info!("Initializing Bot with poll timeout {:?}", poll_timeout);
        Arc::new(Self {
            client,
            sender,
            handler: CommandHandler::new(services),
            poll_timeout,
            username: OnceLock::new(),
            running: AtomicBool::new(false),
        })
    }

    /// Registers the command menu and starts polling for updates.
    pub async fn start(self: Arc<Self>) -> anyhow::Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        match self.client.get_me().await {
            Ok(me) => {
                if let Some(username) = me.username {
                    info!("Running as @{username}");
                    let _ = self.username.set(username);
                }
            }
            Err(e) => warn!("Failed to look up bot account, accepting any @mention: {e}"),
        }

        if let Err(e) = self.client.set_my_commands(&command::menu()).await {
            warn!("Failed to register bot commands: {e}");
        }

        info!("Starting Bot update loop.");
        self.spawn_update_loop();
        Ok(())
    }

    pub fn stop(&self) {
        info!("Stopping Bot update loop.");
        self.running.store(false, Ordering::SeqCst);
    }

    fn spawn_update_loop(self: Arc<Self>) {
        tokio::spawn(async move {
            let mut offset: Option<i64> = None;
            while self.running.load(Ordering::SeqCst) {
                match self.client.get_updates(offset, self.poll_timeout).await {
                    Ok(updates) => offset = self.handle_updates(&updates, offset).await,
                    Err(e) => {
                        error!("Error polling updates: {e}");
                        tokio::time::sleep(POLL_ERROR_DELAY).await;
                    }
                }
            }
            info!("Bot update loop stopped.");
        });
    }

    /// Handles a batch in order and returns the offset acknowledging it.
    pub async fn handle_updates(&self, updates: &[Update], offset: Option<i64>) -> Option<i64> {
        let mut offset = offset;
        for update in updates {
            self.handle_update(update).await;
            offset = offset.max(Some(update.update_id + 1));
        }
        offset
    }

    #[tracing::instrument(skip(self, update), fields(update_id = update.update_id))]
    async fn handle_update(&self, update: &Update) {
        let Some(message) = update.any_message() else {
            return;
        };
        let Some(text) = message.text.as_deref() else {
            return;
        };
        let chat_id = message.chat.id.to_string();

        let reply = match Command::parse(text, self.username.get().map(String::as_str)) {
            Ok(Some(command)) => self.handler.handle(&chat_id, command).await,
            Ok(None) => {
                debug!("Ignoring non-command message in chat {chat_id}");
                return;
            }
            Err(e) => Reply::plain(format!("⚠️ {e}")),
        };

        if let Err(e) = self.sender.send_request(&reply.into_request(&chat_id)).await {
            error!("Error replying to chat_id {chat_id}: {e}");
            // The rejected reply may have been malformed markup; tell the user in plain text.
            let notice = Reply::plain(DELIVERY_FAILED).into_request(&chat_id);
            if let Err(e) = self.sender.send_request(&notice).await {
                error!("Error sending failure notice to chat_id {chat_id}: {e}");
            }
        }
    }
}
