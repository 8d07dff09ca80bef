//! Turns parsed commands into replies.

use std::sync::Arc;

use log::error;
use log::info;

use crate::bot::command::Command;
use crate::bot::command::main_menu_keyboard;
use crate::service::Services;
use crate::service::error::ServiceError;
use crate::subscriber::SubscribeResult;
use crate::subscriber::UnsubscribeResult;
use crate::telegram::model::ParseMode;
use crate::telegram::model::ReplyKeyboardMarkup;
use crate::telegram::model::SendMessage;

pub const SUBSCRIBED: &str =
    "🎉 Subscribed! You'll get daily workouts here.\n\nUse the menu below to see available commands.";
pub const ALREADY_SUBSCRIBED: &str = "✅ You're already subscribed!";
pub const UNSUBSCRIBED: &str = "🛑 Unsubscribed. You will no longer receive messages.";
pub const NOT_SUBSCRIBED: &str = "ℹ️ You weren't subscribed.";
pub const UPLOAD_PLACEHOLDER: &str = "📤 Great! Send me a photo or data file of your workout, and I'll run it through our AI analyzer (coming soon…).";
pub const FETCH_FAILED: &str =
    "⚠️ Couldn't reach the workout service right now. Please try again later.";
pub const STORE_FAILED: &str = "⚠️ Couldn't update your subscription. Please try again later.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub mode: ParseMode,
    pub keyboard: Option<ReplyKeyboardMarkup>,
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode: ParseMode::Plain,
            keyboard: None,
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            mode: ParseMode::Markdown,
            ..Self::plain(text)
        }
    }

    pub fn with_menu(mut self) -> Self {
        self.keyboard = Some(main_menu_keyboard());
        self
    }

    pub fn into_request(self, chat_id: &str) -> SendMessage {
        let request = SendMessage::new(chat_id, &self.text).parse_mode(self.mode);
        match self.keyboard {
            Some(keyboard) => request.keyboard(keyboard),
            None => request,
        }
    }
}

pub struct CommandHandler {
    services: Arc<Services>,
}

impl CommandHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }

    pub async fn handle(&self, chat_id: &str, command: Command) -> Reply {
        info!("Handling {command:?} from chat {chat_id}");
        match command {
            Command::Start => self.start(chat_id).await,
            Command::Stop => self.stop(chat_id).await,
            Command::UploadWorkout => Reply::plain(UPLOAD_PLACEHOLDER).with_menu(),
            Command::GetWod { date } => self.get_wod(date.as_deref()).await,
            Command::AnalyzeWorkout => Reply::plain(self.services.wod.analyze_today().await),
            Command::Unknown { name } => Reply::plain(format!(
                "Unknown command /{name}. Try /get_wod, /analyze_workout, /start or /stop."
            )),
        }
    }

    async fn start(&self, chat_id: &str) -> Reply {
        match self.services.subscriptions.subscribe(chat_id).await {
            Ok(SubscribeResult::Subscribed) => Reply::plain(SUBSCRIBED).with_menu(),
            Ok(SubscribeResult::AlreadySubscribed) => Reply::plain(ALREADY_SUBSCRIBED),
            Err(e) => {
                error!("Failed to subscribe chat {chat_id}: {e}");
                Reply::plain(STORE_FAILED)
            }
        }
    }

    async fn stop(&self, chat_id: &str) -> Reply {
        match self.services.subscriptions.unsubscribe(chat_id).await {
            Ok(UnsubscribeResult::Unsubscribed) => Reply::plain(UNSUBSCRIBED),
            Ok(UnsubscribeResult::NotSubscribed) => Reply::plain(NOT_SUBSCRIBED),
            Err(e) => {
                error!("Failed to unsubscribe chat {chat_id}: {e}");
                Reply::plain(STORE_FAILED)
            }
        }
    }

    async fn get_wod(&self, date: Option<&str>) -> Reply {
        match self.services.wod.message_for(date, true).await {
            Ok(message) => Reply::markdown(message),
            Err(ServiceError::DateWindowError(e)) => Reply::plain(format!("⚠️ {e}")),
            Err(e) => {
                error!("Failed to build workout message: {e}");
                Reply::plain(FETCH_FAILED)
            }
        }
    }
}
