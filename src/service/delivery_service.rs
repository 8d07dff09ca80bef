//! Message delivery to one destination or many.

use std::sync::Arc;

use futures::StreamExt;
use futures::stream;
use log::error;
use log::info;

use crate::telegram::MessageSender;
use crate::telegram::error::TelegramError;
use crate::telegram::model::ParseMode;

/// Outcome of a broadcast.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub sent: usize,
    pub failed: Vec<String>,
}

pub struct DeliveryService {
    sender: Arc<dyn MessageSender>,
    concurrency: usize,
}

impl DeliveryService {
    /// `concurrency` caps the sends in flight during a broadcast; 1 delivers sequentially.
    pub fn new(sender: Arc<dyn MessageSender>, concurrency: usize) -> Self {
        Self {
            sender,
            concurrency: concurrency.max(1),
        }
    }

    /// Sends one message, logging the outcome.
    pub async fn deliver(
        &self,
        chat_id: &str,
        text: &str,
        mode: ParseMode,
    ) -> Result<(), TelegramError> {
        match self.sender.send_message(chat_id, text, mode).await {
            Ok(()) => {
                info!("Message sent successfully to chat_id: {chat_id}");
                Ok(())
            }
            Err(e) => {
                error!("Error sending message to chat_id {chat_id}: {e}");
                Err(e)
            }
        }
    }

    /// Sends the same message to every target. A failed send never stops the others.
    pub async fn broadcast(&self, targets: &[String], text: &str, mode: ParseMode) -> BroadcastReport {
        let results: Vec<(String, bool)> = stream::iter(targets.iter().cloned())
            .map(|chat_id| async move {
                let ok = self.deliver(&chat_id, text, mode).await.is_ok();
                (chat_id, ok)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut report = BroadcastReport::default();
        for (chat_id, ok) in results {
            if ok {
                report.sent += 1;
            } else {
                report.failed.push(chat_id);
            }
        }
        info!(
            "Broadcast finished: {} sent, {} failed.",
            report.sent,
            report.failed.len()
        );
        report
    }
}
