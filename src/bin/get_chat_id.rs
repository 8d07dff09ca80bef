//! Prints the chat ids seen in the bot's pending updates.

use std::time::Duration;

use anyhow::Result;
use dotenv::dotenv;
use wod_bot::config::Config;
use wod_bot::error::AppError;
use wod_bot::telegram::TelegramClient;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Only the bot token is needed here, so the full config is not loaded.
    let token = std::env::var("TELEGRAM_BOT_TOKEN").map_err(|_| AppError::MissingConfig {
        key: "TELEGRAM_BOT_TOKEN".to_string(),
    })?;
    let api_url =
        std::env::var("TELEGRAM_API_URL").unwrap_or_else(|_| Config::new().telegram_api_url);

    let client = TelegramClient::new(&api_url, &token)?;
    let updates = client.get_updates(None, Duration::ZERO).await?;

    println!("\nAll updates:");
    for update in &updates {
        println!("\nUpdate ID: {}", update.update_id);
        if let Some(message) = update.any_message() {
            println!("Chat ID: {}", message.chat.id);
            if let Some(from) = &message.from {
                println!("From User: {}", from.display_name());
            }
            println!("Message: {}", message.text.as_deref().unwrap_or(""));
        }
        println!("{}", "-".repeat(50));
    }

    if updates.is_empty() {
        println!("\nNo updates found. Try sending a message to your bot first!");
    }

    Ok(())
}
