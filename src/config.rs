//! Environment-driven configuration.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveTime;

use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct Features {
    pub daily_broadcast: bool,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub telegram_bot_token: String,
    pub telegram_api_url: String,
    pub telegram_channel_id: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub sugarwod_api_key: String,
    pub sugarwod_api_url: String,
    pub openai_api_key: Option<String>,
    pub openai_api_url: String,
    pub openai_model: String,
    pub timezone: String,
    pub broadcast_time: NaiveTime,
    pub broadcast_concurrency: usize,
    pub subscribers_path: PathBuf,
    pub logs_path: PathBuf,
    pub poll_timeout: Duration,
    pub features: Features,
}

impl Config {
    /// Creates a config holding only defaults. Call [`Config::load`] to read the environment.
    pub fn new() -> Self {
        Self {
            telegram_bot_token: String::new(),
            telegram_api_url: "https://api.telegram.org".to_string(),
            telegram_channel_id: None,
            telegram_chat_id: None,
            sugarwod_api_key: String::new(),
            sugarwod_api_url: "https://api.sugarwod.com/v2".to_string(),
            openai_api_key: None,
            openai_api_url: "https://api.openai.com/v1".to_string(),
            openai_model: "gpt-4o".to_string(),
            timezone: "Asia/Jerusalem".to_string(),
            broadcast_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap_or(NaiveTime::MIN),
            broadcast_concurrency: 1,
            subscribers_path: PathBuf::from("subscribers.txt"),
            logs_path: PathBuf::from("logs"),
            poll_timeout: Duration::from_secs(30),
            features: Features {
                daily_broadcast: true,
            },
        }
    }

    /// Reads every known key from the process environment.
    pub fn load(&mut self) -> Result<(), AppError> {
        self.telegram_bot_token = required("TELEGRAM_BOT_TOKEN")?;
        self.sugarwod_api_key = required("SUGARWOD_API_KEY")?;

        self.telegram_channel_id = optional("TELEGRAM_CHANNEL_ID");
        self.telegram_chat_id = optional("TELEGRAM_CHAT_ID");
        self.openai_api_key = optional("OPENAI_API_KEY");

        if let Some(v) = optional("TELEGRAM_API_URL") {
            self.telegram_api_url = v;
        }
        if let Some(v) = optional("SUGARWOD_API_URL") {
            self.sugarwod_api_url = v;
        }
        if let Some(v) = optional("OPENAI_API_URL") {
            self.openai_api_url = v;
        }
        if let Some(v) = optional("OPENAI_MODEL") {
            self.openai_model = v;
        }
        if let Some(v) = optional("WOD_TIMEZONE") {
            self.timezone = v;
        }
        if let Some(v) = optional("BROADCAST_TIME") {
            self.broadcast_time = NaiveTime::parse_from_str(&v, "%H:%M").map_err(|e| {
                AppError::ConfigurationError {
                    msg: format!("BROADCAST_TIME `{v}` is not HH:MM: {e}"),
                }
            })?;
        }
        if let Some(v) = optional("BROADCAST_CONCURRENCY") {
            self.broadcast_concurrency = parse_number("BROADCAST_CONCURRENCY", &v)?.max(1);
        }
        if let Some(v) = optional("SUBSCRIBERS_PATH") {
            self.subscribers_path = PathBuf::from(v);
        }
        if let Some(v) = optional("LOGS_PATH") {
            self.logs_path = PathBuf::from(v);
        }
        if let Some(v) = optional("POLL_TIMEOUT") {
            self.poll_timeout = Duration::from_secs(parse_number("POLL_TIMEOUT", &v)? as u64);
        }
        if let Some(v) = optional("FEATURE_DAILY_BROADCAST") {
            self.features.daily_broadcast = parse_flag("FEATURE_DAILY_BROADCAST", &v)?;
        }

        Ok(())
    }

    /// Destinations of the scheduled post that do not come from the subscriber list.
    pub fn broadcast_channels(&self) -> Vec<String> {
        self.telegram_channel_id.iter().cloned().collect()
    }

    /// Destinations of a one-shot post: the channel, then the personal chat if it differs.
    pub fn one_shot_targets(&self) -> Vec<String> {
        let mut targets = self.broadcast_channels();
        if let Some(chat_id) = &self.telegram_chat_id
            && !targets.contains(chat_id)
        {
            targets.push(chat_id.clone());
        }
        targets
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn required(key: &str) -> Result<String, AppError> {
    optional(key).ok_or_else(|| AppError::MissingConfig {
        key: key.to_string(),
    })
}

/// Unset and blank values are treated the same.
fn optional(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_number(key: &str, value: &str) -> Result<usize, AppError> {
    value
        .parse::<usize>()
        .map_err(|e| AppError::ConfigurationError {
            msg: format!("{key} `{value}` is not a number: {e}"),
        })
}

fn parse_flag(key: &str, value: &str) -> Result<bool, AppError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::ConfigurationError {
            msg: format!("{key} `{value}` is not a boolean"),
        }),
    }
}
