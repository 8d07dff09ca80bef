//! Slash-command parsing and the command menu.

use crate::bot::error::BotError;
use crate::telegram::model::BotCommand;
use crate::telegram::model::ReplyKeyboardMarkup;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    UploadWorkout,
    GetWod { date: Option<String> },
    AnalyzeWorkout,
    Unknown { name: String },
}

impl Command {
    /// Parses `/name[@bot] [args]`. Returns `Ok(None)` for text that is not a command
    /// and for commands addressed to a bot other than `bot_username`.
    ///
    /// When `bot_username` is unknown, any `@bot` suffix is accepted.
    pub fn parse(text: &str, bot_username: Option<&str>) -> Result<Option<Self>, BotError> {
        let text = text.trim();
        let Some(rest) = text.strip_prefix('/') else {
            return Ok(None);
        };

        let mut parts = rest.split_whitespace();
        let Some(head) = parts.next() else {
            return Ok(None);
        };
        let (name, addressee) = match head.split_once('@') {
            Some((name, addressee)) => (name, Some(addressee)),
            None => (head, None),
        };
        if let (Some(addressee), Some(username)) = (addressee, bot_username)
            && !addressee.eq_ignore_ascii_case(username.trim_start_matches('@'))
        {
            return Ok(None);
        }
        let name = name.to_lowercase();
        let args: Vec<&str> = parts.collect();

        let command = match name.as_str() {
            "start" => Command::Start,
            "stop" => Command::Stop,
            "upload_workout" => Command::UploadWorkout,
            "analyze_workout" => Command::AnalyzeWorkout,
            "get_wod" => match args.as_slice() {
                [] => Command::GetWod { date: None },
                [date] => Command::GetWod {
                    date: Some(date.to_string()),
                },
                _ => {
                    return Err(BotError::InvalidCommandArgument {
                        parameter: "date".to_string(),
                        reason: "expected at most one date, e.g. /get_wod 2024-03-20".to_string(),
                    });
                }
            },
            _ => Command::Unknown { name },
        };
        Ok(Some(command))
    }
}

/// Commands shown in the Telegram command menu.
pub fn menu() -> Vec<BotCommand> {
    vec![
        BotCommand::new("start", "Subscribe to daily workouts"),
        BotCommand::new("stop", "Unsubscribe"),
        BotCommand::new("upload_workout", "Upload workout for AI analysis"),
        BotCommand::new("get_wod", "Get today's and tomorrow's workouts"),
        BotCommand::new("analyze_workout", "AI analysis of today's workout"),
    ]
}

pub fn main_menu_keyboard() -> ReplyKeyboardMarkup {
    ReplyKeyboardMarkup::new(&[&["/start", "/stop"], &["/upload_workout"]])
}
