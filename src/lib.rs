//! wod-bot - A Telegram bot that posts the CrossFit workout of the day.
//!
//! This crate provides:
//! - Workout fetching from the SugarWOD API, bucketed into today and tomorrow
//! - Workout analysis through an OpenAI chat-completion model
//! - A file-backed subscriber list managed with `/start` and `/stop`
//! - A daily scheduled broadcast to a channel and all subscribers

pub mod analysis;
pub mod bot;
pub mod config;
pub mod error;
pub mod logging;
pub mod service;
pub mod subscriber;
pub mod task;
pub mod telegram;
pub mod workout;
