//! Telegram Bot API adapter: HTTP client, update mapping, long polling.

pub mod bot_api;
pub mod mapper;
pub mod poller;

pub use bot_api::{BotApiClient, ChatPermissions};
pub use poller::LongPollSource;
