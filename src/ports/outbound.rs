//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{ChatSettings, DomainError, PunishmentEvent};

/// Durable strike counters and per-chat settings. The only persisted state.
///
/// Every operation is keyed by `(chat_id, user_id)` or `chat_id`; nothing leaks across chats.
#[async_trait::async_trait]
pub trait StrikeStore: Send + Sync {
    /// Atomically add one strike and return the new count. A missing record starts at 0.
    /// The returned count is durable when this resolves.
    async fn increment_strikes(&self, chat_id: i64, user_id: i64) -> Result<u32, DomainError>;

    /// Reset the user's strikes in this chat to 0.
    async fn forgive(&self, chat_id: i64, user_id: i64) -> Result<(), DomainError>;

    /// Current strikes. Returns 0 if none.
    async fn get_strikes(&self, chat_id: i64, user_id: i64) -> Result<u32, DomainError>;

    /// Configured texts; `None` per unset field.
    async fn get_chat_settings(&self, chat_id: i64) -> Result<ChatSettings, DomainError>;

    async fn set_welcome(&self, chat_id: i64, text: &str) -> Result<(), DomainError>;

    async fn set_rules(&self, chat_id: i64, text: &str) -> Result<(), DomainError>;
}

/// Chat platform moderation actions and notifications.
#[async_trait::async_trait]
pub trait EnforcementGateway: Send + Sync {
    /// Carry out a decided punishment (warn notice, timed mute, ban).
    async fn enforce(&self, event: &PunishmentEvent) -> Result<(), DomainError>;

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), DomainError>;

    /// True if the user is an administrator or the creator of the chat.
    async fn is_chat_admin(&self, chat_id: i64, user_id: i64) -> Result<bool, DomainError>;

    /// Give back the default member permissions (manual unmute).
    async fn lift_restrictions(&self, chat_id: i64, user_id: i64) -> Result<(), DomainError>;

    /// Manual ban, outside of strike escalation.
    async fn ban(&self, chat_id: i64, user_id: i64) -> Result<(), DomainError>;
}
