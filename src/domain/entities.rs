//! Domain entities. Pure data structures for the core business.
//!
//! No Telegram or I/O types here; adapters map into these.

use serde::{Deserialize, Serialize};

/// Composite key for all per-user moderation state. A user is tracked independently per chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatUserKey {
    pub chat_id: i64,
    pub user_id: i64,
}

impl ChatUserKey {
    pub fn new(chat_id: i64, user_id: i64) -> Self {
        Self { chat_id, user_id }
    }
}

/// A text or caption-bearing message, normalized by the transport.
/// The text is assumed non-empty; callers drop messages without text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEvent {
    pub chat_id: i64,
    pub user_id: i64,
    pub text: String,
    pub timestamp_secs: i64,
}

impl MessageEvent {
    pub fn new(chat_id: i64, user_id: i64, text: impl Into<String>, timestamp_secs: i64) -> Self {
        Self {
            chat_id,
            user_id,
            text: text.into(),
            timestamp_secs,
        }
    }

    pub fn key(&self) -> ChatUserKey {
        ChatUserKey::new(self.chat_id, self.user_id)
    }
}

/// Outcome of evaluating one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    None,
    /// Rate window exceeded or the same text repeated too often.
    Flood,
    LinkSpam,
}

impl Verdict {
    /// Human-readable reason surfaced to moderators and users. `None` for clean messages.
    pub fn reason_label(self) -> Option<&'static str> {
        match self {
            Verdict::None => None,
            Verdict::Flood => Some("Flood/Repeated messages"),
            Verdict::LinkSpam => Some("Link spam / unauthorized link"),
        }
    }
}

/// Punishment decided for a strike count, independent of how it is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Directive {
    Warn,
    Mute { duration_secs: u64 },
    Ban,
}

impl Directive {
    /// Total order over severity: warn < any mute (longer is harsher) < ban.
    pub fn severity(&self) -> (u8, u64) {
        match self {
            Directive::Warn => (0, 0),
            Directive::Mute { duration_secs } => (1, *duration_secs),
            Directive::Ban => (2, 0),
        }
    }
}

/// Handed to the enforcement gateway once the strike is durably recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunishmentEvent {
    pub chat_id: i64,
    pub user_id: i64,
    pub strikes: u32,
    pub directive: Directive,
    pub reason_label: String,
}

/// Per-chat texts. `None` means "use the configured default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSettings {
    pub welcome_text: Option<String>,
    pub rules_text: Option<String>,
}

impl ChatSettings {
    pub fn welcome_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.welcome_text.as_deref().unwrap_or(default)
    }

    pub fn rules_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.rules_text.as_deref().unwrap_or(default)
    }
}

/// A user that just joined a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMember {
    pub user_id: i64,
    pub first_name: String,
}

/// Platform update after mapping. Anything the bot does not act on is dropped by the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundUpdate {
    Message(MessageEvent),
    NewMembers {
        chat_id: i64,
        members: Vec<NewMember>,
    },
}

impl InboundUpdate {
    pub fn chat_id(&self) -> i64 {
        match self {
            InboundUpdate::Message(m) => m.chat_id,
            InboundUpdate::NewMembers { chat_id, .. } => *chat_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_violations_carry_a_reason() {
        assert_eq!(Verdict::None.reason_label(), None);
        assert_eq!(Verdict::Flood.reason_label(), Some("Flood/Repeated messages"));
        assert_eq!(
            Verdict::LinkSpam.reason_label(),
            Some("Link spam / unauthorized link")
        );
    }
}
