//! Implements EnforcementGateway on top of the Bot API client.
//!
//! Warn → notice only. Mute → restrict until `now + duration`, then notice.
//! Ban → ban, then notice. The notice is sent only after the action succeeded.

use crate::adapters::telegram::{BotApiClient, ChatPermissions};
use crate::domain::{Directive, DomainError, PunishmentEvent};
use crate::ports::EnforcementGateway;
use std::sync::Arc;
use tracing::info;

/// Telegram treats restrictions shorter than 30 seconds as permanent.
const MIN_RESTRICT_SECS: u64 = 31;

pub struct BotApiGateway {
    api: Arc<BotApiClient>,
}

impl BotApiGateway {
    pub fn new(api: Arc<BotApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl EnforcementGateway for BotApiGateway {
    async fn enforce(&self, event: &PunishmentEvent) -> Result<(), DomainError> {
        match event.directive {
            Directive::Warn => {}
            Directive::Mute { duration_secs } => {
                let secs = duration_secs.max(MIN_RESTRICT_SECS);
                let until = chrono::Utc::now().timestamp()
                    + i64::try_from(secs).unwrap_or(i64::MAX / 2);
                self.api
                    .restrict_chat_member(
                        event.chat_id,
                        event.user_id,
                        ChatPermissions::muted(),
                        Some(until),
                    )
                    .await?;
            }
            Directive::Ban => {
                self.api
                    .ban_chat_member(event.chat_id, event.user_id)
                    .await?;
            }
        }
        info!(
            chat_id = event.chat_id,
            user_id = event.user_id,
            directive = ?event.directive,
            "directive enforced"
        );
        self.api
            .send_message(event.chat_id, &notice_text(event))
            .await
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), DomainError> {
        self.api.send_message(chat_id, text).await
    }

    async fn is_chat_admin(&self, chat_id: i64, user_id: i64) -> Result<bool, DomainError> {
        let status = self.api.get_chat_member_status(chat_id, user_id).await?;
        Ok(matches!(status.as_str(), "administrator" | "creator"))
    }

    async fn lift_restrictions(&self, chat_id: i64, user_id: i64) -> Result<(), DomainError> {
        self.api
            .restrict_chat_member(chat_id, user_id, ChatPermissions::member_defaults(), None)
            .await
    }

    async fn ban(&self, chat_id: i64, user_id: i64) -> Result<(), DomainError> {
        self.api.ban_chat_member(chat_id, user_id).await
    }
}

/// Chat notice for a punishment.
pub fn notice_text(event: &PunishmentEvent) -> String {
    let who = event.user_id;
    let why = &event.reason_label;
    let n = event.strikes;
    match event.directive {
        Directive::Warn => format!(
            "⚠️ Warning for user {who}: {why}. Strike {n}; further violations lead to a mute."
        ),
        Directive::Mute { duration_secs } => format!(
            "🔇 User {who} muted for {}: {why}. Strike {n}.",
            human_duration(duration_secs)
        ),
        Directive::Ban => format!("⛔ User {who} banned: {why}. Strike {n}."),
    }
}

/// "45s", "5m", "1h 30m", "2d 3h".
pub fn human_duration(secs: u64) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 60 * MINUTE;
    const DAY: u64 = 24 * HOUR;

    let (days, rest) = (secs / DAY, secs % DAY);
    let (hours, rest) = (rest / HOUR, rest % HOUR);
    let (minutes, seconds) = (rest / MINUTE, rest % MINUTE);

    let parts: Vec<String> = [(days, "d"), (hours, "h"), (minutes, "m"), (seconds, "s")]
        .into_iter()
        .filter(|(v, _)| *v > 0)
        .map(|(v, unit)| format!("{v}{unit}"))
        .take(2)
        .collect();
    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}
