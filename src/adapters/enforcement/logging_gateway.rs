//! Dry-run enforcement gateway.
//!
//! Logs every directive and message instead of calling the platform. Nobody is treated as an
//! admin, so every message goes through moderation.

use crate::adapters::enforcement::bot_api_gateway::notice_text;
use crate::domain::{DomainError, PunishmentEvent};
use crate::ports::EnforcementGateway;
use tracing::info;

#[derive(Debug, Default)]
pub struct LoggingGateway;

impl LoggingGateway {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl EnforcementGateway for LoggingGateway {
    async fn enforce(&self, event: &PunishmentEvent) -> Result<(), DomainError> {
        info!(
            chat_id = event.chat_id,
            user_id = event.user_id,
            strikes = event.strikes,
            directive = ?event.directive,
            reason = %event.reason_label,
            notice = %notice_text(event),
            "[DRY RUN] would enforce directive"
        );
        Ok(())
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), DomainError> {
        info!(chat_id, text, "[DRY RUN] would send message");
        Ok(())
    }

    async fn is_chat_admin(&self, _chat_id: i64, _user_id: i64) -> Result<bool, DomainError> {
        Ok(false)
    }

    async fn lift_restrictions(&self, chat_id: i64, user_id: i64) -> Result<(), DomainError> {
        info!(chat_id, user_id, "[DRY RUN] would lift restrictions");
        Ok(())
    }

    async fn ban(&self, chat_id: i64, user_id: i64) -> Result<(), DomainError> {
        info!(chat_id, user_id, "[DRY RUN] would ban");
        Ok(())
    }
}
