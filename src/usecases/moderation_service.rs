//! Moderation pipeline: verdict → strike → directive → enforcement.
//!
//! - Evaluates each message with the ModerationEngine
//! - Records the strike in StrikeStore before deciding (the count must be durable first)
//! - Decides the directive with PunishmentPolicy and hands it to EnforcementGateway

use crate::domain::{DomainError, MessageEvent, ModerationEngine, PunishmentEvent, PunishmentPolicy};
use crate::ports::{EnforcementGateway, StrikeStore};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct ModerationService {
    engine: Arc<ModerationEngine>,
    policy: PunishmentPolicy,
    store: Arc<dyn StrikeStore>,
    gateway: Arc<dyn EnforcementGateway>,
}

impl ModerationService {
    pub fn new(
        engine: Arc<ModerationEngine>,
        policy: PunishmentPolicy,
        store: Arc<dyn StrikeStore>,
        gateway: Arc<dyn EnforcementGateway>,
    ) -> Self {
        Self {
            engine,
            policy,
            store,
            gateway,
        }
    }

    /// Handle one message from a non-admin sender.
    ///
    /// Returns the emitted punishment, or `None` for a clean message. Storage failures are
    /// returned and no directive is issued. Enforcement failures are logged only: the
    /// directive counts as emitted once handed to the gateway.
    pub async fn handle_message(
        &self,
        event: &MessageEvent,
    ) -> Result<Option<PunishmentEvent>, DomainError> {
        let verdict = self.engine.evaluate(event);
        let Some(reason) = verdict.reason_label() else {
            return Ok(None);
        };
        debug!(
            chat_id = event.chat_id,
            user_id = event.user_id,
            ?verdict,
            "violation detected"
        );

        let strikes = self
            .store
            .increment_strikes(event.chat_id, event.user_id)
            .await?;
        let directive = self.policy.decide(strikes);
        let punishment = PunishmentEvent {
            chat_id: event.chat_id,
            user_id: event.user_id,
            strikes,
            directive,
            reason_label: reason.to_string(),
        };

        info!(
            chat_id = event.chat_id,
            user_id = event.user_id,
            strikes,
            ?directive,
            reason,
            "punishment decided"
        );

        if let Err(e) = self.gateway.enforce(&punishment).await {
            warn!(
                chat_id = event.chat_id,
                user_id = event.user_id,
                error = %e,
                "enforcement failed"
            );
        }

        Ok(Some(punishment))
    }

    /// See `ModerationEngine::evict_idle`.
    pub fn evict_idle(&self, now_secs: i64) -> usize {
        self.engine.evict_idle(now_secs)
    }
}
