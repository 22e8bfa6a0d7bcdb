//! Owner-gated administrative operations.
//!
//! Owners are the ids listed in `ADMIN_IDS`; chat administrators are not owners. Every mutating
//! call checks the caller first and returns `DomainError::Forbidden` otherwise.

use crate::domain::{ChatSettings, DomainError};
use crate::ports::{EnforcementGateway, StrikeStore};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

pub struct AdminService {
    owner_ids: HashSet<i64>,
    store: Arc<dyn StrikeStore>,
    gateway: Arc<dyn EnforcementGateway>,
    default_rules: String,
}

impl AdminService {
    pub fn new(
        owner_ids: HashSet<i64>,
        store: Arc<dyn StrikeStore>,
        gateway: Arc<dyn EnforcementGateway>,
        default_rules: impl Into<String>,
    ) -> Self {
        Self {
            owner_ids,
            store,
            gateway,
            default_rules: default_rules.into(),
        }
    }

    pub fn is_owner(&self, user_id: i64) -> bool {
        self.owner_ids.contains(&user_id)
    }

    fn require_owner(&self, caller_id: i64) -> Result<(), DomainError> {
        if self.is_owner(caller_id) {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!(
                "user {caller_id} is not a bot owner"
            )))
        }
    }

    /// Strike count of `target_id` in `chat_id`.
    pub async fn status(
        &self,
        caller_id: i64,
        chat_id: i64,
        target_id: i64,
    ) -> Result<u32, DomainError> {
        self.require_owner(caller_id)?;
        self.store.get_strikes(chat_id, target_id).await
    }

    pub async fn forgive(
        &self,
        caller_id: i64,
        chat_id: i64,
        target_id: i64,
    ) -> Result<(), DomainError> {
        self.require_owner(caller_id)?;
        self.store.forgive(chat_id, target_id).await?;
        info!(chat_id, target_id, caller_id, "strikes forgiven");
        Ok(())
    }

    /// Restore default member permissions. Strikes are left as they are.
    pub async fn unrestrict(
        &self,
        caller_id: i64,
        chat_id: i64,
        target_id: i64,
    ) -> Result<(), DomainError> {
        self.require_owner(caller_id)?;
        self.gateway.lift_restrictions(chat_id, target_id).await?;
        info!(chat_id, target_id, caller_id, "restrictions lifted");
        Ok(())
    }

    pub async fn ban(
        &self,
        caller_id: i64,
        chat_id: i64,
        target_id: i64,
    ) -> Result<(), DomainError> {
        self.require_owner(caller_id)?;
        self.gateway.ban(chat_id, target_id).await?;
        info!(chat_id, target_id, caller_id, "manual ban");
        Ok(())
    }

    pub async fn set_rules(
        &self,
        caller_id: i64,
        chat_id: i64,
        text: &str,
    ) -> Result<(), DomainError> {
        self.require_owner(caller_id)?;
        let text = non_empty(text, "rules")?;
        self.store.set_rules(chat_id, text).await?;
        info!(chat_id, caller_id, "rules updated");
        Ok(())
    }

    pub async fn set_welcome(
        &self,
        caller_id: i64,
        chat_id: i64,
        text: &str,
    ) -> Result<(), DomainError> {
        self.require_owner(caller_id)?;
        let text = non_empty(text, "welcome")?;
        self.store.set_welcome(chat_id, text).await?;
        info!(chat_id, caller_id, "welcome updated");
        Ok(())
    }

    /// Raw settings of a chat. Owner only.
    pub async fn chat_settings(
        &self,
        caller_id: i64,
        chat_id: i64,
    ) -> Result<ChatSettings, DomainError> {
        self.require_owner(caller_id)?;
        self.store.get_chat_settings(chat_id).await
    }

    /// Rules text for anyone: configured rules, else the default.
    pub async fn rules(&self, chat_id: i64) -> Result<String, DomainError> {
        let settings = self.store.get_chat_settings(chat_id).await?;
        Ok(settings.rules_or(&self.default_rules).to_string())
    }
}

fn non_empty<'a>(text: &'a str, what: &str) -> Result<&'a str, DomainError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(DomainError::InvalidInput(format!("{what} text is empty")))
    } else {
        Ok(trimmed)
    }
}
