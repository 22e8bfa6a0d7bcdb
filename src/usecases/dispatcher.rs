//! Update dispatcher: routes normalized platform updates to the use cases.
//!
//! Messages from bot owners and chat administrators bypass moderation. New-member events get
//! the chat's welcome text. Each polled batch is split by chat; chats run concurrently,
//! updates of one chat run in arrival order.

use crate::domain::{DomainError, InboundUpdate, MessageEvent};
use crate::ports::{EnforcementGateway, StrikeStore, UpdateSource};
use crate::usecases::admin_service::AdminService;
use crate::usecases::moderation_service::ModerationService;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

pub struct UpdateDispatcher {
    moderation: Arc<ModerationService>,
    admin: Arc<AdminService>,
    store: Arc<dyn StrikeStore>,
    gateway: Arc<dyn EnforcementGateway>,
    default_welcome: String,
}

impl UpdateDispatcher {
    pub fn new(
        moderation: Arc<ModerationService>,
        admin: Arc<AdminService>,
        store: Arc<dyn StrikeStore>,
        gateway: Arc<dyn EnforcementGateway>,
        default_welcome: impl Into<String>,
    ) -> Self {
        Self {
            moderation,
            admin,
            store,
            gateway,
            default_welcome: default_welcome.into(),
        }
    }

    /// Handle one update.
    pub async fn dispatch(&self, update: InboundUpdate) -> Result<(), DomainError> {
        match update {
            InboundUpdate::Message(event) => self.on_message(&event).await,
            InboundUpdate::NewMembers { chat_id, members } => {
                debug!(chat_id, count = members.len(), "new members");
                self.welcome(chat_id).await
            }
        }
    }

    async fn on_message(&self, event: &MessageEvent) -> Result<(), DomainError> {
        if self.admin.is_owner(event.user_id) {
            return Ok(());
        }
        let is_admin = match self
            .gateway
            .is_chat_admin(event.chat_id, event.user_id)
            .await
        {
            Ok(v) => v,
            Err(e) => {
                debug!(
                    chat_id = event.chat_id,
                    user_id = event.user_id,
                    error = %e,
                    "admin lookup failed; moderating"
                );
                false
            }
        };
        if is_admin {
            return Ok(());
        }
        self.moderation.handle_message(event).await.map(|_| ())
    }

    async fn welcome(&self, chat_id: i64) -> Result<(), DomainError> {
        let text = match self.store.get_chat_settings(chat_id).await {
            Ok(settings) => settings.welcome_or(&self.default_welcome).to_string(),
            Err(e) => {
                warn!(chat_id, error = %e, "chat settings unavailable; using default welcome");
                self.default_welcome.clone()
            }
        };
        self.gateway.send_message(chat_id, &text).await
    }

    /// Dispatch one batch: one task per chat, waits for all of them.
    pub async fn dispatch_batch(self: &Arc<Self>, batch: Vec<InboundUpdate>) {
        let mut by_chat: HashMap<i64, Vec<InboundUpdate>> = HashMap::new();
        for update in batch {
            by_chat.entry(update.chat_id()).or_default().push(update);
        }

        let mut tasks = JoinSet::new();
        for (chat_id, updates) in by_chat {
            let this = Arc::clone(self);
            tasks.spawn(async move {
                for update in updates {
                    if let Err(e) = this.dispatch(update).await {
                        warn!(chat_id, error = %e, "update handling failed");
                    }
                }
            });
        }
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "dispatch task panicked");
            }
        }
    }

    /// Poll `source` forever. Flood waits sleep the requested time; other poll errors back off
    /// exponentially up to a minute.
    pub async fn run(self: Arc<Self>, source: Arc<dyn UpdateSource>) {
        info!("update loop started");
        let mut backoff = INITIAL_BACKOFF;
        loop {
            match source.next_batch().await {
                Ok(batch) => {
                    backoff = INITIAL_BACKOFF;
                    if !batch.is_empty() {
                        debug!(count = batch.len(), "updates received");
                        self.dispatch_batch(batch).await;
                    }
                }
                Err(DomainError::FloodWait { seconds }) => {
                    warn!(seconds, "flood wait on polling");
                    tokio::time::sleep(Duration::from_secs(seconds)).await;
                }
                Err(e) => {
                    warn!(error = %e, backoff_secs = backoff.as_secs(), "polling failed; retrying");
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
            }
        }
    }
}
