//! Implements UpdateSource with `getUpdates` long polling.
//!
//! The offset advances past every received update, including ones the mapper drops,
//! so nothing is redelivered.

use crate::adapters::telegram::bot_api::BotApiClient;
use crate::adapters::telegram::mapper;
use crate::domain::{DomainError, InboundUpdate};
use crate::ports::UpdateSource;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

pub struct LongPollSource {
    api: Arc<BotApiClient>,
    offset: AtomicI64,
    timeout_secs: u64,
}

impl LongPollSource {
    pub fn new(api: Arc<BotApiClient>, timeout_secs: u64) -> Self {
        Self {
            api,
            offset: AtomicI64::new(0),
            timeout_secs,
        }
    }
}

#[async_trait::async_trait]
impl UpdateSource for LongPollSource {
    async fn next_batch(&self) -> Result<Vec<InboundUpdate>, DomainError> {
        let offset = self.offset.load(Ordering::Acquire);
        let updates = self.api.get_updates(offset, self.timeout_secs).await?;
        if let Some(max_id) = updates.iter().map(|u| u.update_id).max() {
            self.offset.fetch_max(max_id + 1, Ordering::AcqRel);
        }
        Ok(updates.iter().filter_map(mapper::update_to_domain).collect())
    }
}
