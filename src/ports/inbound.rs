//! Inbound port. Transport (adapter) feeds platform updates into the application.

use crate::domain::{DomainError, InboundUpdate};

/// Source of normalized platform updates (long polling, webhook, replay file).
#[async_trait::async_trait]
pub trait UpdateSource: Send + Sync {
    /// Wait for the next batch. An empty batch is valid (poll timeout).
    async fn next_batch(&self) -> Result<Vec<InboundUpdate>, DomainError>;
}
