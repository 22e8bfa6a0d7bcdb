//! Background eviction of drained rate windows.
//!
//! Runs on its own task; only drops windows no verdict can depend on anymore.

use crate::usecases::moderation_service::ModerationService;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub struct EvictionWorker {
    moderation: Arc<ModerationService>,
    interval: Duration,
}

impl EvictionWorker {
    pub fn new(moderation: Arc<ModerationService>, interval: Duration) -> Self {
        Self {
            moderation,
            interval,
        }
    }

    /// One pass. Returns the number of entries removed.
    pub fn sweep(&self, now_secs: i64) -> usize {
        let removed = self.moderation.evict_idle(now_secs);
        if removed > 0 {
            debug!(removed, "evicted drained rate windows");
        }
        removed
    }

    /// Sweep every `interval` until the task is dropped.
    pub async fn run(self) {
        info!(
            interval_secs = self.interval.as_secs(),
            "eviction worker started"
        );
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // First tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            self.sweep(chrono::Utc::now().timestamp());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        EngineConfig, EscalationTiers, MessageEvent, ModerationEngine, PunishmentPolicy,
    };
    use crate::usecases::test_support::{MemoryStore, RecordingGateway};

    #[tokio::test]
    async fn sweep_drops_drained_windows_and_keeps_verdicts() {
        let moderation = Arc::new(ModerationService::new(
            Arc::new(ModerationEngine::new(&EngineConfig::default())),
            PunishmentPolicy::new(EscalationTiers::default()),
            Arc::new(MemoryStore::default()),
            Arc::new(RecordingGateway::default()),
        ));
        for ts in [0, 100] {
            let clean = moderation
                .handle_message(&MessageEvent::new(1, 5, "hi", ts))
                .await
                .unwrap();
            assert_eq!(clean, None);
        }

        let worker = EvictionWorker::new(Arc::clone(&moderation), Duration::from_secs(60));
        // Window still open.
        assert_eq!(worker.sweep(101), 0);
        assert_eq!(worker.sweep(10_000), 1);

        let third = moderation
            .handle_message(&MessageEvent::new(1, 5, "hi", 10_001))
            .await
            .unwrap()
            .expect("third identical message is a flood");
        assert_eq!(third.reason_label, "Flood/Repeated messages");
    }
}
