//! Moderation engine: composes the detectors into one verdict per message.

use crate::domain::detectors::{LinkSpamMatcher, RateWindowTracker, RepeatDetector};
use crate::domain::{MessageEvent, Verdict};

pub const DEFAULT_FLOOD_WINDOW_SECS: i64 = 8;
pub const DEFAULT_FLOOD_MAX_MESSAGES: usize = 6;
pub const DEFAULT_REPEAT_MAX: u32 = 3;

/// Immutable detector configuration, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub flood_window_secs: i64,
    pub flood_max_messages: usize,
    pub repeat_max: u32,
    pub link_spam_enabled: bool,
    pub link_allowlist: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            flood_window_secs: DEFAULT_FLOOD_WINDOW_SECS,
            flood_max_messages: DEFAULT_FLOOD_MAX_MESSAGES,
            repeat_max: DEFAULT_REPEAT_MAX,
            link_spam_enabled: true,
            link_allowlist: Vec::new(),
        }
    }
}

pub struct ModerationEngine {
    rate: RateWindowTracker,
    repeat: RepeatDetector,
    links: LinkSpamMatcher,
}

impl ModerationEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            rate: RateWindowTracker::new(config.flood_window_secs, config.flood_max_messages),
            repeat: RepeatDetector::new(config.repeat_max),
            links: LinkSpamMatcher::new(config.link_spam_enabled, &config.link_allowlist),
        }
    }

    /// Evaluate one message. Order is fixed and the first match wins:
    ///
    /// 1. rate window exceeded → `Flood`
    /// 2. same text repeated `repeat_max` times → `Flood`
    /// 3. unauthorized link → `LinkSpam`
    ///
    /// A message therefore yields at most one violation. Both flood detectors record every
    /// message, whichever of them fires.
    pub fn evaluate(&self, event: &MessageEvent) -> Verdict {
        let key = event.key();
        let rate_exceeded = self.rate.record_and_check(key, event.timestamp_secs);
        let repeated = self.repeat.record_and_check(key, &event.text);
        if rate_exceeded || repeated {
            return Verdict::Flood;
        }
        if self.links.is_spam(&event.text) {
            return Verdict::LinkSpam;
        }
        Verdict::None
    }

    /// Drop rate windows that are already empty at `now_secs`. Returns the number removed.
    pub fn evict_idle(&self, now_secs: i64) -> usize {
        self.rate.evict_stale(now_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(config: EngineConfig) -> ModerationEngine {
        ModerationEngine::new(&config)
    }

    fn msg(chat: i64, user: i64, text: &str, ts: i64) -> MessageEvent {
        MessageEvent::new(chat, user, text, ts)
    }

    #[test]
    fn seventh_message_in_five_seconds_is_flood() {
        let e = engine(EngineConfig {
            flood_window_secs: 8,
            flood_max_messages: 6,
            ..EngineConfig::default()
        });
        let texts = ["a", "b", "c", "d", "e", "f"];
        for (i, t) in texts.iter().enumerate() {
            assert_eq!(e.evaluate(&msg(1, 5, t, i as i64 / 2)), Verdict::None);
        }
        assert_eq!(e.evaluate(&msg(1, 5, "g", 5)), Verdict::Flood);
    }

    #[test]
    fn triple_repeat_is_flood() {
        let e = engine(EngineConfig::default());
        assert_eq!(e.evaluate(&msg(1, 5, "hi", 0)), Verdict::None);
        assert_eq!(e.evaluate(&msg(1, 5, "hi", 10)), Verdict::None);
        assert_eq!(e.evaluate(&msg(1, 5, "hi", 20)), Verdict::Flood);
    }

    #[test]
    fn link_in_clean_message_is_link_spam() {
        let e = engine(EngineConfig::default());
        assert_eq!(
            e.evaluate(&msg(1, 5, "free coins at https://scam.xyz", 0)),
            Verdict::LinkSpam
        );
    }

    #[test]
    fn flood_takes_precedence_over_link_spam() {
        let e = engine(EngineConfig {
            flood_max_messages: 1,
            ..EngineConfig::default()
        });
        assert_eq!(e.evaluate(&msg(1, 5, "hello", 0)), Verdict::None);
        assert_eq!(
            e.evaluate(&msg(1, 5, "https://scam.xyz", 0)),
            Verdict::Flood
        );
    }

    #[test]
    fn repeat_takes_precedence_over_link_spam() {
        let link = "https://scam.xyz";
        let e = engine(EngineConfig {
            repeat_max: 2,
            ..EngineConfig::default()
        });
        assert_eq!(e.evaluate(&msg(1, 5, link, 0)), Verdict::LinkSpam);
        assert_eq!(e.evaluate(&msg(1, 5, link, 30)), Verdict::Flood);
    }

    #[test]
    fn disabled_link_check_lets_links_through() {
        let e = engine(EngineConfig {
            link_spam_enabled: false,
            ..EngineConfig::default()
        });
        assert_eq!(e.evaluate(&msg(1, 5, "t.me/+invite", 0)), Verdict::None);
    }

    #[test]
    fn users_in_different_chats_are_evaluated_independently() {
        let e = engine(EngineConfig {
            flood_max_messages: 2,
            ..EngineConfig::default()
        });
        assert_eq!(e.evaluate(&msg(1, 5, "a", 0)), Verdict::None);
        assert_eq!(e.evaluate(&msg(1, 5, "b", 0)), Verdict::None);
        assert_eq!(e.evaluate(&msg(2, 5, "c", 0)), Verdict::None);
        assert_eq!(e.evaluate(&msg(1, 5, "d", 0)), Verdict::Flood);
    }

    #[test]
    fn eviction_does_not_change_later_verdicts() {
        let e = engine(EngineConfig {
            flood_max_messages: 2,
            ..EngineConfig::default()
        });
        e.evaluate(&msg(1, 5, "a", 0));
        e.evaluate(&msg(1, 5, "b", 1));
        assert_eq!(e.evict_idle(2), 0);
        assert_eq!(e.evaluate(&msg(1, 5, "c", 2)), Verdict::Flood);
    }

    #[test]
    fn repeat_run_survives_eviction_sweeps() {
        let e = engine(EngineConfig::default());
        assert_eq!(e.evaluate(&msg(1, 5, "hi", 0)), Verdict::None);
        assert_eq!(e.evaluate(&msg(1, 5, "hi", 100)), Verdict::None);
        // The rate window is drained by now and goes; the repeat run stays.
        assert_eq!(e.evict_idle(200), 1);
        assert_eq!(e.evaluate(&msg(1, 5, "hi", 300)), Verdict::Flood);
    }

    #[test]
    fn repeat_state_advances_while_rate_flood_fires() {
        let e = engine(EngineConfig {
            flood_max_messages: 1,
            ..EngineConfig::default()
        });
        assert_eq!(e.evaluate(&msg(1, 5, "hi", 0)), Verdict::None);
        assert_eq!(e.evaluate(&msg(1, 5, "hi", 0)), Verdict::Flood);
        // Past the window: only the repeat run (now at three) can fire.
        assert_eq!(e.evaluate(&msg(1, 5, "hi", 60)), Verdict::Flood);
    }
}
