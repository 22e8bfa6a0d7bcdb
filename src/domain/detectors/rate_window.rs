//! Sliding-window flood detection per (chat, user).
//!
//! Each key owns a deque of recent message timestamps. Entries older than
//! `now - window_secs` are dropped on every record, so a window never holds stale data.

use crate::domain::ChatUserKey;
use dashmap::DashMap;
use std::collections::VecDeque;

pub struct RateWindowTracker {
    windows: DashMap<ChatUserKey, VecDeque<i64>>,
    window_secs: i64,
    max_messages: usize,
}

impl RateWindowTracker {
    pub fn new(window_secs: i64, max_messages: usize) -> Self {
        Self {
            windows: DashMap::new(),
            window_secs,
            max_messages,
        }
    }

    /// Record a message at `timestamp` and return true if the window now holds more than
    /// `max_messages` entries (this one included). Every message past the threshold fires
    /// until old entries leave the window.
    pub fn record_and_check(&self, key: ChatUserKey, timestamp: i64) -> bool {
        let cutoff = timestamp - self.window_secs;
        let mut window = self.windows.entry(key).or_default();

        while window.front().is_some_and(|&t| t < cutoff) {
            window.pop_front();
        }
        window.push_back(timestamp);

        window.len() > self.max_messages
    }

    /// Drop windows whose newest entry is already outside the window at `now`.
    /// Such windows would be emptied by the next record anyway, so verdicts are unaffected.
    pub fn evict_stale(&self, now: i64) -> usize {
        let cutoff = now - self.window_secs;
        let before = self.windows.len();
        self.windows
            .retain(|_, w| w.back().is_some_and(|&newest| newest >= cutoff));
        before - self.windows.len()
    }

    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}
