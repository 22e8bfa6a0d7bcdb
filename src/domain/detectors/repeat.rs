//! Consecutive identical-message detection per (chat, user).
//!
//! The last-message cache is never evicted: any entry can still turn the next identical
//! message into a violation.

use crate::domain::ChatUserKey;
use dashmap::DashMap;

#[derive(Debug, Clone)]
struct LastMessage {
    text: String,
    repeat_count: u32,
}

pub struct RepeatDetector {
    last: DashMap<ChatUserKey, LastMessage>,
    repeat_max: u32,
}

impl RepeatDetector {
    pub fn new(repeat_max: u32) -> Self {
        Self {
            last: DashMap::new(),
            repeat_max,
        }
    }

    /// Compare normalized `text` with the previous message of `key`. Returns true when the
    /// same text has now been sent `repeat_max` times in a row. The run only ends when the
    /// text changes, so every further identical message fires too.
    pub fn record_and_check(&self, key: ChatUserKey, text: &str) -> bool {
        let normalized = normalize(text);
        let mut entry = self.last.entry(key).or_insert_with(|| LastMessage {
            text: String::new(),
            repeat_count: 0,
        });

        if entry.text == normalized {
            entry.repeat_count += 1;
        } else {
            entry.text = normalized;
            entry.repeat_count = 1;
        }

        entry.repeat_count >= self.repeat_max
    }

    pub fn tracked_keys(&self) -> usize {
        self.last.len()
    }
}

/// Lowercase and collapse runs of whitespace, trimming both ends.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
