//! Application configuration. Bot credentials, storage path, moderation thresholds.
//!
//! `AppConfig` is the raw view of the environment (and optional file); `validate()` turns it
//! into the immutable `Settings` handed to constructors.

use crate::domain::engine::{DEFAULT_FLOOD_MAX_MESSAGES, DEFAULT_FLOOD_WINDOW_SECS, DEFAULT_REPEAT_MAX};
use crate::domain::policy::{DEFAULT_BAN_THRESHOLD, DEFAULT_MUTE_BASE_SECS, DEFAULT_MUTE_MAX_SECS};
use crate::domain::{DomainError, EngineConfig, EscalationTiers};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DB_PATH: &str = "./data/bot.db";
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;
/// getUpdates rejects longer timeouts.
pub const MAX_POLL_TIMEOUT_SECS: u64 = 50;
pub const DEFAULT_EVICTION_INTERVAL_SECS: u64 = 300;

pub const DEFAULT_WELCOME: &str = "Welcome! ✅ Rules follow karo, spam mat karo 🙂";
pub const DEFAULT_RULES: &str = "Rules:\n1) Spam/Flood nahi\n2) Links bina permission nahi\n3) Abuse nahi\n4) Off-topic limit\nViolation par auto restriction.";

/// Raw configuration. Every key is the lowercase form of its environment variable.
#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Bot API token. Read from BOT_TOKEN.
    pub bot_token: Option<String>,
    /// Comma-separated owner ids. Read from ADMIN_IDS; non-numeric items are ignored.
    pub admin_ids: Option<String>,
    pub db_path: Option<String>,
    /// Log directives instead of calling the platform. Read from DRY_RUN.
    pub dry_run: Option<String>,

    pub poll_timeout_secs: Option<u64>,
    pub eviction_interval_secs: Option<u64>,

    // ─────────────────────────────────────────────────────────────────────────
    // Detectors
    // ─────────────────────────────────────────────────────────────────────────
    /// Rate window length in seconds. Read from FLOOD_WINDOW_SEC.
    pub flood_window_sec: Option<i64>,
    /// Messages allowed per window. Read from FLOOD_MAX_MSG.
    pub flood_max_msg: Option<i64>,
    /// Identical consecutive messages that count as flood. Read from REPEAT_MAX.
    pub repeat_max: Option<i64>,
    /// "1" enables link-spam detection (default). Read from LINK_SPAM_ENABLED.
    pub link_spam_enabled: Option<String>,
    /// Comma-separated allowed hosts. Read from LINK_ALLOWLIST.
    pub link_allowlist: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Escalation
    // ─────────────────────────────────────────────────────────────────────────
    pub ban_threshold: Option<i64>,
    pub mute_base_secs: Option<i64>,
    pub mute_max_secs: Option<i64>,

    pub default_welcome: Option<String>,
    pub default_rules: Option<String>,
}

/// Validated configuration, built once at startup.
#[derive(Clone)]
pub struct Settings {
    pub bot_token: String,
    pub owner_ids: HashSet<i64>,
    pub db_path: PathBuf,
    pub dry_run: bool,
    pub poll_timeout_secs: u64,
    pub eviction_interval: Duration,
    pub engine: EngineConfig,
    pub tiers: EscalationTiers,
    pub default_welcome: String,
    pub default_rules: String,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("bot_token", &"<redacted>")
            .field("owner_ids", &self.owner_ids)
            .field("db_path", &self.db_path)
            .field("dry_run", &self.dry_run)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("eviction_interval", &self.eviction_interval)
            .field("engine", &self.engine)
            .field("tiers", &self.tiers)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    /// Environment, then the file named by TG_GUARD_CONFIG if set. The caller loads `.env`
    /// beforehand.
    pub fn load() -> Result<Self, DomainError> {
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::default());
        if let Ok(path) = std::env::var("TG_GUARD_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()
            .and_then(|built| built.try_deserialize())
            .map_err(|e| DomainError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<Settings, DomainError> {
        let bot_token = self
            .bot_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DomainError::Config("BOT_TOKEN is required".into()))?
            .to_string();

        let flood_window_secs = self.flood_window_sec.unwrap_or(DEFAULT_FLOOD_WINDOW_SECS);
        if flood_window_secs <= 0 {
            return Err(invalid("FLOOD_WINDOW_SEC", "must be > 0"));
        }
        let flood_max_messages = self
            .flood_max_msg
            .unwrap_or(DEFAULT_FLOOD_MAX_MESSAGES as i64);
        if flood_max_messages < 1 {
            return Err(invalid("FLOOD_MAX_MSG", "must be >= 1"));
        }
        let repeat_max = self.repeat_max.unwrap_or(i64::from(DEFAULT_REPEAT_MAX));
        if repeat_max < 2 {
            return Err(invalid("REPEAT_MAX", "must be >= 2"));
        }

        let ban_threshold = self
            .ban_threshold
            .unwrap_or(i64::from(DEFAULT_BAN_THRESHOLD));
        if ban_threshold < 2 {
            return Err(invalid("BAN_THRESHOLD", "must be >= 2"));
        }
        let mute_base_secs = self.mute_base_secs.unwrap_or(DEFAULT_MUTE_BASE_SECS as i64);
        if mute_base_secs <= 0 {
            return Err(invalid("MUTE_BASE_SECS", "must be > 0"));
        }
        let mute_max_secs = self.mute_max_secs.unwrap_or(DEFAULT_MUTE_MAX_SECS as i64);
        if mute_max_secs < mute_base_secs {
            return Err(invalid("MUTE_MAX_SECS", "must be >= MUTE_BASE_SECS"));
        }

        let poll_timeout_secs = self.poll_timeout_secs.unwrap_or(DEFAULT_POLL_TIMEOUT_SECS);
        if poll_timeout_secs > MAX_POLL_TIMEOUT_SECS {
            return Err(invalid("POLL_TIMEOUT_SECS", "must be <= 50"));
        }
        let eviction_interval_secs = self
            .eviction_interval_secs
            .unwrap_or(DEFAULT_EVICTION_INTERVAL_SECS);
        if eviction_interval_secs == 0 {
            return Err(invalid("EVICTION_INTERVAL_SECS", "must be > 0"));
        }

        Ok(Settings {
            bot_token,
            owner_ids: parse_owner_ids(self.admin_ids.as_deref().unwrap_or_default()),
            db_path: PathBuf::from(self.db_path.as_deref().unwrap_or(DEFAULT_DB_PATH)),
            dry_run: self.dry_run.as_deref().is_some_and(is_truthy),
            poll_timeout_secs,
            eviction_interval: Duration::from_secs(eviction_interval_secs),
            engine: EngineConfig {
                flood_window_secs,
                flood_max_messages: flood_max_messages as usize,
                repeat_max: u32::try_from(repeat_max).unwrap_or(u32::MAX),
                link_spam_enabled: self.link_spam_enabled.as_deref().is_none_or(is_truthy),
                link_allowlist: parse_list(self.link_allowlist.as_deref().unwrap_or_default()),
            },
            tiers: EscalationTiers {
                ban_threshold: u32::try_from(ban_threshold).unwrap_or(u32::MAX),
                mute_base_secs: mute_base_secs as u64,
                mute_max_secs: mute_max_secs as u64,
            },
            default_welcome: self
                .default_welcome
                .clone()
                .unwrap_or_else(|| DEFAULT_WELCOME.to_string()),
            default_rules: self
                .default_rules
                .clone()
                .unwrap_or_else(|| DEFAULT_RULES.to_string()),
        })
    }
}

fn invalid(key: &str, why: &str) -> DomainError {
    DomainError::Config(format!("{key} {why}"))
}

fn is_truthy(v: &str) -> bool {
    matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Numeric items only; anything else is skipped.
pub fn parse_owner_ids(raw: &str) -> HashSet<i64> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|s| s.parse().ok())
        .collect()
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
