//! Strike-count → punishment escalation. Pure, no I/O.
//!
//! Per (chat, user) the state is derived from the strike count alone:
//! `Clean(0) → Warned(1) → Muted(2..ban_threshold-1) → Banned(≥ban_threshold)`.
//! Forgiving resets the count and therefore the state to `Clean`.

use crate::domain::Directive;

/// Strikes at which the user is banned.
pub const DEFAULT_BAN_THRESHOLD: u32 = 5;
/// Mute length per strike beyond the first: strike 2 → 5 min, 3 → 10 min, 4 → 15 min.
pub const DEFAULT_MUTE_BASE_SECS: u64 = 300;
/// Upper bound for a single mute (one day).
pub const DEFAULT_MUTE_MAX_SECS: u64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationTiers {
    pub ban_threshold: u32,
    pub mute_base_secs: u64,
    pub mute_max_secs: u64,
}

impl Default for EscalationTiers {
    fn default() -> Self {
        Self {
            ban_threshold: DEFAULT_BAN_THRESHOLD,
            mute_base_secs: DEFAULT_MUTE_BASE_SECS,
            mute_max_secs: DEFAULT_MUTE_MAX_SECS,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PunishmentPolicy {
    tiers: EscalationTiers,
}

impl PunishmentPolicy {
    pub fn new(tiers: EscalationTiers) -> Self {
        Self { tiers }
    }

    /// Directive for the count returned by the strike increment.
    ///
    /// A count of 0 never reaches the policy (no violation, no increment); it is mapped to
    /// `Warn` so the function stays total.
    pub fn decide(&self, strikes: u32) -> Directive {
        if strikes >= self.tiers.ban_threshold {
            return Directive::Ban;
        }
        if strikes <= 1 {
            return Directive::Warn;
        }
        let scaled = self
            .tiers
            .mute_base_secs
            .saturating_mul(u64::from(strikes - 1));
        Directive::Mute {
            duration_secs: scaled.min(self.tiers.mute_max_secs),
        }
    }
}
