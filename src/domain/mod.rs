//! Core domain layer. No external I/O dependencies.
//!
//! Entities, detectors, the moderation engine and the escalation policy live here.
//! Dependencies flow inward.

pub mod detectors;
pub mod engine;
pub mod entities;
pub mod errors;
pub mod policy;

pub use engine::{EngineConfig, ModerationEngine};
pub use entities::{
    ChatSettings, ChatUserKey, Directive, InboundUpdate, MessageEvent, NewMember,
    PunishmentEvent, Verdict,
};
pub use errors::DomainError;
pub use policy::{EscalationTiers, PunishmentPolicy};
