//! tg-guard: Telegram group anti-spam moderation with Hexagonal Architecture.
//!
//! Flood, repeat and link-spam detection feed durable per-chat strikes, which escalate
//! warn → mute → ban.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
