//! Infrastructure adapters. Implement ports.
//!
//! Telegram Bot API, SQLite, dry-run enforcement. Map errors to DomainError.

pub mod enforcement;
pub mod persistence;
pub mod telegram;
