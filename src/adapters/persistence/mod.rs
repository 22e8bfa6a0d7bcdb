//! Persistence adapters. Implement StrikeStore.

pub mod sqlite_store;

pub use sqlite_store::SqliteStrikeStore;
