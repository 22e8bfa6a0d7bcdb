//! Application use cases. Orchestrate domain logic via ports.

pub mod admin_service;
pub mod dispatcher;
pub mod eviction_worker;
pub mod moderation_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use admin_service::AdminService;
pub use dispatcher::UpdateDispatcher;
pub use eviction_worker::EvictionWorker;
pub use moderation_service::ModerationService;
