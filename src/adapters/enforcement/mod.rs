//! Enforcement adapters. Implement EnforcementGateway.
//!
//! Bot API gateway for production and a logging gateway for dry runs.

pub mod bot_api_gateway;
pub mod logging_gateway;

pub use bot_api_gateway::BotApiGateway;
pub use logging_gateway::LoggingGateway;
