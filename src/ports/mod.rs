//! Port traits. API boundaries for the hexagon.
//!
//! - Inbound: Called by the transport adapter into the application
//! - Outbound: Called by application into infrastructure

pub mod inbound;
pub mod outbound;

pub use inbound::UpdateSource;
pub use outbound::{EnforcementGateway, StrikeStore};
