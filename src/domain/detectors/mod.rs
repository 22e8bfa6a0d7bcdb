//! Message detectors used by the moderation engine. In-memory, no I/O.

pub mod link_spam;
pub mod rate_window;
pub mod repeat;

pub use link_spam::LinkSpamMatcher;
pub use rate_window::RateWindowTracker;
pub use repeat::RepeatDetector;
