//! Shared helpers for end-to-end simulation tests
//!
//! Canned channel profiles, a multi-trial statistics collector and an
//! observer-stream recorder with the queries the property tests need.

pub mod collector;
pub mod event_log;
pub mod network_profile;

pub use collector::TrialCollector;
pub use event_log::EventLog;
pub use network_profile::NetworkProfile;

#[allow(unused_imports)]
pub use collector::TrialSummary;
