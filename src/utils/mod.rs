//! Utility modules

pub mod polling;

pub use polling::{PollStatus, PollingConfig, poll_until_complete};
